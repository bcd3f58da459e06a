//! Two-point measurement on top of the coordinate passes.
//!
//! [`MeasureTool`] owns the passes and the [`Measurement`], turns pointer
//! input into picks and reports changes to subscribed observers.

mod observer;
pub mod projection;
mod state;
mod tool;

pub use observer::{ChangeCallback, Observers, SubscriptionId};
pub use state::{ActivePoint, Measurement, MeasurementSnapshot};
pub use tool::{MeasureTool, ToolHost, ToolId, ToolState};
