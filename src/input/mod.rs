//! Input handling: platform-agnostic events and the pointer state machine
//! that turns them into press / drag / release actions.

/// Platform-agnostic input events.
pub mod event;
/// Cursor, button and modifier tracking.
pub mod mouse;

pub use event::{InputEvent, MouseButton};
pub use mouse::{PointerAction, PointerState};
