//! The camera the picking passes render through.
//!
//! Cameras are owned by the host application; this module only describes
//! what a pick needs from one: view and projection matrices, viewport and
//! window sizes, and perspective projection of world points to the screen.

/// Core camera struct and GPU uniform types.
pub mod core;

pub use self::core::{Camera, CameraUniform, Projection};
