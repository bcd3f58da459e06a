use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Picking", inline)]
#[serde(default)]
/// How picks are rendered and when cached passes are trusted.
pub struct PickingOptions {
    /// Report the nearest mesh vertex instead of the exact surface point.
    #[schemars(title = "Snap to Vertices")]
    pub snap_to_vertices: bool,
    /// Re-render when the camera moved since the last render, even in the
    /// middle of a drag.
    #[schemars(title = "Re-render on Camera Change")]
    pub rerender_on_camera_change: bool,
    /// Pass resolution relative to the camera viewport, clamped to
    /// `1..=MAX_RENDER_SCALE`.
    #[schemars(skip)]
    pub render_scale: u32,
}

/// Largest honored [`PickingOptions::render_scale`]. A 4x pass of a 2048
/// pixel viewport already reaches the common 8192 texture limit.
pub const MAX_RENDER_SCALE: u32 = 4;

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            snap_to_vertices: false,
            rerender_on_camera_change: true,
            render_scale: 1,
        }
    }
}

impl PickingOptions {
    /// Pass size for a camera viewport.
    #[must_use]
    pub fn pass_size(&self, viewport: (u32, u32)) -> (u32, u32) {
        let scale = self.render_scale.clamp(1, MAX_RENDER_SCALE);
        (
            viewport.0.saturating_mul(scale),
            viewport.1.saturating_mul(scale),
        )
    }
}
