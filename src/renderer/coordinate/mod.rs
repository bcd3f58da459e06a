//! Coordinate-encoding render passes.
//!
//! Each [`AxisPass`] renders every pickable object's position along one
//! world axis into a color target (see [`crate::codec`] for the encoding),
//! then maps a screen position to a pixel and decodes it. A [`PassGroup`]
//! owns the three passes that together yield a 3D point.

mod group;
mod pass;
mod screen;

pub use group::{PassGroup, RenderedView};
pub use pass::AxisPass;
pub use screen::buffer_pixel;

use crate::options::{BuildPlateOptions, PickingOptions};
use crate::renderer::BuildPlate;

/// Per-render inputs shared by all passes.
#[derive(Debug, Clone)]
pub struct PassSettings {
    /// Encode nearest triangle corners instead of surface points.
    pub snap_to_vertices: bool,
    /// Synthetic build plate drawn under the scene, if enabled.
    pub build_plate: Option<BuildPlate>,
}

impl PassSettings {
    /// Settings derived from the picking and build-plate options.
    #[must_use]
    pub fn from_options(
        picking: &PickingOptions,
        plate: &BuildPlateOptions,
    ) -> Self {
        Self {
            snap_to_vertices: picking.snap_to_vertices,
            build_plate: plate
                .enabled
                .then(|| BuildPlate::new(plate.width, plate.depth, plate.offset)),
        }
    }
}

impl Default for PassSettings {
    fn default() -> Self {
        Self::from_options(
            &PickingOptions::default(),
            &BuildPlateOptions::default(),
        )
    }
}
