use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Default camera used by the demo binary when the host supplies none.
pub struct CameraOptions {
    /// Use an orthographic projection instead of perspective.
    #[schemars(title = "Orthographic")]
    pub orthographic: bool,
    /// Vertical field of view in degrees (perspective).
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Half of the visible height in millimeters (orthographic).
    #[schemars(title = "Ortho Half Height", range(min = 10.0, max = 2000.0), extend("step" = 5.0))]
    pub half_height: f32,
    /// Distance from the eye to the build plate center.
    #[schemars(skip)]
    pub distance: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            orthographic: true,
            fovy: 45.0,
            half_height: 150.0,
            distance: 500.0,
            znear: 1.0,
            zfar: 5000.0,
        }
    }
}

impl CameraOptions {
    /// A camera looking straight down at the build plate center, world +X to
    /// the right and +Z towards the bottom of the screen.
    #[must_use]
    pub fn top_down(&self, viewport: (u32, u32)) -> Camera {
        let eye = Vec3::new(0.0, self.distance, 0.0);
        let mut camera = if self.orthographic {
            Camera::orthographic(eye, Vec3::ZERO, Vec3::NEG_Z, self.half_height, viewport)
        } else {
            Camera::perspective(eye, Vec3::ZERO, Vec3::NEG_Z, self.fovy, viewport)
        };
        camera.znear = self.znear;
        camera.zfar = self.zfar;
        camera
    }
}
