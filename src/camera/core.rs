use glam::{Mat4, Vec2, Vec3};

/// How the camera maps view space onto the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection with a vertical field of view in degrees.
    Perspective {
        /// Vertical field of view in degrees.
        fovy: f32,
    },
    /// Orthographic projection; `half_height` is half the visible height in
    /// world units (millimeters).
    Orthographic {
        /// Half of the visible height in world units.
        half_height: f32,
    },
}

/// The scene's active camera, as handed to the picking passes.
///
/// Screen positions produced by [`Camera::project`] use the same convention
/// as pick requests: normalized to `[-1, 1]`, +x right, +y down.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Projection mode.
    pub projection: Projection,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Render viewport size in physical pixels.
    pub viewport: (u32, u32),
    /// Window size in the units pick coordinates were normalized against.
    pub window: (u32, u32),
}

impl Camera {
    /// Perspective camera whose window size matches its viewport.
    #[must_use]
    pub fn perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fovy: f32,
        viewport: (u32, u32),
    ) -> Self {
        Self {
            eye,
            target,
            up,
            projection: Projection::Perspective { fovy },
            znear: 1.0,
            zfar: 5000.0,
            viewport,
            window: viewport,
        }
    }

    /// Orthographic camera whose window size matches its viewport.
    #[must_use]
    pub fn orthographic(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        half_height: f32,
        viewport: (u32, u32),
    ) -> Self {
        Self {
            eye,
            target,
            up,
            projection: Projection::Orthographic { half_height },
            znear: 1.0,
            zfar: 5000.0,
            viewport,
            window: viewport,
        }
    }

    /// Returns `true` for perspective cameras.
    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    /// Viewport aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.viewport.0.max(1) as f32 / self.viewport.1.max(1) as f32
    }

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View-to-world matrix (the camera's own world transformation).
    pub fn world_transform(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    /// Projection matrix with wgpu's `[0, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fovy } => Mat4::perspective_rh(
                fovy.to_radians(),
                self.aspect(),
                self.znear,
                self.zfar,
            ),
            Projection::Orthographic { half_height } => {
                let half_width = half_height * self.aspect();
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.znear,
                    self.zfar,
                )
            }
        }
    }

    /// Combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to normalized screen space.
    ///
    /// Only perspective cameras support this; orthographic cameras return
    /// `None` and callers project manually from the view and projection
    /// matrices. Points behind the eye also return `None`.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        if !self.is_perspective() {
            return None;
        }
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, -clip.y / clip.w))
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.view_projection().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect();
    }
}
