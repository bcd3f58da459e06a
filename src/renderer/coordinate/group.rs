use glam::{DVec3, Mat4, Vec2};

use super::pass::AxisPass;
use super::PassSettings;
use crate::camera::Camera;
use crate::codec::Axis;
use crate::error::PassError;
use crate::renderer::{RenderBackend, RenderBatch};
use crate::scene::Scene;

/// What the passes were last rendered from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedView {
    /// Camera view-projection at render time.
    pub view_projection: Mat4,
    /// Camera window size at render time.
    pub window: (u32, u32),
}

impl RenderedView {
    /// Whether `camera` still sees the scene the way these buffers do.
    #[must_use]
    pub fn matches(&self, camera: &Camera) -> bool {
        self.window == camera.window
            && self.view_projection == camera.view_projection()
    }
}

/// The X, Y and Z passes, built and rendered together.
pub struct PassGroup<B: RenderBackend> {
    passes: [AxisPass<B>; 3],
    size: (u32, u32),
    rendered: Option<RenderedView>,
}

impl<B: RenderBackend> PassGroup<B> {
    /// Build all three passes at `width` x `height`.
    ///
    /// All-or-nothing: if any pass fails, the ones already built are dropped
    /// and the error is returned.
    ///
    /// # Errors
    ///
    /// The first [`PassError`] any pass reports.
    pub fn build(
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> Result<Self, PassError> {
        let x = AxisPass::configure(backend, Axis::X, width, height)?;
        let y = AxisPass::configure(backend, Axis::Y, width, height)?;
        let z = AxisPass::configure(backend, Axis::Z, width, height)?;
        log::debug!("built coordinate passes at {width}x{height}");
        Ok(Self {
            passes: [x, y, z],
            size: (width, height),
            rendered: None,
        })
    }

    /// Output size shared by the three passes.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The passes in axis order.
    pub fn passes(&self) -> &[AxisPass<B>; 3] {
        &self.passes
    }

    /// What the passes were last rendered from, `None` before the first
    /// complete render or after a failed one.
    pub fn rendered_view(&self) -> Option<&RenderedView> {
        self.rendered.as_ref()
    }

    /// Render all three passes from one freshly collected batch.
    ///
    /// # Errors
    ///
    /// [`PassError::CameraUnavailable`] without touching any buffer, or the
    /// first backend failure (the group then counts as not rendered).
    pub fn render_all(
        &mut self,
        backend: &mut B,
        scene: &Scene,
        settings: &PassSettings,
    ) -> Result<(), PassError> {
        let camera = scene
            .active_camera()
            .ok_or(PassError::CameraUnavailable)?;
        let batch =
            RenderBatch::from_scene(scene, settings.build_plate.as_ref());
        self.rendered = None;
        for pass in &mut self.passes {
            pass.render_batch(
                backend,
                camera,
                &batch,
                settings.snap_to_vertices,
            )?;
        }
        self.rendered = Some(RenderedView {
            view_projection: camera.view_projection(),
            window: camera.window,
        });
        Ok(())
    }

    /// Decode one axis.
    pub fn decode_axis(
        &self,
        backend: &B,
        axis: Axis,
        screen: Vec2,
    ) -> Option<f64> {
        self.passes[axis.index() as usize].decode(backend, screen)
    }

    /// Decode the full world point under `screen`. `None` unless all three
    /// axes report a hit.
    pub fn decode_point(&self, backend: &B, screen: Vec2) -> Option<DVec3> {
        let [x, y, z] = &self.passes;
        Some(DVec3::new(
            x.decode(backend, screen)?,
            y.decode(backend, screen)?,
            z.decode(backend, screen)?,
        ))
    }
}
