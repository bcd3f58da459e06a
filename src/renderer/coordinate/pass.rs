use glam::Vec2;

use super::screen::buffer_pixel;
use super::PassSettings;
use crate::camera::Camera;
use crate::codec::{self, Axis};
use crate::error::PassError;
use crate::renderer::{
    AxisUniforms, DrawCall, RenderBackend, RenderBatch, SENTINEL_CLEAR,
};
use crate::scene::Scene;

/// One coordinate-encoding pass: renders the scene's position along a single
/// axis into an off-screen target and decodes pixels back to millimeters.
pub struct AxisPass<B: RenderBackend> {
    axis: Axis,
    width: u32,
    height: u32,
    program: B::Program,
    target: B::Target,
    /// Window size of the camera used for the last successful render.
    rendered_window: Option<(u32, u32)>,
}

impl<B: RenderBackend> AxisPass<B> {
    /// Bind a pass to `axis` at `width` x `height` pixels, compiling the
    /// coordinate program on first use.
    ///
    /// # Errors
    ///
    /// [`PassError::InvalidSize`] for a zero dimension, otherwise whatever
    /// the backend reports for program compilation or target creation.
    pub fn configure(
        backend: &mut B,
        axis: Axis,
        width: u32,
        height: u32,
    ) -> Result<Self, PassError> {
        if width == 0 || height == 0 {
            return Err(PassError::InvalidSize { width, height });
        }
        let program = backend.compile_coordinate_program()?;
        let target = backend.create_target(width, height)?;
        Ok(Self {
            axis,
            width,
            height,
            program,
            target,
            rendered_window: None,
        })
    }

    /// The axis this pass encodes.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Output size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the target holds a completed render.
    pub fn is_rendered(&self) -> bool {
        self.rendered_window.is_some()
    }

    /// Render the scene's pickable objects and build plate through the
    /// scene's active camera.
    ///
    /// # Errors
    ///
    /// [`PassError::CameraUnavailable`] when the scene has no camera; the
    /// previous buffer contents are kept in that case.
    pub fn render(
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
        self.render_batch(backend, camera, &batch, settings.snap_to_vertices)
    }

    /// Render an already collected batch.
    ///
    /// # Errors
    ///
    /// Propagates backend draw failures; the pass then counts as not
    /// rendered.
    pub fn render_batch(
        &mut self,
        backend: &mut B,
        camera: &Camera,
        batch: &RenderBatch,
        snap_to_vertices: bool,
    ) -> Result<(), PassError> {
        self.rendered_window = None;
        let call = DrawCall {
            clear_color: SENTINEL_CLEAR,
            uniforms: AxisUniforms {
                axis: self.axis,
                snap_to_vertices,
            },
            camera,
            batch,
        };
        backend.draw(&mut self.target, &self.program, &call)?;
        self.rendered_window = Some(camera.window);
        log::debug!(
            "{} pass rendered {} items at {}x{}",
            self.axis.label(),
            batch.len(),
            self.width,
            self.height
        );
        Ok(())
    }

    /// Decode the coordinate under a normalized screen position (`[-1, 1]`,
    /// +y down).
    ///
    /// `None` means "nothing here": outside the buffer, background, or no
    /// render yet. Any `Some` is a real coordinate in millimeters.
    pub fn decode(&self, backend: &B, screen: Vec2) -> Option<f64> {
        let window = self.rendered_window?;
        let (px, py) = buffer_pixel(screen, window, self.size())?;
        let pixel = backend.read_pixel(&self.target, px, py)?;
        codec::decode_raw(pixel)
    }
}
