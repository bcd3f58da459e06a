//! Rendering seam between the picking passes and whatever draws them.
//!
//! A [`RenderBackend`] is the "shader program + off-screen target" pair the
//! coordinate passes need: it compiles the coordinate program once, creates
//! targets of a given size, draws a [`RenderBatch`] into one after clearing
//! it, and reads single pixels back. Two backends ship with the crate:
//! [`crate::gpu::WgpuBackend`] and [`software::SoftwareBackend`].

pub mod batch;
pub mod coordinate;
pub mod software;

pub use batch::{BatchItem, BuildPlate, RenderBatch};

use crate::camera::Camera;
use crate::codec::Axis;
use crate::error::PassError;

/// Clear color of a coordinate target: every channel saturated so the RGB
/// part reads as the `0xFFFFFF` sentinel, alpha zero.
pub const SENTINEL_CLEAR: [f32; 4] = [1.0, 1.0, 1.0, 0.0];

/// Uniform values selecting what the coordinate program writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisUniforms {
    /// Which world axis is encoded.
    pub axis: Axis,
    /// Encode the nearest triangle corner instead of the surface point.
    pub snap_to_vertices: bool,
}

/// Everything needed to fill one coordinate target.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Color the target is cleared to before drawing.
    pub clear_color: [f32; 4],
    /// Program uniforms.
    pub uniforms: AxisUniforms,
    /// Camera supplying view and projection.
    pub camera: &'a Camera,
    /// World-space geometry to draw.
    pub batch: &'a RenderBatch,
}

/// A device able to run the coordinate-encoding program.
///
/// All calls are synchronous: when [`RenderBackend::draw`] returns, the
/// pixels it produced must be readable through
/// [`RenderBackend::read_pixel`].
pub trait RenderBackend {
    /// Compiled coordinate program handle.
    type Program;
    /// Off-screen color + depth target.
    type Target;

    /// Compile (or fetch the cached) coordinate program.
    ///
    /// # Errors
    ///
    /// Returns [`PassError::Shader`] if the program fails to compose or
    /// validate.
    fn compile_coordinate_program(&mut self)
        -> Result<Self::Program, PassError>;

    /// Create a target of `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`PassError::Target`] if the backend cannot allocate it.
    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Self::Target, PassError>;

    /// Clear `target` and draw `call.batch` into it with `program`.
    ///
    /// # Errors
    ///
    /// Returns [`PassError::Target`] if drawing or readback fails.
    fn draw(
        &mut self,
        target: &mut Self::Target,
        program: &Self::Program,
        call: &DrawCall<'_>,
    ) -> Result<(), PassError>;

    /// Read one pixel as a `0xAARRGGBB` word. `None` if the coordinate is
    /// outside the target or nothing has been drawn yet.
    fn read_pixel(&self, target: &Self::Target, x: u32, y: u32) -> Option<u32>;
}
