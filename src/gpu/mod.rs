//! GPU resource management.
//!
//! Provides headless wgpu device initialization, shader composition and the
//! [`WgpuBackend`] that runs the coordinate passes on the GPU.

/// wgpu device and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Off-screen coordinate targets with readback.
pub mod texture;
/// Coordinate pipeline, uniforms and vertex layout.
pub mod pipeline;
/// [`crate::renderer::RenderBackend`] implementation on wgpu.
pub mod backend;

pub use backend::WgpuBackend;
