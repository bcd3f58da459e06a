//! [`RenderBackend`] on a wgpu device.
//!
//! Every draw encodes one render pass, copies the whole color texture into
//! the target's staging buffer and blocks until the copy is mapped, so reads
//! after [`RenderBackend::draw`] never see stale pixels.

use std::sync::mpsc;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::pipeline::{AxisUniform, CoordinatePipeline, CoordinateVertex};
use super::render_context::RenderContext;
use super::shader_composer::ShaderComposer;
use super::texture::CoordinateTarget;
use crate::camera::CameraUniform;
use crate::codec;
use crate::error::{MeasureError, PassError};
use crate::renderer::{DrawCall, RenderBackend};

/// GPU implementation of the coordinate program.
pub struct WgpuBackend {
    context: RenderContext,
    composer: ShaderComposer,
    /// Compiled once, shared by every pass.
    program: Option<Arc<CoordinatePipeline>>,
}

impl WgpuBackend {
    /// Wrap an existing render context.
    ///
    /// # Errors
    ///
    /// [`PassError::Shader`] if the shared shader modules fail to register.
    pub fn new(context: RenderContext) -> Result<Self, PassError> {
        Ok(Self {
            context,
            composer: ShaderComposer::new()?,
            program: None,
        })
    }

    /// Create a backend on a fresh headless device, blocking until the
    /// adapter and device are ready.
    ///
    /// # Errors
    ///
    /// [`MeasureError::Gpu`] when no adapter or device is available.
    pub fn headless() -> Result<Self, MeasureError> {
        let context = pollster::block_on(RenderContext::headless())?;
        Ok(Self::new(context)?)
    }

    /// The underlying render context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Block until `target`'s staging buffer is mapped and copy it out.
    fn read_back(&self, target: &CoordinateTarget) -> Result<Vec<u8>, PassError> {
        let slice = target.staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self
            .context
            .device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| PassError::Target(format!("device poll failed: {e}")))?;
        rx.recv()
            .map_err(|e| PassError::Target(format!("readback dropped: {e}")))?
            .map_err(|e| PassError::Target(format!("buffer map failed: {e}")))?;
        let bytes = slice.get_mapped_range().to_vec();
        target.staging.unmap();
        Ok(bytes)
    }
}

impl RenderBackend for WgpuBackend {
    type Program = Arc<CoordinatePipeline>;
    type Target = CoordinateTarget;

    fn compile_coordinate_program(
        &mut self,
    ) -> Result<Arc<CoordinatePipeline>, PassError> {
        if let Some(program) = &self.program {
            return Ok(Arc::clone(program));
        }
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let built = CoordinatePipeline::new(&self.context, &mut self.composer);
        let validation = pollster::block_on(device.pop_error_scope());
        let pipeline = built?;
        if let Some(err) = validation {
            return Err(PassError::Shader(err.to_string()));
        }
        log::debug!("compiled coordinate program");
        let pipeline = Arc::new(pipeline);
        self.program = Some(Arc::clone(&pipeline));
        Ok(pipeline)
    }

    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<CoordinateTarget, PassError> {
        if width == 0 || height == 0 {
            return Err(PassError::InvalidSize { width, height });
        }
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let target = CoordinateTarget::new(device, width, height);
        let validation = pollster::block_on(device.pop_error_scope());
        let oom = pollster::block_on(device.pop_error_scope());
        match validation.or(oom) {
            Some(err) => Err(PassError::Target(err.to_string())),
            None => Ok(target),
        }
    }

    fn draw(
        &mut self,
        target: &mut CoordinateTarget,
        program: &Arc<CoordinatePipeline>,
        call: &DrawCall<'_>,
    ) -> Result<(), PassError> {
        target.invalidate();
        let device = &self.context.device;

        let mut camera = CameraUniform::new();
        camera.update_view_proj(call.camera);
        program.write_uniforms(
            &self.context.queue,
            &camera,
            AxisUniform::from(call.uniforms),
        );

        let vertices: Vec<CoordinateVertex> = call
            .batch
            .world_triangles()
            .flat_map(CoordinateVertex::triangle)
            .collect();
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Coordinate Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = self.context.create_encoder();
        {
            let [r, g, b, a] = call.clear_color.map(f64::from);
            let mut render_pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Coordinate Render Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &target.view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r,
                                    g,
                                    b,
                                    a,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &target.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&program.pipeline);
                render_pass.set_bind_group(0, &program.camera_bind_group, &[]);
                render_pass.set_bind_group(1, &program.axis_bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..vertices.len() as u32, 0..1);
            }
        }
        target.copy_to_staging(&mut encoder);
        self.context.submit(encoder);
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(PassError::Target(err.to_string()));
        }

        let bytes = self.read_back(target)?;
        target.store_pixels(bytes);
        Ok(())
    }

    fn read_pixel(
        &self,
        target: &CoordinateTarget,
        x: u32,
        y: u32,
    ) -> Option<u32> {
        target.pixel(x, y).map(codec::from_rgba8)
    }
}
