//! Render pipeline, bind groups and vertex layout of the coordinate program.

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use super::render_context::RenderContext;
use super::shader_composer::{ShaderComposer, COORDINATE_SHADER};
use super::texture::{COLOR_FORMAT, DEPTH_FORMAT};
use crate::camera::CameraUniform;
use crate::error::PassError;
use crate::renderer::AxisUniforms;

/// One vertex of the expanded (non-indexed) triangle list.
///
/// Every vertex carries all three corners of its triangle so the fragment
/// stage can snap to the nearest one.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CoordinateVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Unit barycentric weight selecting this corner.
    pub barycentric: [f32; 3],
    /// First triangle corner.
    pub corner_a: [f32; 3],
    /// Second triangle corner.
    pub corner_b: [f32; 3],
    /// Third triangle corner.
    pub corner_c: [f32; 3],
}

impl CoordinateVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3,
        3 => Float32x3,
        4 => Float32x3,
    ];

    /// Vertex buffer layout matching `VertexInput` in `coordinates.wgsl`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Expand one world-space triangle into its three vertices.
    #[must_use]
    pub fn triangle(tri: [glam::Vec3; 3]) -> [Self; 3] {
        let [a, b, c] = tri.map(|v| v.to_array());
        let vertex = |position: [f32; 3], barycentric: [f32; 3]| Self {
            position,
            barycentric,
            corner_a: a,
            corner_b: b,
            corner_c: c,
        };
        [
            vertex(a, [1.0, 0.0, 0.0]),
            vertex(b, [0.0, 1.0, 0.0]),
            vertex(c, [0.0, 0.0, 1.0]),
        ]
    }
}

/// Axis selection uniform matching `AxisUniform` in `coordinates.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AxisUniform {
    /// 0 = X, 1 = Y, 2 = Z.
    pub axis: u32,
    /// Non-zero to snap to triangle corners.
    pub snap_to_vertices: u32,
    _pad0: u32,
    _pad1: u32,
}

impl From<AxisUniforms> for AxisUniform {
    fn from(uniforms: AxisUniforms) -> Self {
        Self {
            axis: uniforms.axis.index(),
            snap_to_vertices: u32::from(uniforms.snap_to_vertices),
            _pad0: 0,
            _pad1: 0,
        }
    }
}

/// The compiled coordinate program with its uniform buffers.
pub struct CoordinatePipeline {
    /// The render pipeline.
    pub pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    axis_buffer: wgpu::Buffer,
    /// Bind group 0: camera uniform.
    pub camera_bind_group: wgpu::BindGroup,
    /// Bind group 1: axis uniform.
    pub axis_bind_group: wgpu::BindGroup,
}

impl CoordinatePipeline {
    /// Compose the shader and build the pipeline.
    ///
    /// # Errors
    ///
    /// [`PassError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, PassError> {
        let device = &context.device;
        let shader = composer.compose(
            device,
            "Coordinate Shader",
            COORDINATE_SHADER,
            "utility/coordinates.wgsl",
        )?;

        let camera_layout =
            uniform_bind_group_layout(device, "Coordinate Camera Layout");
        let axis_layout =
            uniform_bind_group_layout(device, "Coordinate Axis Layout");

        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Coordinate Camera Buffer"),
                contents: bytemuck::cast_slice(&[CameraUniform::new()]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let axis_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Coordinate Axis Buffer"),
                contents: bytemuck::cast_slice(&[AxisUniform::zeroed()]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Coordinate Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });
        let axis_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Coordinate Axis Bind Group"),
                layout: &axis_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: axis_buffer.as_entire_binding(),
                }],
            });

        let layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Coordinate Pipeline Layout"),
                bind_group_layouts: &[&camera_layout, &axis_layout],
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Coordinate Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[CoordinateVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: COLOR_FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(Self {
            pipeline,
            camera_buffer,
            axis_buffer,
            camera_bind_group,
            axis_bind_group,
        })
    }

    /// Upload camera and axis uniforms for the next draw.
    pub fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        camera: &CameraUniform,
        axis: AxisUniform,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[*camera]),
        );
        queue.write_buffer(&self.axis_buffer, 0, bytemuck::cast_slice(&[axis]));
    }
}

fn uniform_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX
                | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}
