//! CPU rasterizer implementing the coordinate program.
//!
//! Deterministic and device-free: pixel-center sampling, perspective-correct
//! barycentric interpolation, a `Less` depth test on `[0, 1]` depth and the
//! same encoding rules as `coordinates.wgsl`. Triangles crossing the near
//! plane are clipped in homogeneous space before rasterization.

use glam::{DMat4, DVec2, DVec3, DVec4, Vec3};

use super::{DrawCall, RenderBackend};
use crate::codec::{self, Axis};
use crate::error::PassError;

/// Handle returned by [`SoftwareBackend::compile_coordinate_program`]. The
/// CPU program has no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareProgram;

/// Color and depth planes of one CPU target.
#[derive(Debug, Clone)]
pub struct SoftwareTarget {
    width: u32,
    height: u32,
    /// Packed `0xAARRGGBB` pixels, row 0 at the top.
    color: Vec<u32>,
    depth: Vec<f64>,
    drawn: bool,
}

impl SoftwareTarget {
    /// Target size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, clear_color: [f32; 4]) {
        let bytes = clear_color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        self.color.fill(codec::from_rgba8(bytes));
        self.depth.fill(1.0);
    }
}

/// Device-free [`RenderBackend`].
#[derive(Debug, Default)]
pub struct SoftwareBackend {
    draw_count: usize,
}

impl SoftwareBackend {
    /// Create a backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of [`RenderBackend::draw`] calls served so far.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }
}

impl RenderBackend for SoftwareBackend {
    type Program = SoftwareProgram;
    type Target = SoftwareTarget;

    fn compile_coordinate_program(
        &mut self,
    ) -> Result<SoftwareProgram, PassError> {
        Ok(SoftwareProgram)
    }

    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<SoftwareTarget, PassError> {
        if width == 0 || height == 0 {
            return Err(PassError::InvalidSize { width, height });
        }
        let len = width as usize * height as usize;
        Ok(SoftwareTarget {
            width,
            height,
            color: vec![0; len],
            depth: vec![1.0; len],
            drawn: false,
        })
    }

    fn draw(
        &mut self,
        target: &mut SoftwareTarget,
        _program: &SoftwareProgram,
        call: &DrawCall<'_>,
    ) -> Result<(), PassError> {
        self.draw_count += 1;
        target.clear(call.clear_color);
        let view_proj = call.camera.view_projection().as_dmat4();
        for tri in call.batch.world_triangles() {
            rasterize_triangle(
                target,
                &view_proj,
                tri,
                call.uniforms.axis,
                call.uniforms.snap_to_vertices,
            );
        }
        target.drawn = true;
        Ok(())
    }

    fn read_pixel(&self, target: &SoftwareTarget, x: u32, y: u32) -> Option<u32> {
        if !target.drawn || x >= target.width || y >= target.height {
            return None;
        }
        target
            .color
            .get(y as usize * target.width as usize + x as usize)
            .copied()
    }
}

/// Slack on the inside test so pixel centers exactly on a shared edge are
/// covered by at least one of the two triangles.
const EDGE_EPSILON: f64 = 1e-9;

/// A triangle corner in clip space. `bary` holds its weights against the
/// source triangle's corners, so clipped vertices still know where they
/// came from.
#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    clip: DVec4,
    bary: DVec3,
}

impl ClipVertex {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            clip: self.clip.lerp(other.clip, t),
            bary: self.bary.lerp(other.bary, t),
        }
    }
}

/// A triangle corner after projection.
struct ScreenVertex {
    /// Pixel-space position, y down.
    pixel: DVec2,
    /// NDC depth in `[0, 1]`.
    depth: f64,
    /// Reciprocal clip w for perspective-correct interpolation.
    inv_w: f64,
    bary: DVec3,
}

fn project_vertex(vertex: ClipVertex, size: DVec2) -> Option<ScreenVertex> {
    let clip = vertex.clip;
    if clip.w <= f64::EPSILON {
        return None;
    }
    let inv_w = 1.0 / clip.w;
    let ndc = clip.truncate() * inv_w;
    Some(ScreenVertex {
        pixel: DVec2::new(
            (ndc.x * 0.5 + 0.5) * size.x,
            (0.5 - ndc.y * 0.5) * size.y,
        ),
        depth: ndc.z,
        inv_w,
        bary: vertex.bary,
    })
}

/// Clip a triangle against the near plane (`z >= 0` in clip space).
///
/// Sutherland-Hodgman against a single plane: the result is empty, a
/// triangle, or a quad.
fn clip_to_near_plane(triangle: [ClipVertex; 3]) -> Vec<ClipVertex> {
    let mut polygon = Vec::with_capacity(4);
    for (i, &current) in triangle.iter().enumerate() {
        let next = triangle[(i + 1) % 3];
        let (d_current, d_next) = (current.clip.z, next.clip.z);
        if d_current >= 0.0 {
            polygon.push(current);
        }
        if (d_current >= 0.0) != (d_next >= 0.0) {
            polygon.push(current.lerp(next, d_current / (d_current - d_next)));
        }
    }
    polygon
}

/// Twice the signed area of the triangle `(a, b, p)`.
fn edge(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn rasterize_triangle(
    target: &mut SoftwareTarget,
    view_proj: &DMat4,
    tri: [Vec3; 3],
    axis: Axis,
    snap_to_vertices: bool,
) {
    let corners = tri.map(|p| p.as_dvec3());
    let corner = |i: usize, bary: DVec3| ClipVertex {
        clip: *view_proj * corners[i].extend(1.0),
        bary,
    };
    let vertices =
        [corner(0, DVec3::X), corner(1, DVec3::Y), corner(2, DVec3::Z)];

    let shade = Shading {
        corners,
        axis,
        snap_to_vertices,
    };
    if vertices.iter().all(|v| v.clip.z >= 0.0) {
        rasterize_clipped(target, vertices, &shade);
        return;
    }
    let polygon = clip_to_near_plane(vertices);
    if let Some((&first, rest)) = polygon.split_first() {
        for pair in rest.windows(2) {
            rasterize_clipped(target, [first, pair[0], pair[1]], &shade);
        }
    }
}

/// What a covered pixel encodes.
struct Shading {
    /// World corners of the source triangle.
    corners: [DVec3; 3],
    axis: Axis,
    snap_to_vertices: bool,
}

fn rasterize_clipped(
    target: &mut SoftwareTarget,
    vertices: [ClipVertex; 3],
    shade: &Shading,
) {
    let size = DVec2::new(f64::from(target.width), f64::from(target.height));
    let [Some(v0), Some(v1), Some(v2)] =
        vertices.map(|v| project_vertex(v, size))
    else {
        return;
    };

    let area = edge(v0.pixel, v1.pixel, v2.pixel);
    if area.abs() < 1e-12 {
        return;
    }

    let min = v0.pixel.min(v1.pixel).min(v2.pixel).floor().max(DVec2::ZERO);
    let max = v0
        .pixel
        .max(v1.pixel)
        .max(v2.pixel)
        .ceil()
        .min(size - DVec2::ONE);
    if min.x > max.x || min.y > max.y {
        return;
    }

    let width = target.width as usize;
    for py in (min.y as u32)..=(max.y as u32) {
        for px in (min.x as u32)..=(max.x as u32) {
            let center = DVec2::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
            // Normalizing by the signed area makes the weights independent of
            // winding.
            let b0 = edge(v1.pixel, v2.pixel, center) / area;
            let b1 = edge(v2.pixel, v0.pixel, center) / area;
            let b2 = edge(v0.pixel, v1.pixel, center) / area;
            if b0 < -EDGE_EPSILON || b1 < -EDGE_EPSILON || b2 < -EDGE_EPSILON {
                continue;
            }

            let depth = b0 * v0.depth + b1 * v1.depth + b2 * v2.depth;
            let index = py as usize * width + px as usize;
            if !(0.0..=1.0).contains(&depth) || depth >= target.depth[index] {
                continue;
            }

            let w0 = b0 * v0.inv_w;
            let w1 = b1 * v1.inv_w;
            let w2 = b2 * v2.inv_w;
            let weights =
                (v0.bary * w0 + v1.bary * w1 + v2.bary * w2) / (w0 + w1 + w2);
            let [c0, c1, c2] = shade.corners;
            let world = if shade.snap_to_vertices {
                nearest_corner(weights.to_array(), shade.corners)
            } else {
                c0 * weights.x + c1 * weights.y + c2 * weights.z
            };

            target.depth[index] = depth;
            let encoded = codec::encode_mm(shade.axis.component(world));
            target.color[index] = codec::from_rgba8(codec::to_rgba8(encoded, 255));
        }
    }
}

/// The corner with the largest barycentric weight.
fn nearest_corner(weights: [f64; 3], corners: [DVec3; 3]) -> DVec3 {
    let best = (1..3).fold(0, |best, i| {
        if weights[i] > weights[best] {
            i
        } else {
            best
        }
    });
    corners[best]
}
