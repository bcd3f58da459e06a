//! Where the measurement points land on screen, for choosing which one a
//! press edits.

use glam::{DVec3, Vec2};

use super::state::ActivePoint;
use crate::camera::Camera;

/// Normalized screen position (`[-1, 1]`, +y down) of a world point.
///
/// Perspective cameras go through [`Camera::project`]. Orthographic cameras
/// are projected here from the inverse camera transform and the projection
/// matrix, since `project` only handles perspective.
#[must_use]
pub fn screen_position(camera: &Camera, world: DVec3) -> Option<Vec2> {
    if camera.is_perspective() {
        return camera.project(world.as_vec3());
    }
    let view = camera.world_transform().inverse();
    let clip = camera.projection_matrix() * view * world.as_vec3().extend(1.0);
    if clip.w.abs() <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(ndc.x, -ndc.y))
}

/// The point whose projection is closer to `click` by squared screen
/// distance. Ties go to A; `None` if either point cannot be projected.
#[must_use]
pub fn nearest_point(
    camera: &Camera,
    points: [DVec3; 2],
    click: Vec2,
) -> Option<ActivePoint> {
    let a = screen_position(camera, points[0])?;
    let b = screen_position(camera, points[1])?;
    if click.distance_squared(b) < click.distance_squared(a) {
        Some(ActivePoint::B)
    } else {
        Some(ActivePoint::A)
    }
}
