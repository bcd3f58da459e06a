use glam::Vec2;

/// Map a normalized screen position onto a pixel of a `buffer`-sized target.
///
/// `screen` is in `[-1, 1]` with +y down. The position is first scaled to
/// window pixels, then by the buffer/window ratio (the two differ when the
/// passes render at a different resolution than the window), and rounded to
/// the nearest pixel. Returns `None` outside `[0, w-1] x [0, h-1]`.
#[must_use]
pub fn buffer_pixel(
    screen: Vec2,
    window: (u32, u32),
    buffer: (u32, u32),
) -> Option<(u32, u32)> {
    if window.0 == 0 || window.1 == 0 || buffer.0 == 0 || buffer.1 == 0 {
        return None;
    }
    let axis = |s: f32, window: u32, buffer: u32| -> Option<u32> {
        let window_px = (0.5 + f64::from(s) / 2.0) * f64::from(window);
        let px = (window_px * f64::from(buffer) / f64::from(window)).round();
        (px.is_finite() && px >= 0.0 && px <= f64::from(buffer - 1))
            .then_some(px as u32)
    };
    Some((
        axis(screen.x, window.0, buffer.0)?,
        axis(screen.y, window.1, buffer.1)?,
    ))
}
