/// Platform-agnostic input events fed to the measure tool.
///
/// Cursor positions are normalized to the window: `[-1, 1]` on both axes,
/// +x right, +y down.
///
/// # Example
///
/// ```ignore
/// tool.handle_input(InputEvent::CursorMoved { x: 0.2, y: -0.1 }, &scene, &host);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to a normalized window position.
    CursorMoved {
        /// Horizontal position in `[-1, 1]`.
        x: f32,
        /// Vertical position in `[-1, 1]`, +y down.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

impl InputEvent {
    /// Convert a cursor position in physical pixels to a normalized
    /// [`InputEvent::CursorMoved`].
    #[must_use]
    pub fn cursor_from_pixels(x: f32, y: f32, window: (u32, u32)) -> Self {
        let w = window.0.max(1) as f32;
        let h = window.1.max(1) as f32;
        Self::CursorMoved {
            x: x / w * 2.0 - 1.0,
            y: y / h * 2.0 - 1.0,
        }
    }
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}
