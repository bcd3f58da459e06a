use glam::Vec2;

use super::event::{InputEvent, MouseButton};

/// What a raw input event means for measuring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Nothing to do (other buttons, modifier changes, hovering).
    None,
    /// Left button went down at `position`.
    Press {
        /// Normalized cursor position.
        position: Vec2,
        /// Whether shift was held at press time.
        shift: bool,
    },
    /// Cursor moved with the left button held.
    Drag {
        /// Normalized cursor position.
        position: Vec2,
    },
    /// Left button released, ending a press or drag.
    Release,
}

/// Tracks cursor position, the left button and the shift modifier.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    cursor: Vec2,
    left_down: bool,
    shift: bool,
}

impl PointerState {
    /// Create a pointer state with nothing pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known normalized cursor position.
    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Whether the left button is currently held.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.left_down
    }

    /// Whether shift is currently held.
    #[must_use]
    pub fn shift_held(&self) -> bool {
        self.shift
    }

    /// Fold one event into the state and classify it.
    pub fn handle(&mut self, event: InputEvent) -> PointerAction {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Vec2::new(x, y);
                if self.left_down {
                    PointerAction::Drag {
                        position: self.cursor,
                    }
                } else {
                    PointerAction::None
                }
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            } => {
                self.left_down = true;
                PointerAction::Press {
                    position: self.cursor,
                    shift: self.shift,
                }
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: false,
            } => {
                let was_down = self.left_down;
                self.left_down = false;
                if was_down {
                    PointerAction::Release
                } else {
                    PointerAction::None
                }
            }
            InputEvent::MouseButton { .. } => PointerAction::None,
            InputEvent::ModifiersChanged { shift } => {
                self.shift = shift;
                PointerAction::None
            }
        }
    }

    /// Drop any held button, e.g. when the tool is deactivated mid-drag.
    pub fn reset(&mut self) {
        self.left_down = false;
    }
}
