//! Mouse Module - Mouse event types
//!
//! Cards are activated by a left-button release; hit testing happens outside
//! this crate, so events arriving here are already known to target the card.

use super::keyboard::Modifiers;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Action type (down, up, move, drag, scroll)
    pub action: MouseAction,
    /// Button pressed
    pub button: MouseButton,
    /// X coordinate (0-indexed)
    pub x: u16,
    /// Y coordinate (0-indexed)
    pub y: u16,
    /// Modifier keys state
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a new mouse event
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Create a mouse down event
    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, button, x, y)
    }

    /// Create a mouse up event
    pub fn up(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, button, x, y)
    }

    /// Left button released over the target.
    pub fn is_click(&self) -> bool {
        self.action == MouseAction::Up && self.button == MouseButton::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_up_is_click() {
        assert!(MouseEvent::up(MouseButton::Left, 3, 4).is_click());
        assert!(!MouseEvent::down(MouseButton::Left, 3, 4).is_click());
        assert!(!MouseEvent::up(MouseButton::Right, 3, 4).is_click());
    }
}
