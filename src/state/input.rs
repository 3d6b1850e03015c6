//! Input Module - Event conversion
//!
//! Bridges crossterm's event system with the card event types.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert crossterm MouseEvent to our MouseEvent
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `convert_event` - Convert any crossterm Event to a [`CardEvent`], if it is one

use crossterm::event::{
    Event as CrosstermEvent,
    KeyCode, KeyEventKind, KeyModifiers,
    KeyEvent as CrosstermKeyEvent,
    MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
};

use super::keyboard::{KeyboardEvent, KeyState, Modifiers};
use super::mouse::{MouseAction, MouseButton, MouseEvent};

// =============================================================================
// CARD EVENT ENUM
// =============================================================================

/// Event delivered to a card's click handler.
#[derive(Debug, Clone, PartialEq)]
pub enum CardEvent {
    Mouse(MouseEvent),
    Key(KeyboardEvent),
}

impl From<MouseEvent> for CardEvent {
    fn from(event: MouseEvent) -> Self {
        CardEvent::Mouse(event)
    }
}

impl From<KeyboardEvent> for CardEvent {
    fn from(event: KeyboardEvent) -> Self {
        CardEvent::Key(event)
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert crossterm MouseEvent to our MouseEvent
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => (MouseAction::Scroll, MouseButton::None),
    };

    MouseEvent {
        action,
        button,
        x: event.column,
        y: event.row,
        modifiers: convert_modifiers(event.modifiers),
    }
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: false, // Not exposed by crossterm
    }
}

/// Convert a terminal event into a card event. Resize, focus and paste events
/// have no card meaning and yield `None`.
pub fn convert_event(event: CrosstermEvent) -> Option<CardEvent> {
    match event {
        CrosstermEvent::Mouse(mouse) => Some(CardEvent::Mouse(convert_mouse_event(mouse))),
        CrosstermEvent::Key(key) => Some(CardEvent::Key(convert_key_event(key))),
        _ => None,
    }
}
