//! State Module - Card state and input events
//!
//! - **Merged** - Controlled/uncontrolled value reconciliation
//! - **Keyboard** - Key event types, activation keys
//! - **Mouse** - Mouse event types, click detection
//! - **Input** - crossterm conversion, [`CardEvent`]

pub mod input;
pub mod keyboard;
pub mod merged;
pub mod mouse;

pub use input::{convert_event, convert_key_event, convert_mouse_event, CardEvent};
pub use keyboard::{KeyState, KeyboardEvent, Modifiers};
pub use merged::{reduce, Intent, MergedBooleanState, MergedState};
pub use mouse::{MouseAction, MouseButton, MouseEvent};
