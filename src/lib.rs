//! # spark-check-card
//!
//! Selectable check cards for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! A card behaves like a checkbox but renders as a content card. Cards can
//! stand alone or join a group with single- or multi-select semantics:
//!
//! ```text
//! props ─┐
//!        ├─▶ CheckCard::derive ─▶ CardDerivedState ─▶ render
//! group ─┘        ▲
//! snapshot        └── click / key ─▶ toggle intent ─▶ group registry ─▶ new snapshot
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Size, CardFlags, CardDerivedState, GroupConfig)
//! - [`state`] - Merged controlled/uncontrolled state and input events
//! - [`engine`] - Selection registry and the group bridge
//! - [`primitives`] - `check_card` and `CheckCardGroup`
//! - [`error`] - Group construction errors

pub mod engine;
pub mod error;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::GroupError;

pub use engine::{GroupBridge, GroupSnapshot, Registration, SelectionRegistry, SelectionSet};

pub use state::{
    // Merged state
    reduce, Intent, MergedBooleanState, MergedState,
    // Events
    CardEvent, KeyboardEvent, KeyState, Modifiers, MouseAction, MouseButton, MouseEvent,
    convert_event,
};

pub use primitives::{
    check_card, CardContent, ChangeCallback, CheckCard, CheckCardGroup, CheckCardGroupProps,
    CheckCardOption, CheckCardProps, ClickCallback, Cleanup, GroupChangeCallback, PropValue,
};
