//! Core types - Card size, state flags, and the derived per-card state.
//!
//! These are plain values: they are computed fresh on every read and never
//! stored by a card between renders.

use std::fmt::Debug;
use std::hash::Hash;

// =============================================================================
// Card Value
// =============================================================================

/// Identifier a card contributes to its group.
///
/// Compared by equality; hashed so multi-select membership is O(1).
pub trait CardValue: Clone + Eq + Hash + Debug + 'static {}

impl<T: Clone + Eq + Hash + Debug + 'static> CardValue for T {}

// =============================================================================
// Size
// =============================================================================

/// Card size.
///
/// A grouped card without its own size inherits the group's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Size {
    Small,
    #[default]
    Default,
    Large,
}

impl Size {
    /// Name as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Default => "default",
            Size::Large => "large",
        }
    }
}

// =============================================================================
// Group Config
// =============================================================================

/// Resolved group configuration for one pass.
///
/// Built from the group's props each time a snapshot is taken; children only
/// ever see it by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupConfig {
    pub name: Option<String>,
    pub multiple: bool,
    pub disabled: bool,
    pub loading: bool,
    pub bordered: bool,
    pub size: Size,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            name: None,
            multiple: false,
            disabled: false,
            loading: false,
            bordered: true,
            size: Size::Default,
        }
    }
}

impl GroupConfig {
    /// Whether the group accepts toggles at all.
    pub fn accepts_toggle(&self) -> bool {
        !self.disabled && !self.loading
    }
}

// =============================================================================
// Card Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Boolean card state packed as a bitfield.
    ///
    /// Combine with bitwise OR: `CardFlags::CHECKED | CardFlags::BORDERED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CardFlags: u8 {
        const NONE = 0;
        const CHECKED = 1 << 0;
        const DISABLED = 1 << 1;
        const LOADING = 1 << 2;
        const BORDERED = 1 << 3;
    }
}

// =============================================================================
// Derived Card State
// =============================================================================

/// Everything a card needs to render and to decide whether a click counts.
///
/// Produced by [`CheckCard::derive`](crate::primitives::CheckCard::derive)
/// from the card's own props, the group snapshot (if any) and the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardDerivedState {
    pub flags: CardFlags,
    pub size: Size,
}

impl CardDerivedState {
    pub fn new(checked: bool, disabled: bool, loading: bool, bordered: bool, size: Size) -> Self {
        let mut flags = CardFlags::NONE;
        flags.set(CardFlags::CHECKED, checked);
        flags.set(CardFlags::DISABLED, disabled);
        flags.set(CardFlags::LOADING, loading);
        flags.set(CardFlags::BORDERED, bordered);
        Self { flags, size }
    }

    pub fn checked(&self) -> bool {
        self.flags.contains(CardFlags::CHECKED)
    }

    pub fn disabled(&self) -> bool {
        self.flags.contains(CardFlags::DISABLED)
    }

    pub fn loading(&self) -> bool {
        self.flags.contains(CardFlags::LOADING)
    }

    pub fn bordered(&self) -> bool {
        self.flags.contains(CardFlags::BORDERED)
    }

    /// Whether a click on this card would be acted upon.
    pub fn interactive(&self) -> bool {
        !self.flags.intersects(CardFlags::DISABLED | CardFlags::LOADING)
    }
}
