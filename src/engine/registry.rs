//! Selection Registry - The group's bookkeeping of cards and selection.
//!
//! Tracks two things:
//! - Known values: the cards currently mounted in the group, in registration order
//! - Selection: a single optional value or a set of values, owned or controlled
//!
//! A value only counts as selected while it is registered. Cancelling a
//! registration never edits the selection itself (it may be owned by the
//! caller); it just makes the value ineligible, so a card that remounts finds
//! its selection intact. Only the set reported to the owner leaves out values
//! that are no longer registered.
//!
//! All operations are total: absent, duplicate or unknown values are no-ops.

use std::hash::Hash;

use indexmap::IndexSet;

use crate::state::merged::{reduce, Intent, MergedState};
use crate::types::GroupConfig;

// =============================================================================
// Selection Set
// =============================================================================

/// Current selection of a group.
///
/// The multi-select set is persistent, so every toggle produces a new set
/// while sharing structure with the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionSet<V: Clone + Eq + Hash> {
    Single(Option<V>),
    Multiple(im::HashSet<V>),
}

impl<V: Clone + Eq + Hash> SelectionSet<V> {
    /// Empty selection for the given mode.
    pub fn empty(multiple: bool) -> Self {
        if multiple {
            SelectionSet::Multiple(im::HashSet::new())
        } else {
            SelectionSet::Single(None)
        }
    }

    pub fn single(value: V) -> Self {
        SelectionSet::Single(Some(value))
    }

    pub fn multiple(values: impl IntoIterator<Item = V>) -> Self {
        SelectionSet::Multiple(values.into_iter().collect())
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, SelectionSet::Multiple(_))
    }

    /// Whether this shape matches the mode.
    pub fn fits(&self, multiple: bool) -> bool {
        self.is_multiple() == multiple
    }

    pub fn contains(&self, value: &V) -> bool {
        match self {
            SelectionSet::Single(current) => current.as_ref() == Some(value),
            SelectionSet::Multiple(set) => set.contains(value),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SelectionSet::Single(current) => usize::from(current.is_some()),
            SelectionSet::Multiple(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selection after a toggle intent for `value`.
    ///
    /// Single-select always lands on `value` (re-selecting is not a deselect).
    pub fn toggled(&self, value: &V) -> Self {
        match self {
            SelectionSet::Single(_) => SelectionSet::Single(Some(value.clone())),
            SelectionSet::Multiple(set) => {
                if set.contains(value) {
                    SelectionSet::Multiple(set.without(value))
                } else {
                    SelectionSet::Multiple(set.update(value.clone()))
                }
            }
        }
    }

    /// Keep only values present in `known`.
    pub fn retain_known(self, known: &IndexSet<V>) -> Self {
        match self {
            SelectionSet::Single(current) => {
                SelectionSet::Single(current.filter(|v| known.contains(v)))
            }
            SelectionSet::Multiple(mut set) => {
                set.retain(|v| known.contains(v));
                SelectionSet::Multiple(set)
            }
        }
    }

    /// Reshape to the given mode.
    ///
    /// A single value becomes a one-element set; a set collapses to its first
    /// member in `order`. Returns whether reshaping was needed.
    pub fn coerce(self, multiple: bool, order: &IndexSet<V>) -> (Self, bool) {
        match (self, multiple) {
            (SelectionSet::Single(current), true) => {
                (SelectionSet::Multiple(current.into_iter().collect()), true)
            }
            (SelectionSet::Multiple(set), false) => {
                let first = order
                    .iter()
                    .find(|v| set.contains(*v))
                    .cloned()
                    .or_else(|| set.iter().next().cloned());
                (SelectionSet::Single(first), true)
            }
            (same, _) => (same, false),
        }
    }
}

// =============================================================================
// Selection Registry
// =============================================================================

/// Known values plus selection, under a fixed single/multi policy.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRegistry<V: Clone + Eq + Hash> {
    known: IndexSet<V>,
    selection: MergedState<SelectionSet<V>>,
    multiple: bool,
}

impl<V: Clone + Eq + Hash> SelectionRegistry<V> {
    /// Empty registry with an owned, empty selection.
    pub fn new(multiple: bool) -> Self {
        Self {
            known: IndexSet::new(),
            selection: MergedState::Owned(SelectionSet::empty(multiple)),
            multiple,
        }
    }

    /// Registry seeded with an owned initial selection.
    ///
    /// The seed is reshaped if it does not fit `multiple`.
    pub fn with_selection(multiple: bool, initial: SelectionSet<V>) -> Self {
        let (initial, _) = initial.coerce(multiple, &IndexSet::new());
        Self {
            known: IndexSet::new(),
            selection: MergedState::Owned(initial),
            multiple,
        }
    }

    pub fn multiple(&self) -> bool {
        self.multiple
    }

    // -------------------------------------------------------------------------
    // Known values
    // -------------------------------------------------------------------------

    /// Add a value to the known sequence. Returns whether it was added.
    pub fn register(&mut self, value: Option<V>) -> bool {
        match value {
            Some(value) => self.known.insert(value),
            None => false,
        }
    }

    /// Remove a value from the known sequence. Returns whether it was present.
    pub fn cancel(&mut self, value: Option<&V>) -> bool {
        match value {
            Some(value) => self.known.shift_remove(value),
            None => false,
        }
    }

    pub fn is_registered(&self, value: &V) -> bool {
        self.known.contains(value)
    }

    /// Registered values in registration order.
    pub fn known_values(&self) -> impl Iterator<Item = &V> {
        self.known.iter()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Raw selection, including values that are no longer registered.
    pub fn selection(&self) -> &SelectionSet<V> {
        self.selection.value()
    }

    pub fn is_controlled(&self) -> bool {
        self.selection.is_controlled()
    }

    /// Re-apply the caller's controlled selection for this pass.
    ///
    /// Returns whether the controlled value had to be reshaped to fit the mode.
    pub fn control(&mut self, controlled: Option<SelectionSet<V>>) -> bool {
        let mut coerced = false;
        let controlled = controlled.map(|set| {
            let (set, reshaped) = set.coerce(self.multiple, &self.known);
            coerced = reshaped;
            set
        });
        let current = self.take_selection();
        self.selection = current.with_control(controlled);
        coerced
    }

    pub fn is_selected(&self, value: &V) -> bool {
        self.known.contains(value) && self.selection.value().contains(value)
    }

    /// Selected values that are registered, in registration order.
    pub fn selected_values(&self) -> Vec<V> {
        let selection = self.selection.value();
        self.known
            .iter()
            .filter(|v| selection.contains(v))
            .cloned()
            .collect()
    }

    /// Selection in effect for one pass, with the caller's controlled value
    /// applied. The stored selection is left alone.
    ///
    /// Returns whether the controlled value had to be reshaped to fit the mode.
    pub fn resolve(&self, controlled: Option<SelectionSet<V>>) -> (SelectionSet<V>, bool) {
        match controlled {
            Some(set) => set.coerce(self.multiple, &self.known),
            None => (self.selection.value().clone(), false),
        }
    }

    /// Apply a toggle intent for `value`.
    ///
    /// Returns the selection to report, or `None` when nothing changed: the
    /// group is disabled or loading, the value is neither registered nor
    /// removable, or a single-select group re-selected its current value.
    /// Under a controlled selection the stored value is left alone and only
    /// the report is made.
    ///
    /// The stored set keeps values whose cards are gone; the reported set
    /// drops them.
    pub fn toggle_option(&mut self, value: &V, config: &GroupConfig) -> Option<SelectionSet<V>> {
        if !config.accepts_toggle() {
            return None;
        }

        let current = self.selection.value();
        // Removing from a multi-select set does not need a mounted card
        let removal = self.multiple && current.contains(value);
        if !removal && !self.known.contains(value) {
            return None;
        }
        let next = current.toggled(value);

        let state = self.take_selection();
        let (state, emitted) = reduce(state, Intent::Set(next));
        self.selection = state;
        emitted.map(|set| self.reported(set))
    }

    /// Set as reported to the owner.
    fn reported(&self, set: SelectionSet<V>) -> SelectionSet<V> {
        if self.multiple {
            set.retain_known(&self.known)
        } else {
            set
        }
    }

    fn take_selection(&mut self) -> MergedState<SelectionSet<V>> {
        std::mem::replace(
            &mut self.selection,
            MergedState::Owned(SelectionSet::empty(self.multiple)),
        )
    }
}
