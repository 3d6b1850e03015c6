//! Merged State - Controlled/uncontrolled value reconciliation.
//!
//! A value is either owned by the component (`Owned`) or supplied by the
//! caller on every pass (`Controlled`). Intents go through [`reduce`], which
//! is pure so the merge law can be exercised without any UI running:
//!
//! - Owned: the new value is stored and reported.
//! - Controlled: the stored value stays as supplied; the would-be value is
//!   still reported so the owner can re-apply it.
//! - Either way, setting the current value again reports nothing.
//!
//! # Example
//!
//! ```ignore
//! use spark_check_card::state::merged::{reduce, Intent, MergedState};
//!
//! let state = MergedState::new(false, None);
//! let (state, changed) = reduce(state, Intent::Set(true));
//! assert_eq!(changed, Some(true));
//! assert!(*state.value());
//! ```
//!
//! This module has no notion of disabled or loading; callers suppress
//! intents before reducing.

// =============================================================================
// TYPES
// =============================================================================

/// A value together with who owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergedState<T> {
    Owned(T),
    Controlled(T),
}

/// Requested change to a merged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<T> {
    Set(T),
}

/// Standalone card checked state.
pub type MergedBooleanState = MergedState<bool>;

impl<T> MergedState<T> {
    /// Seed from a default and an optional controlled value.
    pub fn new(default: T, controlled: Option<T>) -> Self {
        match controlled {
            Some(value) => MergedState::Controlled(value),
            None => MergedState::Owned(default),
        }
    }

    /// Current externally visible value.
    pub fn value(&self) -> &T {
        match self {
            MergedState::Owned(v) | MergedState::Controlled(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            MergedState::Owned(v) | MergedState::Controlled(v) => v,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, MergedState::Controlled(_))
    }

    /// Re-apply the caller's controlled input for this pass.
    ///
    /// `None` releases control and keeps the last value as owned.
    pub fn with_control(self, controlled: Option<T>) -> Self {
        match controlled {
            Some(value) => MergedState::Controlled(value),
            None => MergedState::Owned(self.into_value()),
        }
    }
}

impl<T: Default> Default for MergedState<T> {
    fn default() -> Self {
        MergedState::Owned(T::default())
    }
}

impl MergedState<bool> {
    /// Intent that flips the visible value.
    pub fn toggle_intent(&self) -> Intent<bool> {
        Intent::Set(!*self.value())
    }
}

// =============================================================================
// REDUCER
// =============================================================================

/// Apply an intent, returning the next state and the change to report.
pub fn reduce<T: Clone + PartialEq>(
    state: MergedState<T>,
    intent: Intent<T>,
) -> (MergedState<T>, Option<T>) {
    let Intent::Set(next) = intent;

    if *state.value() == next {
        return (state, None);
    }

    match state {
        MergedState::Owned(_) => (MergedState::Owned(next.clone()), Some(next)),
        MergedState::Controlled(current) => (MergedState::Controlled(current), Some(next)),
    }
}
