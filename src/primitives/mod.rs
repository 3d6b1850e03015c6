//! Card Primitives - Check card and check card group.
//!
//! This module provides the selectable components:
//! - [`check_card`] / [`CheckCard`] - A card that toggles like a checkbox
//! - [`CheckCardGroup`] - Single- or multi-select coordination of cards
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `disabled: Some(true.into())`
//! - Signals: `disabled: Some(disabled_signal.into())` (stays connected!)
//! - Getters: `disabled: Some(PropValue::getter(|| compute()))`
//!
//! Pass props directly - don't extract values before binding!
//!
//! ```ignore
//! // CORRECT - signal stays connected
//! check_card(CheckCardProps { loading: Some(PropValue::Signal(loading)), ..Default::default() });
//!
//! // WRONG - extracts value, breaks reactivity
//! check_card(CheckCardProps { loading: Some(PropValue::Static(loading.get())), ..Default::default() });
//! ```

pub mod types;
mod check_card;
mod check_card_group;

pub use types::*;
pub use check_card::{check_card, CheckCard};
pub use check_card_group::CheckCardGroup;
