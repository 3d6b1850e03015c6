//! Check Card Group - Coordinates selection across its cards.
//!
//! The group owns the [`SelectionRegistry`](crate::engine::registry::SelectionRegistry)
//! and hands each card a [`GroupBridge`]. Cards never touch the registry;
//! they read snapshots and submit intents through the bridge.
//!
//! # Example
//!
//! ```ignore
//! use spark_check_card::{CheckCardGroup, CheckCardGroupProps, CheckCardProps, SelectionSet};
//!
//! let group = CheckCardGroup::new(CheckCardGroupProps {
//!     default_value: Some(SelectionSet::single("a")),
//!     ..Default::default()
//! })?;
//!
//! let a = group.card(CheckCardProps { value: Some("a"), ..Default::default() });
//! let b = group.card(CheckCardProps { value: Some("b"), ..Default::default() });
//!
//! b.click(&event);
//! assert!(!a.is_checked());
//! assert!(b.is_checked());
//! ```

use crate::engine::bridge::{GroupBridge, GroupSnapshot, GroupSource};
use crate::engine::registry::{SelectionRegistry, SelectionSet};
use crate::error::GroupError;
use crate::types::{CardValue, GroupConfig};
use super::check_card::CheckCard;
use super::types::{read, CheckCardGroupProps, CheckCardOption, CheckCardProps, Cleanup, PropValue};

/// A mounted check card group.
pub struct CheckCardGroup<V: CardValue> {
    bridge: GroupBridge<V>,
    options: Vec<CheckCardOption<V>>,
}

impl<V: CardValue> CheckCardGroup<V> {
    /// Create a group.
    ///
    /// Fails when `default_value` or the initial controlled `value` is a
    /// single value for a multi-select group, or a set for a single-select one.
    pub fn new(props: CheckCardGroupProps<V>) -> Result<Self, GroupError> {
        let CheckCardGroupProps {
            name,
            multiple,
            disabled,
            loading,
            bordered,
            size,
            value,
            default_value,
            options,
            on_change,
        } = props;

        let initial = read(&value);
        for candidate in [default_value.as_ref(), initial.as_ref()].into_iter().flatten() {
            if !candidate.fits(multiple) {
                return Err(GroupError::ModeMismatch { multiple });
            }
        }

        let registry = match default_value {
            Some(seed) => SelectionRegistry::with_selection(multiple, seed),
            None => SelectionRegistry::new(multiple),
        };

        tracing::debug!(
            group = name.as_deref().unwrap_or(""),
            multiple,
            controlled = value.is_some(),
            options = options.len(),
            "check card group created"
        );

        let source = GroupSource {
            name,
            multiple,
            disabled,
            loading,
            bordered,
            size,
            value,
            on_change,
        };

        Ok(Self {
            bridge: GroupBridge::new(source, registry),
            options,
        })
    }

    /// Handle for cards and subscribers.
    pub fn bridge(&self) -> GroupBridge<V> {
        self.bridge.clone()
    }

    /// Mount a card inside this group.
    pub fn card(&self, props: CheckCardProps<V>) -> CheckCard<V> {
        CheckCard::mount(props, Some(self.bridge.clone()))
    }

    /// Mount one card per declared option, in declaration order.
    pub fn mount_options(&self) -> Vec<CheckCard<V>> {
        self.options
            .iter()
            .map(|option| {
                self.card(CheckCardProps {
                    value: Some(option.value.clone()),
                    disabled: option.disabled.then(|| PropValue::Static(true)),
                    size: option.size.map(PropValue::Static),
                    content: option.content.clone(),
                    ..Default::default()
                })
            })
            .collect()
    }

    pub fn options(&self) -> &[CheckCardOption<V>] {
        &self.options
    }

    pub fn config(&self) -> GroupConfig {
        self.bridge.config()
    }

    pub fn snapshot(&self) -> GroupSnapshot<V> {
        self.bridge.snapshot()
    }

    /// Current selection as seen by cards.
    pub fn value(&self) -> SelectionSet<V> {
        self.snapshot().selection().clone()
    }

    pub fn is_selected(&self, value: &V) -> bool {
        self.snapshot().is_selected(value)
    }

    /// Selected values whose cards are mounted, in registration order.
    pub fn selected_values(&self) -> Vec<V> {
        self.snapshot().selected_values()
    }

    /// Toggle a value as if its card had been clicked.
    pub fn toggle_option(&self, value: &V) -> Option<SelectionSet<V>> {
        self.bridge.toggle_option(value)
    }

    /// Run `f` with the current snapshot now and after every change.
    pub fn subscribe(&self, f: impl Fn(&GroupSnapshot<V>) + 'static) -> Cleanup {
        self.bridge.subscribe(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::input::CardEvent;
    use crate::state::keyboard::KeyboardEvent;
    use crate::types::Size;
    use spark_signals::signal;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press() -> CardEvent {
        CardEvent::Key(KeyboardEvent::new("Enter"))
    }

    fn card(group: &CheckCardGroup<&'static str>, value: &'static str) -> CheckCard<&'static str> {
        group.card(CheckCardProps {
            value: Some(value),
            ..Default::default()
        })
    }

    #[test]
    fn test_mode_mismatch_rejected() {
        let err = CheckCardGroup::new(CheckCardGroupProps {
            multiple: true,
            default_value: Some(SelectionSet::single("a")),
            ..Default::default()
        })
        .err();
        assert_eq!(err, Some(GroupError::ModeMismatch { multiple: true }));

        let err = CheckCardGroup::new(CheckCardGroupProps {
            value: Some(PropValue::Static(SelectionSet::multiple(["a"]))),
            ..Default::default()
        })
        .err();
        assert_eq!(err, Some(GroupError::ModeMismatch { multiple: false }));
    }

    #[test]
    fn test_default_value_seeds_selection() -> Result<(), GroupError> {
        let group = CheckCardGroup::new(CheckCardGroupProps {
            default_value: Some(SelectionSet::single("b")),
            ..Default::default()
        })?;
        let a = card(&group, "a");
        let b = card(&group, "b");

        assert!(!a.is_checked());
        assert!(b.is_checked());
        Ok(())
    }

    #[test]
    fn test_group_flags_flow_to_cards() -> Result<(), GroupError> {
        let disabled = signal(false);
        let group = CheckCardGroup::new(CheckCardGroupProps {
            disabled: Some(disabled.clone().into()),
            bordered: Some(false.into()),
            size: Some(Size::Large.into()),
            ..Default::default()
        })?;

        let plain = card(&group, "a");
        let own = group.card(CheckCardProps {
            value: Some("b"),
            bordered: Some(true.into()),
            size: Some(Size::Small.into()),
            ..Default::default()
        });

        assert!(!plain.derive().bordered());
        assert_eq!(plain.derive().size, Size::Large);
        assert!(own.derive().bordered());
        assert_eq!(own.derive().size, Size::Small);

        disabled.set(true);
        assert!(plain.derive().disabled());
        assert!(!plain.click(&press()));
        assert!(group.value().is_empty());
        Ok(())
    }

    #[test]
    fn test_group_loading_unchecks_selected_cards() -> Result<(), GroupError> {
        let loading = signal(false);
        let group = CheckCardGroup::new(CheckCardGroupProps {
            loading: Some(loading.clone().into()),
            default_value: Some(SelectionSet::single("a")),
            ..Default::default()
        })?;
        let a = card(&group, "a");

        assert!(a.is_checked());
        loading.set(true);
        assert!(!a.is_checked());
        assert!(group.is_selected(&"a"));
        Ok(())
    }

    #[test]
    fn test_group_on_change_and_card_on_change() -> Result<(), GroupError> {
        let group_seen = Rc::new(RefCell::new(Vec::new()));
        let group_seen_clone = group_seen.clone();
        let card_seen = Rc::new(RefCell::new(Vec::new()));
        let card_seen_clone = card_seen.clone();

        let group = CheckCardGroup::new(CheckCardGroupProps {
            on_change: Some(Rc::new(move |selection: &SelectionSet<&'static str>| {
                group_seen_clone.borrow_mut().push(selection.clone());
            })),
            ..Default::default()
        })?;
        let a = group.card(CheckCardProps {
            value: Some("a"),
            on_change: Some(Rc::new(move |checked: bool| card_seen_clone.borrow_mut().push(checked))),
            ..Default::default()
        });

        a.click(&press());
        a.click(&press());

        // Single-select re-click is not a change
        assert_eq!(*group_seen.borrow(), vec![SelectionSet::single("a")]);
        assert_eq!(*card_seen.borrow(), vec![true]);
        Ok(())
    }

    #[test]
    fn test_controlled_group_waits_for_owner() -> Result<(), GroupError> {
        let value = signal(SelectionSet::multiple(["a"]));
        let value_for_owner = value.clone();
        let group = CheckCardGroup::new(CheckCardGroupProps {
            multiple: true,
            value: Some(value.clone().into()),
            on_change: Some(Rc::new(move |next: &SelectionSet<&'static str>| {
                value_for_owner.set(next.clone());
            })),
            ..Default::default()
        })?;
        let a = card(&group, "a");
        let b = card(&group, "b");

        b.click(&press());
        assert!(a.is_checked());
        assert!(b.is_checked());
        assert_eq!(group.selected_values(), vec!["a", "b"]);

        // An owner that never re-applies pins the value
        let group_ignoring = CheckCardGroup::new(CheckCardGroupProps {
            multiple: true,
            value: Some(PropValue::Static(SelectionSet::multiple(["a"]))),
            ..Default::default()
        })?;
        let pinned = card(&group_ignoring, "b");
        pinned.click(&press());
        assert!(!pinned.is_checked());
        assert_eq!(group_ignoring.selected_values(), Vec::<&str>::new());
        Ok(())
    }

    #[test]
    fn test_mount_options_in_declaration_order() -> Result<(), GroupError> {
        let group = CheckCardGroup::new(CheckCardGroupProps {
            multiple: true,
            options: vec![
                CheckCardOption::titled("x", "Ex"),
                CheckCardOption { disabled: true, ..CheckCardOption::new("y") },
                CheckCardOption { size: Some(Size::Small), ..CheckCardOption::new("z") },
            ],
            ..Default::default()
        })?;

        let cards = group.mount_options();
        assert_eq!(group.snapshot().known_values(), vec!["x", "y", "z"]);
        assert_eq!(cards[0].content().title.as_deref(), Some("Ex"));
        assert!(cards[1].derive().disabled());
        assert_eq!(cards[2].derive().size, Size::Small);

        cards[2].click(&press());
        cards[1].click(&press());
        cards[0].click(&press());
        assert_eq!(group.selected_values(), vec!["x", "z"]);

        drop(cards);
        assert!(group.snapshot().known_values().is_empty());
        Ok(())
    }

    #[test]
    fn test_set_value_moves_registration() -> Result<(), GroupError> {
        let group = CheckCardGroup::new(CheckCardGroupProps {
            default_value: Some(SelectionSet::single("new")),
            ..Default::default()
        })?;
        let mut c = card(&group, "old");
        assert!(!c.is_checked());

        c.set_value(Some("new"));
        assert_eq!(group.snapshot().known_values(), vec!["new"]);
        assert!(c.is_checked());

        c.set_value(None);
        assert!(group.snapshot().known_values().is_empty());
        assert!(!c.is_checked());
        Ok(())
    }
}
