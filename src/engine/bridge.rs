//! Group Bridge - Shared group state handed to every card of a group.
//!
//! The bridge replaces implicit context propagation with an explicit,
//! reference-counted handle:
//! - Cards read a [`GroupSnapshot`] (config and selection together)
//! - Cards submit intents: register, cancel, toggle
//! - Only the bridge mutates the registry
//!
//! # Publication
//!
//! The registry is published as an `Rc` inside a `RefCell`, next to a
//! revision `Signal<u64>`. Writers copy on write (`Rc::make_mut`), so a
//! snapshot only shares the `Rc` and never copies the known values. Every
//! effective mutation bumps the revision once, after the registry borrow has
//! been released. `snapshot()` reads the revision (subscribing the current
//! effect) and then builds config and selection in one pass, so no reader can
//! see one without the other.
//!
//! # Registration
//!
//! [`GroupBridge::register`] returns a [`Registration`] guard. Dropping the
//! guard cancels the registration, so every exit path of a card releases it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{effect, signal, Signal};

use crate::primitives::types::{read, Cleanup, GroupChangeCallback, PropValue};
use crate::types::{CardValue, GroupConfig, Size};
use super::registry::{SelectionRegistry, SelectionSet};

// =============================================================================
// Group Source
// =============================================================================

/// Group props after validation, as held by the bridge.
pub(crate) struct GroupSource<V: CardValue> {
    pub name: Option<String>,
    pub multiple: bool,
    pub disabled: Option<PropValue<bool>>,
    pub loading: Option<PropValue<bool>>,
    pub bordered: Option<PropValue<bool>>,
    pub size: Option<PropValue<Size>>,
    pub value: Option<PropValue<SelectionSet<V>>>,
    pub on_change: Option<GroupChangeCallback<V>>,
}

struct GroupState<V: CardValue> {
    source: GroupSource<V>,
    registry: RefCell<Rc<SelectionRegistry<V>>>,
    revision: Cell<u64>,
    version: Signal<u64>,
    /// Last controlled value reported as not fitting the mode.
    misfit: RefCell<Option<SelectionSet<V>>>,
}

impl<V: CardValue> GroupState<V> {
    fn config(&self) -> GroupConfig {
        let source = &self.source;
        GroupConfig {
            name: source.name.clone(),
            multiple: source.multiple,
            disabled: read(&source.disabled).unwrap_or(false),
            loading: read(&source.loading).unwrap_or(false),
            bordered: read(&source.bordered).unwrap_or(true),
            size: read(&source.size).unwrap_or_default(),
        }
    }

    fn controlled(&self) -> Option<SelectionSet<V>> {
        read(&self.source.value)
    }

    fn group_name(&self) -> &str {
        self.source.name.as_deref().unwrap_or("")
    }

    /// Mutate the registry, copying it first if a snapshot still shares it.
    fn update<R>(&self, f: impl FnOnce(&mut SelectionRegistry<V>) -> R) -> R {
        let mut registry = self.registry.borrow_mut();
        f(Rc::make_mut(&mut *registry))
    }

    /// Warn once per controlled value that does not fit the mode.
    ///
    /// Returns whether a warning was logged.
    fn note_misfit(&self, misfit: Option<&SelectionSet<V>>, multiple: bool) -> bool {
        let mut last = self.misfit.borrow_mut();
        if last.as_ref() == misfit {
            return false;
        }
        *last = misfit.cloned();

        let Some(value) = misfit else {
            return false;
        };
        tracing::warn!(
            group = self.group_name(),
            multiple,
            value = ?value,
            "controlled group value does not fit selection mode, coerced"
        );
        true
    }

    /// Publish a registry change to every subscriber.
    fn bump(&self) {
        let next = self.revision.get() + 1;
        self.revision.set(next);
        self.version.set(next);
    }

    fn cancel(&self, value: Option<&V>) {
        let removed = self.update(|registry| registry.cancel(value));
        if removed {
            tracing::debug!(group = self.group_name(), value = ?value, "check card cancelled");
            self.bump();
        }
    }
}

// =============================================================================
// Group Snapshot
// =============================================================================

/// Config and selection of a group at one instant.
///
/// Cheap to take: the registry is shared and the selection set is persistent.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSnapshot<V: CardValue> {
    config: GroupConfig,
    registry: Rc<SelectionRegistry<V>>,
    selection: SelectionSet<V>,
}

impl<V: CardValue> GroupSnapshot<V> {
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Registered and selected.
    pub fn is_selected(&self, value: &V) -> bool {
        self.registry.is_registered(value) && self.selection.contains(value)
    }

    pub fn is_registered(&self, value: &V) -> bool {
        self.registry.is_registered(value)
    }

    /// Selected values still registered, in registration order.
    pub fn selected_values(&self) -> Vec<V> {
        self.registry
            .known_values()
            .filter(|v| self.selection.contains(v))
            .cloned()
            .collect()
    }

    /// Selection in effect, including values whose cards are gone.
    pub fn selection(&self) -> &SelectionSet<V> {
        &self.selection
    }

    pub fn known_values(&self) -> Vec<V> {
        self.registry.known_values().cloned().collect()
    }
}

// =============================================================================
// Group Bridge
// =============================================================================

/// Cloneable handle to a group's shared state.
pub struct GroupBridge<V: CardValue> {
    state: Rc<GroupState<V>>,
}

impl<V: CardValue> Clone for GroupBridge<V> {
    fn clone(&self) -> Self {
        Self { state: self.state.clone() }
    }
}

impl<V: CardValue> GroupBridge<V> {
    pub(crate) fn new(source: GroupSource<V>, registry: SelectionRegistry<V>) -> Self {
        Self {
            state: Rc::new(GroupState {
                source,
                registry: RefCell::new(Rc::new(registry)),
                revision: Cell::new(0),
                version: signal(0),
                misfit: RefCell::new(None),
            }),
        }
    }

    /// Current config, read from the group props.
    pub fn config(&self) -> GroupConfig {
        self.state.config()
    }

    /// Consistent view of config and selection.
    ///
    /// Inside an effect this subscribes to registry changes and to every
    /// reactive group prop.
    pub fn snapshot(&self) -> GroupSnapshot<V> {
        let _ = self.state.version.get();
        let config = self.state.config();
        let registry = self.state.registry.borrow().clone();

        let controlled = self.state.controlled();
        let (selection, coerced) = registry.resolve(controlled.clone());
        self.state
            .note_misfit(controlled.as_ref().filter(|_| coerced), config.multiple);

        debug_assert!(selection.fits(config.multiple));
        GroupSnapshot {
            config,
            registry,
            selection,
        }
    }

    /// Register a card value. Absent values produce an inert guard.
    pub fn register(&self, value: Option<V>) -> Registration<V> {
        let added = self.state.update(|registry| registry.register(value.clone()));
        if added {
            tracing::debug!(group = self.state.group_name(), value = ?value, "check card registered");
            self.state.bump();
        }
        Registration {
            group: Rc::downgrade(&self.state),
            value,
        }
    }

    /// Remove a value from the known sequence. Safe for unknown values.
    pub fn cancel(&self, value: Option<&V>) {
        self.state.cancel(value);
    }

    /// Submit a toggle intent for `value`.
    ///
    /// Returns the new selection when the toggle was effective. `on_change`
    /// fires after the new selection has been published.
    pub fn toggle_option(&self, value: &V) -> Option<SelectionSet<V>> {
        let config = self.state.config();
        let controlled = self.state.controlled();

        let (emitted, controlled) = self.state.update(|registry| {
            registry.control(controlled);
            let emitted = registry.toggle_option(value, &config);
            (emitted, registry.is_controlled())
        });

        let Some(next) = emitted else {
            tracing::debug!(
                group = self.state.group_name(),
                value = ?value,
                disabled = config.disabled,
                loading = config.loading,
                "check card toggle ignored"
            );
            return None;
        };

        tracing::debug!(
            group = self.state.group_name(),
            value = ?value,
            multiple = config.multiple,
            selected = next.len(),
            "check card toggled"
        );

        // Controlled groups publish when the owner re-supplies the value
        if !controlled {
            self.state.bump();
        }
        if let Some(on_change) = &self.state.source.on_change {
            on_change(&next);
        }
        Some(next)
    }

    /// Run `f` with the current snapshot now and after every change.
    ///
    /// Returns cleanup that stops the subscription.
    pub fn subscribe(&self, f: impl Fn(&GroupSnapshot<V>) + 'static) -> Cleanup {
        let bridge = self.clone();
        let stop = effect(move || {
            let snapshot = bridge.snapshot();
            f(&snapshot);
        });
        Box::new(stop)
    }

    /// Whether two handles refer to the same group.
    pub fn same_group(&self, other: &GroupBridge<V>) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

// =============================================================================
// Registration Guard
// =============================================================================

/// Registration of one card value, cancelled on drop.
#[must_use = "dropping a Registration cancels it immediately"]
pub struct Registration<V: CardValue> {
    group: Weak<GroupState<V>>,
    value: Option<V>,
}

impl<V: CardValue> Registration<V> {
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Cancel now.
    pub fn release(self) {}
}

impl<V: CardValue> Drop for Registration<V> {
    fn drop(&mut self) {
        if let Some(state) = self.group.upgrade() {
            state.cancel(self.value.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn source(multiple: bool) -> GroupSource<&'static str> {
        GroupSource {
            name: Some("plans".to_string()),
            multiple,
            disabled: None,
            loading: None,
            bordered: None,
            size: None,
            value: None,
            on_change: None,
        }
    }

    fn bridge(multiple: bool) -> GroupBridge<&'static str> {
        GroupBridge::new(source(multiple), SelectionRegistry::new(multiple))
    }

    #[test]
    fn test_default_config() {
        let config = bridge(false).config();
        assert!(config.bordered);
        assert!(!config.disabled);
        assert_eq!(config.size, Size::Default);
        assert_eq!(config.name.as_deref(), Some("plans"));
    }

    #[test]
    fn test_registration_drop_cancels() {
        let group = bridge(false);
        let registration = group.register(Some("a"));
        assert!(group.snapshot().is_registered(&"a"));

        drop(registration);
        assert!(!group.snapshot().is_registered(&"a"));
    }

    #[test]
    fn test_registration_release_and_absent_value() {
        let group = bridge(true);
        let inert = group.register(None);
        assert_eq!(inert.value(), None);
        assert!(group.snapshot().known_values().is_empty());

        let registration = group.register(Some("b"));
        registration.release();
        inert.release();
        assert!(group.snapshot().known_values().is_empty());
    }

    #[test]
    fn test_registration_outliving_group_is_harmless() {
        let group = bridge(false);
        let registration = group.register(Some("a"));
        drop(group);
        drop(registration);
    }

    #[test]
    fn test_subscribe_sees_each_toggle() {
        let group = bridge(true);
        let _a = group.register(Some("a"));

        let runs = Rc::new(Cell::new(0));
        let selected = Rc::new(Cell::new(false));
        let runs_clone = runs.clone();
        let selected_clone = selected.clone();
        let stop = group.subscribe(move |snapshot| {
            runs_clone.set(runs_clone.get() + 1);
            selected_clone.set(snapshot.is_selected(&"a"));
        });

        assert_eq!(runs.get(), 1);
        assert!(!selected.get());

        group.toggle_option(&"a");
        assert_eq!(runs.get(), 2);
        assert!(selected.get());

        stop();
        group.toggle_option(&"a");
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_ignored_toggle_does_not_publish() {
        let group = bridge(false);
        let _a = group.register(Some("a"));
        group.toggle_option(&"a");

        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let _stop = group.subscribe(move |_| runs_clone.set(runs_clone.get() + 1));

        assert_eq!(group.toggle_option(&"a"), None);
        assert_eq!(group.toggle_option(&"ghost"), None);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_snapshots_share_registry_until_write() {
        let group = bridge(true);
        let _a = group.register(Some("a"));

        let first = group.snapshot();
        let second = group.snapshot();
        assert!(Rc::ptr_eq(&first.registry, &second.registry));

        let _b = group.register(Some("b"));
        let third = group.snapshot();
        assert!(!Rc::ptr_eq(&first.registry, &third.registry));
        assert_eq!(first.known_values(), vec!["a"]);
        assert_eq!(third.known_values(), vec!["a", "b"]);
    }

    #[test]
    fn test_misfit_controlled_value_warns_once() {
        let value = signal(SelectionSet::multiple(["a"]));
        let group = GroupBridge::new(
            GroupSource {
                value: Some(value.clone().into()),
                ..source(false)
            },
            SelectionRegistry::new(false),
        );
        let _a = group.register(Some("a"));

        assert_eq!(group.snapshot().selection(), &SelectionSet::single("a"));
        group.snapshot();
        assert!(!group.state.note_misfit(Some(&SelectionSet::multiple(["a"])), false));

        value.set(SelectionSet::multiple(["b"]));
        group.snapshot();
        assert_eq!(*group.state.misfit.borrow(), Some(SelectionSet::multiple(["b"])));

        value.set(SelectionSet::single("a"));
        assert!(group.snapshot().is_selected(&"a"));
        assert_eq!(*group.state.misfit.borrow(), None);
    }
}
