//! Check Card - A selectable card, standalone or inside a group.
//!
//! A card's checked state comes from one of two places:
//! - Standalone: its own merged state, seeded by `default_checked` and
//!   overridden by a controlled `checked` prop
//! - Grouped: membership of its value in the group selection
//!
//! Loading cards always read as unchecked.
//!
//! # Lifecycle
//!
//! 1. Mount: a grouped card registers its value and keeps the guard
//! 2. Read: [`CheckCard::derive`] builds a fresh [`CardDerivedState`]
//! 3. Click: suppressed while disabled or loading, otherwise toggles
//! 4. Value change: old registration cancelled, new one acquired
//! 5. Drop / [`CheckCard::unmount`]: registration cancelled synchronously
//!
//! # Example
//!
//! ```ignore
//! use spark_check_card::{check_card, CheckCardProps, CardEvent};
//!
//! let card = check_card(CheckCardProps {
//!     value: Some("pro"),
//!     on_change: Some(Rc::new(|checked| println!("checked: {checked}"))),
//!     ..Default::default()
//! });
//!
//! card.handle_key(&KeyboardEvent::new(" "));
//! assert!(card.is_checked());
//! ```

use std::rc::Rc;

use spark_signals::{effect, signal, Signal};

use crate::engine::bridge::{GroupBridge, Registration};
use crate::state::input::CardEvent;
use crate::state::keyboard::KeyboardEvent;
use crate::state::merged::{reduce, Intent, MergedBooleanState, MergedState};
use crate::state::mouse::MouseEvent;
use crate::types::{CardDerivedState, CardValue, Size};
use super::types::{read, CardContent, ChangeCallback, CheckCardProps, ClickCallback, Cleanup, PropValue};

// =============================================================================
// Shared card state
// =============================================================================

struct CardState<V: CardValue> {
    value: Signal<Option<V>>,
    checked: Option<PropValue<bool>>,
    disabled: Option<PropValue<bool>>,
    loading: Option<PropValue<bool>>,
    bordered: Option<PropValue<bool>>,
    size: Option<PropValue<Size>>,
    content: CardContent,
    on_change: Option<ChangeCallback>,
    on_click: Option<ClickCallback>,
    local: Signal<MergedBooleanState>,
    group: Option<GroupBridge<V>>,
}

impl<V: CardValue> CardState<V> {
    /// Own merged state with the controlled prop applied for this pass.
    fn local_view(&self) -> MergedBooleanState {
        self.local.get().with_control(read(&self.checked))
    }

    fn derive(&self) -> CardDerivedState {
        let disabled = read(&self.disabled);
        let loading = read(&self.loading);
        let bordered = read(&self.bordered);
        let size = read(&self.size);

        match &self.group {
            Some(group) => {
                let snapshot = group.snapshot();
                let config = snapshot.config();

                let disabled = disabled.unwrap_or(false) || config.disabled;
                let loading = loading.unwrap_or(false) || config.loading;
                let bordered = bordered.unwrap_or(false) || config.bordered;
                let size = size.unwrap_or(config.size);
                let checked = !loading
                    && self
                        .value
                        .get()
                        .is_some_and(|value| snapshot.is_selected(&value));

                CardDerivedState::new(checked, disabled, loading, bordered, size)
            }
            None => {
                let loading = loading.unwrap_or(false);
                let checked = !loading && *self.local_view().value();

                CardDerivedState::new(
                    checked,
                    disabled.unwrap_or(false),
                    loading,
                    bordered.unwrap_or(true),
                    size.unwrap_or_default(),
                )
            }
        }
    }

    fn click(&self, event: &CardEvent) -> bool {
        let derived = self.derive();
        let value = self.value.get();

        if !derived.interactive() {
            tracing::debug!(
                value = ?value,
                disabled = derived.disabled(),
                loading = derived.loading(),
                "check card click ignored"
            );
            return false;
        }

        if let Some(on_click) = &self.on_click {
            on_click(event);
        }

        let (current, intent) = match (&self.group, value.as_ref()) {
            (Some(group), Some(v)) => {
                // The group is authoritative; the own state follows its verdict
                let Some(selection) = group.toggle_option(v) else {
                    return true;
                };
                let current = MergedState::new(derived.checked(), read(&self.checked));
                (current, Intent::Set(selection.contains(v)))
            }
            (Some(_), None) => return true,
            (None, _) => {
                let current = self.local_view();
                let intent = current.toggle_intent();
                (current, intent)
            }
        };

        let (next, changed) = reduce(current, intent);
        self.local.set(next);

        if let Some(checked) = changed {
            tracing::debug!(
                value = ?value,
                checked,
                size = derived.size.as_str(),
                "check card changed"
            );
            if let Some(on_change) = &self.on_change {
                on_change(checked);
            }
        }
        true
    }
}

// =============================================================================
// Check Card
// =============================================================================

/// A mounted check card.
///
/// Dropping the card cancels its group registration.
pub struct CheckCard<V: CardValue> {
    state: Rc<CardState<V>>,
    registration: Option<Registration<V>>,
}

/// Create a standalone check card.
pub fn check_card<V: CardValue>(props: CheckCardProps<V>) -> CheckCard<V> {
    CheckCard::mount(props, None)
}

impl<V: CardValue> CheckCard<V> {
    /// Mount a card, registering its value with `group` if given.
    pub fn mount(props: CheckCardProps<V>, group: Option<GroupBridge<V>>) -> Self {
        let CheckCardProps {
            value,
            default_checked,
            checked,
            disabled,
            loading,
            bordered,
            size,
            content,
            on_change,
            on_click,
        } = props;

        let registration = group.as_ref().map(|g| g.register(value.clone()));
        let local = MergedState::new(default_checked, read(&checked));

        Self {
            state: Rc::new(CardState {
                value: signal(value),
                checked,
                disabled,
                loading,
                bordered,
                size,
                content,
                on_change,
                on_click,
                local: signal(local),
                group,
            }),
            registration,
        }
    }

    pub fn value(&self) -> Option<V> {
        self.state.value.get()
    }

    pub fn content(&self) -> &CardContent {
        &self.state.content
    }

    pub fn is_grouped(&self) -> bool {
        self.state.group.is_some()
    }

    /// Fresh derived state for this pass.
    pub fn derive(&self) -> CardDerivedState {
        self.state.derive()
    }

    pub fn is_checked(&self) -> bool {
        self.derive().checked()
    }

    /// Change the card's value: cancel the old registration, then register
    /// the new value.
    pub fn set_value(&mut self, value: Option<V>) {
        if self.state.value.get() == value {
            return;
        }

        if let Some(previous) = self.registration.take() {
            previous.release();
        }
        self.registration = self
            .state
            .group
            .as_ref()
            .map(|g| g.register(value.clone()));
        self.state.value.set(value);
    }

    /// Click the card. Returns whether the click was acted upon.
    pub fn click(&self, event: &CardEvent) -> bool {
        self.state.click(event)
    }

    /// Route a mouse event that hit this card. A left-button release clicks.
    ///
    /// Returns true if the event was consumed.
    pub fn handle_mouse(&self, event: &MouseEvent) -> bool {
        if !event.is_click() {
            return false;
        }
        self.click(&CardEvent::Mouse(event.clone()));
        true
    }

    /// Route a key event while this card has focus. Space and Enter click.
    ///
    /// Returns true if the event was consumed.
    pub fn handle_key(&self, event: &KeyboardEvent) -> bool {
        if !event.is_activation() {
            return false;
        }
        self.click(&CardEvent::Key(event.clone()));
        true
    }

    /// Run `f` with the derived state now and after every change to the
    /// card's props, own state or group.
    ///
    /// Returns cleanup that stops watching.
    pub fn watch(&self, f: impl Fn(CardDerivedState) + 'static) -> Cleanup {
        let state = self.state.clone();
        let stop = effect(move || {
            f(state.derive());
        });
        Box::new(stop)
    }

    /// Unmount the card, cancelling its registration.
    pub fn unmount(mut self) {
        if let Some(registration) = self.registration.take() {
            registration.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use crate::state::mouse::MouseButton;

    fn click_event() -> CardEvent {
        CardEvent::Mouse(MouseEvent::up(MouseButton::Left, 0, 0))
    }

    fn recorder() -> (Rc<RefCell<Vec<bool>>>, ChangeCallback) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        (seen, Rc::new(move |checked: bool| seen_clone.borrow_mut().push(checked)))
    }

    #[test]
    fn test_standalone_defaults() {
        let card = check_card::<&str>(CheckCardProps::default());
        let state = card.derive();
        assert!(!state.checked());
        assert!(!state.disabled());
        assert!(!state.loading());
        assert!(state.bordered());
        assert_eq!(state.size, Size::Default);
        assert!(!card.is_grouped());
    }

    #[test]
    fn test_standalone_click_flips() {
        let (seen, on_change) = recorder();
        let card = check_card(CheckCardProps {
            value: Some(1),
            default_checked: true,
            on_change: Some(on_change),
            ..Default::default()
        });

        assert!(card.is_checked());
        assert!(card.click(&click_event()));
        assert!(!card.is_checked());
        assert!(card.click(&click_event()));
        assert!(card.is_checked());
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn test_controlled_checked_ignores_flips_but_reports() {
        let (seen, on_change) = recorder();
        let checked = signal(false);
        let card = check_card::<&str>(CheckCardProps {
            checked: Some(checked.clone().into()),
            on_change: Some(on_change),
            ..Default::default()
        });

        card.click(&click_event());
        assert!(!card.is_checked());
        assert_eq!(*seen.borrow(), vec![true]);

        // Owner re-applies the would-be value
        checked.set(true);
        assert!(card.is_checked());
    }

    #[test]
    fn test_disabled_or_loading_suppresses_click() {
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let (seen, on_change) = recorder();
        let disabled = signal(true);

        let card = check_card::<&str>(CheckCardProps {
            disabled: Some(disabled.clone().into()),
            on_change: Some(on_change),
            on_click: Some(Rc::new(move |_: &CardEvent| clicks_clone.set(clicks_clone.get() + 1))),
            ..Default::default()
        });

        assert!(!card.click(&click_event()));
        assert_eq!(clicks.get(), 0);
        assert!(seen.borrow().is_empty());

        disabled.set(false);
        assert!(card.click(&click_event()));
        assert_eq!(clicks.get(), 1);

        let loading = check_card::<&str>(CheckCardProps {
            default_checked: true,
            loading: Some(true.into()),
            ..Default::default()
        });
        assert!(!loading.is_checked());
        assert!(!loading.click(&click_event()));
    }

    #[test]
    fn test_keyboard_and_mouse_routing() {
        let card = check_card::<&str>(CheckCardProps::default());

        assert!(!card.handle_key(&KeyboardEvent::new("x")));
        assert!(!card.is_checked());

        assert!(card.handle_key(&KeyboardEvent::new(" ")));
        assert!(card.is_checked());

        assert!(!card.handle_mouse(&MouseEvent::down(MouseButton::Left, 1, 1)));
        assert!(card.handle_mouse(&MouseEvent::up(MouseButton::Left, 1, 1)));
        assert!(!card.is_checked());
    }

    #[test]
    fn test_watch_reacts_to_own_state_and_props() {
        let size = signal(Size::Small);
        let card = check_card::<&str>(CheckCardProps {
            size: Some(size.clone().into()),
            ..Default::default()
        });

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let stop = card.watch(move |state| seen_clone.borrow_mut().push((state.checked(), state.size)));

        card.click(&click_event());
        size.set(Size::Large);
        stop();
        size.set(Size::Small);

        assert_eq!(
            *seen.borrow(),
            vec![
                (false, Size::Small),
                (true, Size::Small),
                (true, Size::Large),
            ]
        );
    }
}
