//! Primitive types - Props, callbacks and cleanup.
//!
//! These types define the interface for card and group props.
//! Props support static values, signals, and getters for reactivity.

use std::rc::Rc;
use spark_signals::Signal;

use crate::engine::registry::SelectionSet;
use crate::state::input::CardEvent;
use crate::types::{CardValue, Size};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by subscriptions.
///
/// Call this to stop watching and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Card checked change callback, receives the new checked value.
pub type ChangeCallback = Rc<dyn Fn(bool)>;

/// Card click callback, receives the activating event.
pub type ClickCallback = Rc<dyn Fn(&CardEvent)>;

/// Group selection change callback, receives the new selection.
pub type GroupChangeCallback<V> = Rc<dyn Fn(&SelectionSet<V>)>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Reading a signal or getter inside an effect subscribes that effect, so a
/// card watching its derived state re-runs when any bound prop changes.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    /// Wrap a getter closure.
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        PropValue::Getter(Rc::new(f))
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

/// Read an optional prop.
pub(crate) fn read<T: Clone + PartialEq + 'static>(prop: &Option<PropValue<T>>) -> Option<T> {
    prop.as_ref().map(PropValue::get)
}

// =============================================================================
// Card Content
// =============================================================================

/// Rendering-only card content.
///
/// Carried through untouched; selection never looks at it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub cover: Option<String>,
    pub extra: Option<String>,
}

impl CardContent {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

// =============================================================================
// Check Card Props
// =============================================================================

/// Properties for a check card.
///
/// # Example
///
/// ```ignore
/// use spark_check_card::{check_card, CheckCardProps};
/// use spark_signals::signal;
///
/// let disabled = signal(false);
///
/// let card = check_card(CheckCardProps {
///     value: Some("basic"),
///     default_checked: true,
///     disabled: Some(disabled.clone().into()),
///     ..Default::default()
/// });
///
/// disabled.set(true); // card stops reacting to clicks
/// ```
pub struct CheckCardProps<V: CardValue> {
    // =========================================================================
    // Identity
    // =========================================================================

    /// Value contributed to an enclosing group. Absent values never register.
    pub value: Option<V>,

    // =========================================================================
    // Checked state
    // =========================================================================

    /// Initial checked state when uncontrolled (default: false).
    pub default_checked: bool,

    /// Controlled checked state. Overrides internal state while present.
    pub checked: Option<PropValue<bool>>,

    // =========================================================================
    // Behavior
    // =========================================================================

    /// Ignore clicks (default: false, OR-ed with the group's flag).
    pub disabled: Option<PropValue<bool>>,

    /// Loading cards render unchecked and ignore clicks (default: false).
    pub loading: Option<PropValue<bool>>,

    /// Draw a border (default: true standalone, the group's flag when grouped).
    pub bordered: Option<PropValue<bool>>,

    /// Size (default: the group's size, or [`Size::Default`]).
    pub size: Option<PropValue<Size>>,

    // =========================================================================
    // Content
    // =========================================================================

    pub content: CardContent,

    // =========================================================================
    // Events
    // =========================================================================

    /// Called with the new checked value once per effective toggle.
    pub on_change: Option<ChangeCallback>,

    /// Called for every click that is not suppressed.
    pub on_click: Option<ClickCallback>,
}

impl<V: CardValue> Default for CheckCardProps<V> {
    fn default() -> Self {
        Self {
            value: None,
            default_checked: false,
            checked: None,
            disabled: None,
            loading: None,
            bordered: None,
            size: None,
            content: CardContent::default(),
            on_change: None,
            on_click: None,
        }
    }
}

// =============================================================================
// Group Props
// =============================================================================

/// A card declared by data on the group.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckCardOption<V: CardValue> {
    pub value: V,
    pub content: CardContent,
    pub disabled: bool,
    pub size: Option<Size>,
}

impl<V: CardValue> CheckCardOption<V> {
    pub fn new(value: V) -> Self {
        Self {
            value,
            content: CardContent::default(),
            disabled: false,
            size: None,
        }
    }

    pub fn titled(value: V, title: impl Into<String>) -> Self {
        Self {
            content: CardContent::titled(title),
            ..Self::new(value)
        }
    }
}

/// Properties for a check card group.
///
/// # Example
///
/// ```ignore
/// use spark_check_card::{CheckCardGroup, CheckCardGroupProps, CheckCardOption};
///
/// let group = CheckCardGroup::new(CheckCardGroupProps {
///     multiple: true,
///     options: vec![CheckCardOption::titled("a", "Alpha"), CheckCardOption::titled("b", "Beta")],
///     on_change: Some(Rc::new(|selection| println!("{:?}", selection))),
///     ..Default::default()
/// })?;
/// let cards = group.mount_options();
/// ```
pub struct CheckCardGroupProps<V: CardValue> {
    /// Group name, used in logs and passed to children.
    pub name: Option<String>,

    /// Multi-select when true, single-select otherwise (default: false).
    pub multiple: bool,

    /// Disable every card and ignore toggles (default: false).
    pub disabled: Option<PropValue<bool>>,

    /// Render every card as loading and ignore toggles (default: false).
    pub loading: Option<PropValue<bool>>,

    /// Border for cards that do not set their own (default: true).
    pub bordered: Option<PropValue<bool>>,

    /// Size for cards that do not set their own (default: [`Size::Default`]).
    pub size: Option<PropValue<Size>>,

    /// Controlled selection. Overrides the internal selection while present.
    pub value: Option<PropValue<SelectionSet<V>>>,

    /// Initial selection when uncontrolled (default: empty).
    pub default_value: Option<SelectionSet<V>>,

    /// Cards declared by data, mounted by `CheckCardGroup::mount_options`.
    pub options: Vec<CheckCardOption<V>>,

    /// Called with the new selection once per effective toggle.
    pub on_change: Option<GroupChangeCallback<V>>,
}

impl<V: CardValue> Default for CheckCardGroupProps<V> {
    fn default() -> Self {
        Self {
            name: None,
            multiple: false,
            disabled: None,
            loading: None,
            bordered: None,
            size: None,
            value: None,
            default_value: None,
            options: Vec::new(),
            on_change: None,
        }
    }
}
