//! The registration vocabulary shared by aspect builders and standard
//! behaviors, and the key binding table both of them compile key handlers
//! into.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use horizon_controls_core::ObservableProperty;
use horizon_controls_core::logging::targets;

use crate::control::Control;
use crate::event::{ControlEvent, EventType, KeyEvent};
use crate::input::{Key, KeyCombination};

/// Registration of event handlers, property listeners and key bindings.
///
/// `N` is the control type and `S` the state handlers receive: the
/// controller for a [`BehaviorAspect`](super::BehaviorAspect), the behavior
/// state for a [`StandardBehavior`](super::StandardBehavior). Registrations
/// return `&mut Self` so they chain.
pub trait HandlerRegistry<N: Control, S: Send + Sync + 'static> {
    /// Route events of one type to `handler`.
    fn register_event_handler<F>(&mut self, event_type: EventType, handler: F) -> &mut Self
    where
        F: Fn(&S, &mut ControlEvent) + Send + Sync + 'static;

    /// Call `listener` with every new value of the property `property`
    /// selects on the control.
    fn register_property_listener<T, P, F>(&mut self, property: P, listener: F) -> &mut Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        P: Fn(&N) -> ObservableProperty<T> + Send + Sync + 'static,
        F: Fn(&S, &T) + Send + Sync + 'static;

    /// Bind a key combination, active only while `guard` returns `true`.
    ///
    /// A key press runs the first binding, in registration order, whose
    /// combination matches exactly and whose guard passes, then consumes
    /// the event.
    fn register_key_pressed_handler_if<G, F>(&mut self, combination: KeyCombination, guard: G, handler: F) -> &mut Self
    where
        G: Fn(&S) -> bool + Send + Sync + 'static,
        F: Fn(&S) + Send + Sync + 'static;

    /// Bind a key combination unconditionally.
    fn register_key_pressed_handler<F>(&mut self, combination: KeyCombination, handler: F) -> &mut Self
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.register_key_pressed_handler_if(combination, |_: &S| true, handler)
    }
}

type Guard<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;
type Action<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct KeyBinding<S> {
    combination: KeyCombination,
    guard: Guard<S>,
    action: Action<S>,
}

/// Key bindings grouped by key, in registration order.
pub struct KeyBindingTable<S> {
    bindings: HashMap<Key, Vec<KeyBinding<S>>>,
    len: usize,
}

impl<S> Default for KeyBindingTable<S> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
            len: 0,
        }
    }
}

impl<S> KeyBindingTable<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding after every existing binding for the same key.
    pub fn insert<G, F>(&mut self, combination: KeyCombination, guard: G, action: F)
    where
        G: Fn(&S) -> bool + Send + Sync + 'static,
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.bindings.entry(combination.key).or_default().push(KeyBinding {
            combination,
            guard: Arc::new(guard),
            action: Arc::new(action),
        });
        self.len += 1;
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the table has no bindings.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Run the first matching binding for a key press.
    ///
    /// Returns `true`, and consumes the event, if a binding ran. A consumed
    /// event is left alone.
    pub fn handle(&self, state: &S, event: &mut KeyEvent) -> bool {
        if event.base.is_consumed() {
            return false;
        }
        let Some(candidates) = self.bindings.get(&event.key) else {
            return false;
        };

        let binding = candidates
            .iter()
            .find(|binding| binding.combination.matches_event(event) && (binding.guard)(state));
        match binding {
            Some(binding) => {
                tracing::trace!(target: targets::KEYMAP, combination = %binding.combination, "key binding matched");
                (binding.action)(state);
                event.base.consume();
                true
            }
            None => false,
        }
    }
}

impl<S> fmt::Debug for KeyBindingTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBindingTable")
            .field("keys", &self.bindings.len())
            .field("bindings", &self.len)
            .finish()
    }
}
