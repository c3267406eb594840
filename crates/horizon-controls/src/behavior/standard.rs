//! Standard behaviors: a single state object plus handlers, installed
//! without controller sharing.
//!
//! Most controls need nothing more than one piece of per-control state and
//! a handful of handlers. A [`StandardBehavior`] creates that state and
//! registers its handlers through the same [`HandlerRegistry`] vocabulary
//! that behavior aspects use.

use std::fmt;
use std::sync::Arc;

use horizon_controls_core::logging::{PerfSpan, targets};
use horizon_controls_core::{ObservableProperty, Subscription};
use parking_lot::RwLock;

use crate::behavior::BehaviorInstaller;
use crate::behavior::registry::{HandlerRegistry, KeyBindingTable};
use crate::control::Control;
use crate::event::{ControlEvent, EventType};
use crate::input::KeyCombination;

/// A behavior made of one state value and the handlers that act on it.
pub trait StandardBehavior<N: Control>: Send + Sync + 'static {
    /// Per-control state shared by every handler.
    type State: Send + Sync + 'static;

    /// Create the state for a control the behavior is being installed on.
    fn create_state(&self, control: &Arc<N>) -> Self::State;

    /// Register the behavior's handlers.
    fn install(&self, context: &mut StandardBehaviorContext<'_, N, Self::State>);
}

/// Registration context handed to [`StandardBehavior::install`].
///
/// Registrations take effect immediately. Key bindings are served by one
/// key-press handler added when the first binding is registered.
pub struct StandardBehaviorContext<'a, N, S> {
    control: &'a Arc<N>,
    state: Arc<S>,
    subscriptions: Vec<Subscription>,
    key_bindings: Option<Arc<RwLock<KeyBindingTable<S>>>>,
}

impl<'a, N: Control, S: Send + Sync + 'static> StandardBehaviorContext<'a, N, S> {
    /// Create a context for installing on `control`.
    pub fn new(control: &'a Arc<N>, state: S) -> Self {
        Self {
            control,
            state: Arc::new(state),
            subscriptions: Vec::new(),
            key_bindings: None,
        }
    }

    /// The control being installed on.
    pub fn control(&self) -> &Arc<N> {
        self.control
    }

    /// The behavior state.
    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Keep an extra subscription, cancelled with the behavior.
    pub fn add_subscription(&mut self, subscription: Subscription) -> &mut Self {
        self.subscriptions.push(subscription);
        self
    }

    /// Finish installation, combining every registration into one
    /// subscription.
    pub fn finish(self) -> Subscription {
        tracing::trace!(
            target: targets::BEHAVIOR,
            registrations = self.subscriptions.len(),
            key_bindings = self.key_bindings.as_ref().map_or(0, |table| table.read().len()),
            "standard behavior installed"
        );
        Subscription::all(self.subscriptions)
    }

    fn key_binding_table(&mut self) -> Arc<RwLock<KeyBindingTable<S>>> {
        if let Some(table) = &self.key_bindings {
            return table.clone();
        }

        let table = Arc::new(RwLock::new(KeyBindingTable::<S>::new()));
        let handler_table = table.clone();
        let state = self.state.clone();
        let subscription = self
            .control
            .control_base()
            .subscribe_event(EventType::KeyPressed, move |event: &mut ControlEvent| {
                if let Some(key_event) = event.as_key_mut() {
                    handler_table.read().handle(&state, key_event);
                }
            });
        self.subscriptions.push(subscription);
        self.key_bindings = Some(table.clone());
        table
    }
}

impl<N: Control, S: Send + Sync + 'static> HandlerRegistry<N, S> for StandardBehaviorContext<'_, N, S> {
    fn register_event_handler<F>(&mut self, event_type: EventType, handler: F) -> &mut Self
    where
        F: Fn(&S, &mut ControlEvent) + Send + Sync + 'static,
    {
        let state = self.state.clone();
        let subscription = self
            .control
            .control_base()
            .subscribe_event(event_type, move |event: &mut ControlEvent| handler(&state, event));
        self.subscriptions.push(subscription);
        self
    }

    fn register_property_listener<T, P, F>(&mut self, property: P, listener: F) -> &mut Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        P: Fn(&N) -> ObservableProperty<T> + Send + Sync + 'static,
        F: Fn(&S, &T) + Send + Sync + 'static,
    {
        let state = self.state.clone();
        let subscription = property(self.control.as_ref()).subscribe(move |value: &T| listener(&state, value));
        self.subscriptions.push(subscription);
        self
    }

    fn register_key_pressed_handler_if<G, F>(&mut self, combination: KeyCombination, guard: G, handler: F) -> &mut Self
    where
        G: Fn(&S) -> bool + Send + Sync + 'static,
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.key_binding_table().write().insert(combination, guard, handler);
        self
    }
}

impl<N, S> fmt::Debug for StandardBehaviorContext<'_, N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardBehaviorContext")
            .field("registrations", &self.subscriptions.len())
            .field("has_key_bindings", &self.key_bindings.is_some())
            .finish()
    }
}

/// Installs a [`StandardBehavior`] on controls.
#[derive(Debug, Clone, Default)]
pub struct StandardBehaviorInstaller<B> {
    behavior: B,
}

impl<B> StandardBehaviorInstaller<B> {
    /// Wrap a behavior.
    pub fn new(behavior: B) -> Self {
        Self { behavior }
    }

    /// The wrapped behavior.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }
}

impl<N: Control, B: StandardBehavior<N>> BehaviorInstaller<N> for StandardBehaviorInstaller<B> {
    fn install(&self, control: &Arc<N>) -> Subscription {
        let _span = PerfSpan::new("install_standard_behavior");
        let state = self.behavior.create_state(control);
        let mut context = StandardBehaviorContext::new(control, state);
        self.behavior.install(&mut context);
        context.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlBase;
    use crate::input::{Key, KeyboardModifiers};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct Counter {
        base: ControlBase,
        count: ObservableProperty<i32>,
        history: Arc<Mutex<Vec<i32>>>,
    }

    impl Control for Counter {
        fn control_base(&self) -> &ControlBase {
            &self.base
        }
    }

    struct CounterState {
        count: ObservableProperty<i32>,
        locked: AtomicBool,
        history: Arc<Mutex<Vec<i32>>>,
    }

    struct CounterBehavior;

    impl StandardBehavior<Counter> for CounterBehavior {
        type State = CounterState;

        fn create_state(&self, control: &Arc<Counter>) -> CounterState {
            CounterState {
                count: control.count.clone(),
                locked: AtomicBool::new(false),
                history: control.history.clone(),
            }
        }

        fn install(&self, context: &mut StandardBehaviorContext<'_, Counter, CounterState>) {
            context
                .register_key_pressed_handler_if(
                    KeyCombination::key_only(Key::ArrowUp),
                    |state: &CounterState| !state.locked.load(Ordering::SeqCst),
                    |state: &CounterState| {
                        state.count.set(state.count.get() + 1);
                    },
                )
                .register_key_pressed_handler(KeyCombination::key_only(Key::ArrowDown), |state: &CounterState| {
                    state.count.set(state.count.get() - 1);
                })
                .register_event_handler(EventType::Action, |state: &CounterState, event| {
                    state.locked.store(true, Ordering::SeqCst);
                    event.consume();
                })
                .register_property_listener(
                    |counter: &Counter| counter.count.clone(),
                    |state: &CounterState, value: &i32| state.history.lock().push(*value),
                );
        }
    }

    fn press(control: &Counter, key: Key) -> bool {
        control.dispatch_event(&mut ControlEvent::key_pressed(key, KeyboardModifiers::NONE))
    }

    #[test]
    fn test_standard_behavior_handles_keys_and_events() {
        let control = Arc::new(Counter::default());
        control.install_behavior(&StandardBehaviorInstaller::new(CounterBehavior));

        assert!(press(&control, Key::ArrowUp));
        assert!(press(&control, Key::ArrowUp));
        assert!(press(&control, Key::ArrowDown));
        assert_eq!(control.count.get(), 1);
        assert_eq!(*control.history.lock(), vec![1, 2, 1]);

        assert!(control.dispatch_event(&mut ControlEvent::action()));
        assert!(!press(&control, Key::ArrowUp));
        assert_eq!(control.count.get(), 1);
    }

    #[test]
    fn test_uninstall_removes_every_registration() {
        let control = Arc::new(Counter::default());
        control.install_behavior(&StandardBehaviorInstaller::new(CounterBehavior));
        assert_eq!(control.control_base().handler_count(EventType::KeyPressed), 1);
        assert_eq!(control.count.listener_count(), 1);

        control.uninstall_behavior();
        assert_eq!(control.control_base().handler_count(EventType::KeyPressed), 0);
        assert_eq!(control.control_base().handler_count(EventType::Action), 0);
        assert_eq!(control.count.listener_count(), 0);
        assert!(!press(&control, Key::ArrowUp));
    }

    #[test]
    fn test_reinstall_replaces_previous_behavior() {
        let control = Arc::new(Counter::default());
        let installer = StandardBehaviorInstaller::new(CounterBehavior);
        control.install_behavior(&installer);
        control.install_behavior(&installer);

        assert_eq!(control.control_base().handler_count(EventType::KeyPressed), 1);
        assert!(press(&control, Key::ArrowUp));
        assert_eq!(control.count.get(), 1);
    }
}
