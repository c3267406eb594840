//! Controls and their shared base.
//!
//! Every control embeds a [`ControlBase`] and implements [`Control`] to
//! expose it. The base holds the state all controls share: the ordered
//! event handler table, the disabled and focused flags, and the
//! subscription of the currently installed behavior.
//!
//! # Event Delivery
//!
//! Handlers are registered per [`EventType`] and run in registration order.
//! Delivery stops at the first handler that consumes the event. A disabled
//! control receives no events at all.
//!
//! # Behaviors
//!
//! A behavior is a bundle of handlers and listeners installed as one unit.
//! [`Control::install_behavior`] replaces the previous behavior, so at most
//! one is active per control.

mod button;
mod list_view;

pub use button::{ArmController, Button, ButtonController, button_behavior};
pub use list_view::{ListBehavior, ListBehaviorState, ListView, list_actions};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use horizon_controls_core::logging::targets;
use horizon_controls_core::{ObservableProperty, Subscription};
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::behavior::BehaviorInstaller;
use crate::event::{ControlEvent, EventBase, EventType};

new_key_type! {
    /// Identifies a registered event handler on one control.
    pub struct HandlerId;
}

type Handler = Arc<dyn Fn(&mut ControlEvent) + Send + Sync>;

struct HandlerEntry {
    event_type: EventType,
    handler: Handler,
    sequence: u64,
}

#[derive(Default)]
struct HandlerTable {
    entries: Mutex<SlotMap<HandlerId, HandlerEntry>>,
    next_sequence: AtomicU64,
}

impl HandlerTable {
    fn insert(&self, event_type: EventType, handler: Handler) -> HandlerId {
        let entry = HandlerEntry {
            event_type,
            handler,
            sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
        };
        self.entries.lock().insert(entry)
    }

    fn remove(&self, id: HandlerId) -> bool {
        self.entries.lock().remove(id).is_some()
    }

    /// Handlers for `event_type` in registration order, collected so that
    /// none runs while the table is locked.
    fn snapshot(&self, event_type: EventType) -> Vec<Handler> {
        let entries = self.entries.lock();
        let mut matching: Vec<(u64, Handler)> = entries
            .values()
            .filter(|entry| entry.event_type == event_type)
            .map(|entry| (entry.sequence, entry.handler.clone()))
            .collect();
        drop(entries);

        matching.sort_unstable_by_key(|(sequence, _)| *sequence);
        matching.into_iter().map(|(_, handler)| handler).collect()
    }

    fn count(&self, event_type: EventType) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.event_type == event_type)
            .count()
    }
}

/// State shared by every control.
pub struct ControlBase {
    handlers: Arc<HandlerTable>,
    disabled: ObservableProperty<bool>,
    focused: ObservableProperty<bool>,
    behavior: Mutex<Option<Subscription>>,
}

impl Default for ControlBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlBase {
    /// Create an enabled, unfocused base with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(HandlerTable::default()),
            disabled: ObservableProperty::new(false),
            focused: ObservableProperty::new(false),
            behavior: Mutex::new(None),
        }
    }

    /// Register a handler for one event type.
    ///
    /// Handlers run in registration order across all registrations for the
    /// same type.
    pub fn add_event_handler<F>(&self, event_type: EventType, handler: F) -> HandlerId
    where
        F: Fn(&mut ControlEvent) + Send + Sync + 'static,
    {
        let id = self.handlers.insert(event_type, Arc::new(handler));
        tracing::trace!(target: targets::EVENT, ?event_type, "event handler added");
        id
    }

    /// Remove a handler. Returns `false` if it was already removed.
    pub fn remove_event_handler(&self, id: HandlerId) -> bool {
        self.handlers.remove(id)
    }

    /// Register a handler and return a subscription that removes it.
    ///
    /// The subscription does not keep the control alive.
    pub fn subscribe_event<F>(&self, event_type: EventType, handler: F) -> Subscription
    where
        F: Fn(&mut ControlEvent) + Send + Sync + 'static,
    {
        let id = self.add_event_handler(event_type, handler);
        let table: Weak<HandlerTable> = Arc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(table) = table.upgrade() {
                table.remove(id);
            }
        })
    }

    /// Number of handlers registered for an event type.
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers.count(event_type)
    }

    /// Deliver an event to the handlers registered for its type.
    ///
    /// Returns `true` if a handler consumed the event. Handlers removed while
    /// the event is being delivered still see this event.
    pub fn dispatch_event(&self, event: &mut ControlEvent) -> bool {
        let event_type = event.event_type();
        if self.is_disabled() {
            tracing::trace!(target: targets::EVENT, ?event_type, "control disabled, event dropped");
            return false;
        }

        let handlers = self.handlers.snapshot(event_type);
        tracing::trace!(
            target: targets::EVENT,
            ?event_type,
            handler_count = handlers.len(),
            "dispatching event"
        );

        for handler in handlers {
            if event.is_consumed() {
                break;
            }
            handler(event);
        }
        event.is_consumed()
    }

    /// The disabled flag.
    pub fn disabled(&self) -> &ObservableProperty<bool> {
        &self.disabled
    }

    /// Check if the control is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Enable or disable the control.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// The focused flag.
    pub fn focused(&self) -> &ObservableProperty<bool> {
        &self.focused
    }

    /// Check if the control has keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    /// Update the focused flag and deliver the matching focus event.
    ///
    /// Nothing happens if the flag already has this value.
    pub fn set_focused(&self, focused: bool) {
        if !self.focused.set(focused) {
            return;
        }
        let mut event = if focused {
            ControlEvent::FocusGained(EventBase::new())
        } else {
            ControlEvent::FocusLost(EventBase::new())
        };
        self.dispatch_event(&mut event);
    }

    /// Check if a behavior is installed.
    pub fn has_behavior(&self) -> bool {
        self.behavior.lock().is_some()
    }

    fn replace_behavior(&self, behavior: Option<Subscription>) -> Option<Subscription> {
        std::mem::replace(&mut *self.behavior.lock(), behavior)
    }
}

impl Drop for ControlBase {
    fn drop(&mut self) {
        if let Some(behavior) = self.behavior.get_mut().take() {
            behavior.unsubscribe();
        }
    }
}

impl fmt::Debug for ControlBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlBase")
            .field("handlers", &self.handlers.entries.lock().len())
            .field("disabled", &self.disabled.get())
            .field("focused", &self.focused.get())
            .field("has_behavior", &self.has_behavior())
            .finish()
    }
}

static_assertions::assert_impl_all!(ControlBase: Send, Sync);

/// A user interface control.
pub trait Control: Send + Sync + 'static {
    /// The shared control state.
    fn control_base(&self) -> &ControlBase;

    /// Deliver an event to this control. Returns `true` if it was consumed.
    fn dispatch_event(&self, event: &mut ControlEvent) -> bool {
        self.control_base().dispatch_event(event)
    }

    /// Install a behavior, uninstalling the previous one first.
    fn install_behavior(self: &Arc<Self>, behavior: &dyn BehaviorInstaller<Self>)
    where
        Self: Sized,
    {
        self.uninstall_behavior();
        let subscription = behavior.install(self);
        if let Some(raced) = self.control_base().replace_behavior(Some(subscription)) {
            raced.unsubscribe();
        }
    }

    /// Uninstall the current behavior, removing every handler and listener
    /// it registered. Does nothing if no behavior is installed.
    fn uninstall_behavior(&self) {
        let previous = self.control_base().replace_behavior(None);
        if let Some(previous) = previous {
            tracing::debug!(target: targets::BEHAVIOR, "uninstalling behavior");
            previous.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyboardModifiers};

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str, consume: bool) -> impl Fn(&mut ControlEvent) + Send + Sync + 'static {
        let log = log.clone();
        move |event: &mut ControlEvent| {
            log.lock().push(name);
            if consume {
                event.consume();
            }
        }
    }

    fn key_press() -> ControlEvent {
        ControlEvent::key_pressed(Key::Space, KeyboardModifiers::NONE)
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let base = ControlBase::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        base.add_event_handler(EventType::KeyPressed, recorder(&log, "first", false));
        base.add_event_handler(EventType::KeyPressed, recorder(&log, "second", false));
        base.add_event_handler(EventType::MousePressed, recorder(&log, "mouse", false));

        assert!(!base.dispatch_event(&mut key_press()));
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_consumption_stops_delivery() {
        let base = ControlBase::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        base.add_event_handler(EventType::KeyPressed, recorder(&log, "first", true));
        base.add_event_handler(EventType::KeyPressed, recorder(&log, "second", false));

        assert!(base.dispatch_event(&mut key_press()));
        assert_eq!(*log.lock(), vec!["first"]);
    }

    #[test]
    fn test_remove_and_subscription() {
        let base = ControlBase::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = base.add_event_handler(EventType::KeyPressed, recorder(&log, "removed", false));
        let sub = base.subscribe_event(EventType::KeyPressed, recorder(&log, "subscribed", false));
        assert_eq!(base.handler_count(EventType::KeyPressed), 2);

        assert!(base.remove_event_handler(id));
        assert!(!base.remove_event_handler(id));
        sub.unsubscribe();

        base.dispatch_event(&mut key_press());
        assert!(log.lock().is_empty());
        assert_eq!(base.handler_count(EventType::KeyPressed), 0);
    }

    #[test]
    fn test_disabled_control_drops_events() {
        let base = ControlBase::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        base.add_event_handler(EventType::KeyPressed, recorder(&log, "handler", true));

        base.set_disabled(true);
        assert!(!base.dispatch_event(&mut key_press()));
        base.set_disabled(false);
        assert!(base.dispatch_event(&mut key_press()));
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_focus_change_dispatches_once() {
        let base = ControlBase::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        base.add_event_handler(EventType::FocusGained, recorder(&log, "gained", false));
        base.add_event_handler(EventType::FocusLost, recorder(&log, "lost", false));

        base.set_focused(true);
        base.set_focused(true);
        base.set_focused(false);

        assert_eq!(*log.lock(), vec!["gained", "lost"]);
        assert!(!base.is_focused());
    }

    struct Watch(ObservableProperty<u32>);

    impl BehaviorInstaller<Plain> for Watch {
        fn install(&self, _: &Arc<Plain>) -> Subscription {
            self.0.subscribe(|_| {})
        }
    }

    #[derive(Default)]
    struct Plain {
        base: ControlBase,
    }

    impl Control for Plain {
        fn control_base(&self) -> &ControlBase {
            &self.base
        }
    }

    #[test]
    fn test_dropping_control_uninstalls_behavior() {
        let shared = ObservableProperty::new(0u32);
        let control = Arc::new(Plain::default());
        control.install_behavior(&Watch(shared.clone()));
        assert_eq!(shared.listener_count(), 1);

        drop(control);
        assert_eq!(shared.listener_count(), 0);
    }
}
