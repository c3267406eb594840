//! Behavior aspects: a controller kind plus the handlers routed to it.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use horizon_controls_core::{ObservableProperty, Subscription};
use parking_lot::Mutex;

use crate::behavior::cache::{ControllerCache, ControllerHandle};
use crate::behavior::controller::{Controller, ControllerFactory, ControllerKind};
use crate::behavior::registry::{HandlerRegistry, KeyBindingTable};
use crate::control::Control;
use crate::event::{ControlEvent, EventType};
use crate::input::KeyCombination;

/// Installs one registration on a control and returns its reversal.
type Command<N> = Box<dyn Fn(&Arc<N>, &Arc<ControllerHandle<N>>) -> Subscription + Send + Sync>;

/// One slice of a control's behavior.
///
/// An aspect names the controller kind it works with, a factory for that
/// kind, and an ordered list of registrations: event handlers, property
/// listeners and key bindings. Each registration routes to the controller
/// the installation resolves for the aspect's kind. Aspects are immutable
/// once built and may be shared between configurations.
///
/// # Example
///
/// ```
/// use horizon_controls::behavior::{BehaviorAspect, Controller, HandlerRegistry};
/// use horizon_controls::control::Button;
/// use horizon_controls::event::EventType;
/// use horizon_controls::input::{Key, KeyCombination};
///
/// struct Clicker;
/// impl Controller for Clicker {}
///
/// let mut builder = BehaviorAspect::<Button>::builder(|_button: &Button| Clicker);
/// builder
///     .register_event_handler(EventType::MousePressed, |_clicker: &Clicker, event| event.consume())
///     .register_key_pressed_handler(KeyCombination::key_only(Key::Enter), |_clicker: &Clicker| {});
/// let aspect = builder.build();
///
/// assert_eq!(aspect.registration_count(), 2);
/// ```
pub struct BehaviorAspect<N> {
    factory: ControllerFactory<N>,
    commands: Vec<Command<N>>,
}

impl<N: Control> BehaviorAspect<N> {
    /// Start building an aspect whose controller of type `C` is made by
    /// `factory`.
    pub fn builder<C, F>(factory: F) -> BehaviorAspectBuilder<N, C>
    where
        C: Controller,
        F: Fn(&N) -> C + Send + Sync + 'static,
    {
        BehaviorAspectBuilder {
            factory: ControllerFactory::new(factory),
            commands: Vec::new(),
            key_bindings: None,
            _controller: PhantomData,
        }
    }

    /// The kind of controller this aspect requests.
    pub fn controller_kind(&self) -> ControllerKind {
        self.factory.kind()
    }

    /// The aspect's own controller factory.
    pub fn factory(&self) -> &ControllerFactory<N> {
        &self.factory
    }

    /// Number of registrations installed per control. All key bindings
    /// together count as one.
    pub fn registration_count(&self) -> usize {
        self.commands.len()
    }

    /// Install every registration on `control`, resolving the controller
    /// through `cache` when a handler first needs it.
    pub fn install(&self, control: &Arc<N>, cache: &Arc<Mutex<ControllerCache<N>>>) -> Subscription {
        let handle = Arc::new(ControllerHandle::new(control, self.controller_kind(), cache.clone()));
        Subscription::all(self.commands.iter().map(|command| command(control, &handle)))
    }
}

impl<N: 'static> fmt::Debug for BehaviorAspect<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorAspect")
            .field("controller", &self.factory.kind())
            .field("registrations", &self.commands.len())
            .finish()
    }
}

enum PendingCommand<N> {
    Ready(Command<N>),
    /// Where the key binding handler goes in registration order.
    KeyBindings,
}

/// Builder for a [`BehaviorAspect`].
///
/// Registration order is installation order. All key bindings are served by
/// a single key-press handler, installed at the position of the first key
/// binding.
pub struct BehaviorAspectBuilder<N, C> {
    factory: ControllerFactory<N>,
    commands: Vec<PendingCommand<N>>,
    key_bindings: Option<KeyBindingTable<C>>,
    _controller: PhantomData<fn() -> C>,
}

impl<N: Control, C: Controller> BehaviorAspectBuilder<N, C> {
    /// Finish the aspect.
    pub fn build(self) -> BehaviorAspect<N> {
        let mut key_bindings = self.key_bindings.map(Arc::new);
        let commands = self
            .commands
            .into_iter()
            .filter_map(|pending| match pending {
                PendingCommand::Ready(command) => Some(command),
                PendingCommand::KeyBindings => key_bindings.take().map(key_binding_command::<N, C>),
            })
            .collect();

        BehaviorAspect {
            factory: self.factory,
            commands,
        }
    }

    fn push(&mut self, command: Command<N>) -> &mut Self {
        self.commands.push(PendingCommand::Ready(command));
        self
    }
}

fn key_binding_command<N: Control, C: Controller>(table: Arc<KeyBindingTable<C>>) -> Command<N> {
    Box::new(move |control: &Arc<N>, controller: &Arc<ControllerHandle<N>>| -> Subscription {
        let table = table.clone();
        let controller = controller.clone();
        control
            .control_base()
            .subscribe_event(EventType::KeyPressed, move |event: &mut ControlEvent| {
                if let Some(key_event) = event.as_key_mut() {
                    controller.with::<C, _>(|c| table.handle(c, key_event));
                }
            })
    })
}

impl<N: Control, C: Controller> HandlerRegistry<N, C> for BehaviorAspectBuilder<N, C> {
    fn register_event_handler<F>(&mut self, event_type: EventType, handler: F) -> &mut Self
    where
        F: Fn(&C, &mut ControlEvent) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.push(Box::new(
            move |control: &Arc<N>, controller: &Arc<ControllerHandle<N>>| -> Subscription {
                let handler = handler.clone();
                let controller = controller.clone();
                control
                    .control_base()
                    .subscribe_event(event_type, move |event: &mut ControlEvent| {
                        controller.with::<C, _>(|c| handler(c, event));
                    })
            },
        ))
    }

    fn register_property_listener<T, P, F>(&mut self, property: P, listener: F) -> &mut Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        P: Fn(&N) -> ObservableProperty<T> + Send + Sync + 'static,
        F: Fn(&C, &T) + Send + Sync + 'static,
    {
        let listener = Arc::new(listener);
        self.push(Box::new(
            move |control: &Arc<N>, controller: &Arc<ControllerHandle<N>>| -> Subscription {
                let listener = listener.clone();
                let controller = controller.clone();
                property(control.as_ref()).subscribe(move |value: &T| {
                    controller.with::<C, _>(|c| listener(c, value));
                })
            },
        ))
    }

    fn register_key_pressed_handler_if<G, F>(&mut self, combination: KeyCombination, guard: G, handler: F) -> &mut Self
    where
        G: Fn(&C) -> bool + Send + Sync + 'static,
        F: Fn(&C) + Send + Sync + 'static,
    {
        let table = self.key_bindings.get_or_insert_with(|| {
            self.commands.push(PendingCommand::KeyBindings);
            KeyBindingTable::new()
        });
        table.insert(combination, guard, handler);
        self
    }
}

impl<N: 'static, C> fmt::Debug for BehaviorAspectBuilder<N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorAspectBuilder")
            .field("controller", &self.factory.kind())
            .field("registrations", &self.commands.len())
            .finish()
    }
}
