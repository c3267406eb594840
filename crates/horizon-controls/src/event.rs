//! Control event types.
//!
//! Events are delivered to a control through
//! [`ControlBase::dispatch_event`](crate::control::ControlBase::dispatch_event).
//! Handlers are registered per [`EventType`]; a handler that consumes the
//! event stops delivery to the handlers registered after it.

use crate::input::{Key, KeyboardModifiers};

/// The kinds of event a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A key was pressed (or auto-repeated).
    KeyPressed,
    /// A key was released.
    KeyReleased,
    /// A mouse button was pressed over the control.
    MousePressed,
    /// A mouse button was released.
    MouseReleased,
    /// The pointer entered the control.
    MouseEntered,
    /// The pointer left the control.
    MouseExited,
    /// The control was activated (a button fired, a menu item chosen).
    Action,
    /// The control gained keyboard focus.
    FocusGained,
    /// The control lost keyboard focus.
    FocusLost,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

/// Common data for all control events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventBase {
    consumed: bool,
}

impl EventBase {
    /// Create a new, unconsumed event base.
    pub fn new() -> Self {
        Self { consumed: false }
    }

    /// Check if the event has been consumed.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Consume the event, preventing delivery to later handlers.
    pub fn consume(&mut self) {
        self.consumed = true;
    }
}

/// Key press or release.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// Base event data.
    pub base: EventBase,
    /// The key that was pressed or released.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// Whether this is a key repeat event (key held down).
    pub is_repeat: bool,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            key,
            modifiers,
            is_repeat: false,
        }
    }
}

/// Mouse button or crossing event.
#[derive(Debug, Clone, Copy)]
pub struct MouseEvent {
    /// Base event data.
    pub base: EventBase,
    /// The button involved; `None` for enter and exit.
    pub button: Option<MouseButton>,
    /// Position in control-local coordinates.
    pub x: f32,
    /// Position in control-local coordinates.
    pub y: f32,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl MouseEvent {
    /// Create a new mouse event.
    pub fn new(button: Option<MouseButton>, x: f32, y: f32, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            button,
            x,
            y,
            modifiers,
        }
    }
}

/// An event delivered to a control.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// A key was pressed.
    KeyPressed(KeyEvent),
    /// A key was released.
    KeyReleased(KeyEvent),
    /// A mouse button was pressed.
    MousePressed(MouseEvent),
    /// A mouse button was released.
    MouseReleased(MouseEvent),
    /// The pointer entered the control.
    MouseEntered(MouseEvent),
    /// The pointer left the control.
    MouseExited(MouseEvent),
    /// The control was activated.
    Action(EventBase),
    /// The control gained focus.
    FocusGained(EventBase),
    /// The control lost focus.
    FocusLost(EventBase),
}

impl ControlEvent {
    /// A key press with the given modifiers.
    pub fn key_pressed(key: Key, modifiers: KeyboardModifiers) -> Self {
        ControlEvent::KeyPressed(KeyEvent::new(key, modifiers))
    }

    /// A key release with the given modifiers.
    pub fn key_released(key: Key, modifiers: KeyboardModifiers) -> Self {
        ControlEvent::KeyReleased(KeyEvent::new(key, modifiers))
    }

    /// A mouse press at a control-local position.
    pub fn mouse_pressed(button: MouseButton, x: f32, y: f32) -> Self {
        ControlEvent::MousePressed(MouseEvent::new(Some(button), x, y, KeyboardModifiers::NONE))
    }

    /// A mouse release at a control-local position.
    pub fn mouse_released(button: MouseButton, x: f32, y: f32) -> Self {
        ControlEvent::MouseReleased(MouseEvent::new(Some(button), x, y, KeyboardModifiers::NONE))
    }

    /// The pointer left the control.
    pub fn mouse_exited() -> Self {
        ControlEvent::MouseExited(MouseEvent::new(None, 0.0, 0.0, KeyboardModifiers::NONE))
    }

    /// An action event.
    pub fn action() -> Self {
        ControlEvent::Action(EventBase::new())
    }

    /// The type handlers for this event are registered under.
    pub fn event_type(&self) -> EventType {
        match self {
            ControlEvent::KeyPressed(_) => EventType::KeyPressed,
            ControlEvent::KeyReleased(_) => EventType::KeyReleased,
            ControlEvent::MousePressed(_) => EventType::MousePressed,
            ControlEvent::MouseReleased(_) => EventType::MouseReleased,
            ControlEvent::MouseEntered(_) => EventType::MouseEntered,
            ControlEvent::MouseExited(_) => EventType::MouseExited,
            ControlEvent::Action(_) => EventType::Action,
            ControlEvent::FocusGained(_) => EventType::FocusGained,
            ControlEvent::FocusLost(_) => EventType::FocusLost,
        }
    }

    /// Base event data.
    pub fn base(&self) -> &EventBase {
        match self {
            ControlEvent::KeyPressed(e) | ControlEvent::KeyReleased(e) => &e.base,
            ControlEvent::MousePressed(e)
            | ControlEvent::MouseReleased(e)
            | ControlEvent::MouseEntered(e)
            | ControlEvent::MouseExited(e) => &e.base,
            ControlEvent::Action(base) | ControlEvent::FocusGained(base) | ControlEvent::FocusLost(base) => base,
        }
    }

    /// Mutable base event data.
    pub fn base_mut(&mut self) -> &mut EventBase {
        match self {
            ControlEvent::KeyPressed(e) | ControlEvent::KeyReleased(e) => &mut e.base,
            ControlEvent::MousePressed(e)
            | ControlEvent::MouseReleased(e)
            | ControlEvent::MouseEntered(e)
            | ControlEvent::MouseExited(e) => &mut e.base,
            ControlEvent::Action(base) | ControlEvent::FocusGained(base) | ControlEvent::FocusLost(base) => base,
        }
    }

    /// Check if the event has been consumed.
    pub fn is_consumed(&self) -> bool {
        self.base().is_consumed()
    }

    /// Consume the event.
    pub fn consume(&mut self) {
        self.base_mut().consume();
    }

    /// The key data, for key events.
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            ControlEvent::KeyPressed(e) | ControlEvent::KeyReleased(e) => Some(e),
            _ => None,
        }
    }

    /// Mutable key data, for key events.
    pub fn as_key_mut(&mut self) -> Option<&mut KeyEvent> {
        match self {
            ControlEvent::KeyPressed(e) | ControlEvent::KeyReleased(e) => Some(e),
            _ => None,
        }
    }

    /// The mouse data, for mouse events.
    pub fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            ControlEvent::MousePressed(e)
            | ControlEvent::MouseReleased(e)
            | ControlEvent::MouseEntered(e)
            | ControlEvent::MouseExited(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_mapping() {
        assert_eq!(
            ControlEvent::key_pressed(Key::A, KeyboardModifiers::NONE).event_type(),
            EventType::KeyPressed
        );
        assert_eq!(
            ControlEvent::mouse_released(MouseButton::Left, 1.0, 2.0).event_type(),
            EventType::MouseReleased
        );
        assert_eq!(ControlEvent::action().event_type(), EventType::Action);
        assert_eq!(ControlEvent::mouse_exited().event_type(), EventType::MouseExited);
    }

    #[test]
    fn test_consume() {
        let mut event = ControlEvent::key_released(Key::Space, KeyboardModifiers::SHIFT);
        assert!(!event.is_consumed());
        event.consume();
        assert!(event.is_consumed());
        assert!(event.as_key().is_some_and(|key| key.base.is_consumed()));
    }

    #[test]
    fn test_accessors() {
        let mut event = ControlEvent::mouse_pressed(MouseButton::Right, 3.0, 4.0);
        assert!(event.as_key_mut().is_none());
        let mouse = event.as_mouse().copied().unwrap();
        assert_eq!(mouse.button, Some(MouseButton::Right));
        assert_eq!((mouse.x, mouse.y), (3.0, 4.0));
    }
}
