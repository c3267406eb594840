//! Conversion from winit keyboard input.
//!
//! The windowing layer owns the event loop; it tracks modifier state with a
//! [`KeyboardInputHandler`] and turns each winit key event into a
//! [`ControlEvent`] for the focused control.
//!
//! ```ignore
//! use horizon_controls::input::winit::KeyboardInputHandler;
//!
//! let mut handler = KeyboardInputHandler::new();
//!
//! // WindowEvent::ModifiersChanged(modifiers)
//! handler.update_modifiers(&modifiers);
//!
//! // WindowEvent::KeyboardInput { event, .. }
//! let mut control_event = handler.control_event(&event);
//! focused.dispatch_event(&mut control_event);
//! ```

use winit::event::{ElementState, KeyEvent as WinitKeyEvent, Modifiers};
use winit::keyboard::{Key as WinitKey, KeyCode, NamedKey, PhysicalKey};

use crate::event::{ControlEvent, KeyEvent};
use crate::input::{Key, KeyboardModifiers};

/// Converts a winit logical key to a control key.
pub fn from_winit_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(named) => from_winit_named_key(named),
        WinitKey::Character(c) => from_character(c),
        WinitKey::Unidentified(_) | WinitKey::Dead(_) => Key::Unknown(0),
    }
}

fn from_winit_named_key(key: &NamedKey) -> Key {
    match key {
        NamedKey::ArrowUp => Key::ArrowUp,
        NamedKey::ArrowDown => Key::ArrowDown,
        NamedKey::ArrowLeft => Key::ArrowLeft,
        NamedKey::ArrowRight => Key::ArrowRight,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,

        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::Insert => Key::Insert,
        NamedKey::Enter => Key::Enter,
        NamedKey::Tab => Key::Tab,
        NamedKey::Space => Key::Space,
        NamedKey::Escape => Key::Escape,

        NamedKey::Shift => Key::Shift,
        NamedKey::Control => Key::Control,
        NamedKey::Alt => Key::Alt,
        NamedKey::Super => Key::Meta,

        NamedKey::F1 => Key::F1,
        NamedKey::F2 => Key::F2,
        NamedKey::F3 => Key::F3,
        NamedKey::F4 => Key::F4,
        NamedKey::F5 => Key::F5,
        NamedKey::F6 => Key::F6,
        NamedKey::F7 => Key::F7,
        NamedKey::F8 => Key::F8,
        NamedKey::F9 => Key::F9,
        NamedKey::F10 => Key::F10,
        NamedKey::F11 => Key::F11,
        NamedKey::F12 => Key::F12,

        _ => Key::Unknown(0),
    }
}

fn from_character(c: &str) -> Key {
    let mut chars = c.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Key::from_char(ch).unwrap_or(Key::Unknown(0)),
        _ => Key::Unknown(0),
    }
}

/// Converts a winit physical key code to a control key.
///
/// Physical codes name key positions, so letters stay put when the user
/// switches layouts.
pub fn from_winit_physical_key(physical: &PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = physical else {
        return Key::Unknown(0);
    };
    match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equal,
        KeyCode::BracketLeft => Key::BracketLeft,
        KeyCode::BracketRight => Key::BracketRight,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Quote => Key::Quote,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::Backquote => Key::Grave,
        _ => Key::Unknown(0),
    }
}

/// Converts winit modifiers to control modifiers.
pub fn from_winit_modifiers(modifiers: &Modifiers) -> KeyboardModifiers {
    let state = modifiers.state();
    KeyboardModifiers {
        shift: state.shift_key(),
        control: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Tracks modifier state across winit events and builds control events.
#[derive(Debug, Default)]
pub struct KeyboardInputHandler {
    modifiers: KeyboardModifiers,
}

impl KeyboardInputHandler {
    /// Creates a handler with no modifiers pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current modifier state.
    pub fn modifiers(&self) -> KeyboardModifiers {
        self.modifiers
    }

    /// Updates the modifier state from a `ModifiersChanged` event.
    pub fn update_modifiers(&mut self, modifiers: &Modifiers) {
        self.modifiers = from_winit_modifiers(modifiers);
    }

    /// Builds a key event, preferring the physical key and falling back to
    /// the logical one when the position has no mapping.
    pub fn key_event(&self, logical_key: &WinitKey, physical_key: &PhysicalKey, is_repeat: bool) -> KeyEvent {
        let key = match from_winit_physical_key(physical_key) {
            Key::Unknown(_) => from_winit_key(logical_key),
            key => key,
        };
        let mut event = KeyEvent::new(key, self.modifiers);
        event.is_repeat = is_repeat;
        event
    }

    /// Converts a winit key event into a pressed or released control event.
    pub fn control_event(&self, event: &WinitKeyEvent) -> ControlEvent {
        let key_event = self.key_event(&event.logical_key, &event.physical_key, event.repeat);
        match event.state {
            ElementState::Pressed => ControlEvent::KeyPressed(key_event),
            ElementState::Released => ControlEvent::KeyReleased(key_event),
        }
    }
}
