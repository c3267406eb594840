//! Push button control.
//!
//! A [`Button`] is armed while the pointer or the Space key holds it down
//! and fires its [`action`](Button::action) signal when released while
//! still armed. Enter fires it directly.
//!
//! The input handling is split into aspects that all resolve to one
//! [`ButtonController`] per button: the press aspect only needs the
//! arming half ([`ArmController`]), while activation and focus handling
//! need the whole controller.

use std::fmt;
use std::sync::Arc;

use horizon_controls_core::logging::targets;
use horizon_controls_core::{ObservableProperty, Signal};

use super::{Control, ControlBase};
use crate::behavior::{BehaviorAspect, BehaviorConfiguration, Controller, ControllerKind, HandlerRegistry};
use crate::error::ConfigurationError;
use crate::event::{ControlEvent, EventType, MouseButton};
use crate::input::{Key, KeyCombination};

/// A clickable push button.
pub struct Button {
    base: ControlBase,
    text: ObservableProperty<String>,
    armed: ObservableProperty<bool>,
    action: Arc<Signal<()>>,
}

impl Button {
    /// Create a button with a label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: ControlBase::new(),
            text: ObservableProperty::new(text.into()),
            armed: ObservableProperty::new(false),
            action: Arc::new(Signal::new()),
        }
    }

    /// The label text.
    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Set the label text.
    pub fn set_text(&self, text: impl Into<String>) {
        self.text.set(text.into());
    }

    /// The label text property.
    pub fn text_property(&self) -> &ObservableProperty<String> {
        &self.text
    }

    /// Check if the button is held down.
    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }

    /// The armed property.
    pub fn armed_property(&self) -> &ObservableProperty<bool> {
        &self.armed
    }

    /// Emitted when the button fires.
    pub fn action(&self) -> &Signal<()> {
        &self.action
    }

    /// Fire the button programmatically. Disabled buttons do not fire.
    pub fn fire(&self) {
        if !self.base.is_disabled() {
            self.action.emit(());
        }
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Control for Button {
    fn control_base(&self) -> &ControlBase {
        &self.base
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text.get())
            .field("armed", &self.armed.get())
            .field("base", &self.base)
            .finish()
    }
}

/// Arms and disarms a button.
#[derive(Debug, Clone)]
pub struct ArmController {
    armed: ObservableProperty<bool>,
}

impl ArmController {
    /// Create a controller for `button`.
    pub fn new(button: &Button) -> Self {
        Self {
            armed: button.armed.clone(),
        }
    }

    /// Hold the button down.
    pub fn arm(&self) {
        self.armed.set(true);
    }

    /// Release the button without firing.
    pub fn disarm(&self) {
        self.armed.set(false);
    }

    /// Check if the button is held down.
    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }
}

impl Controller for ArmController {}

/// Arming plus firing.
#[derive(Debug, Clone)]
pub struct ButtonController {
    arm: ArmController,
    action: Arc<Signal<()>>,
}

impl ButtonController {
    /// Create a controller for `button`.
    pub fn new(button: &Button) -> Self {
        Self {
            arm: ArmController::new(button),
            action: button.action.clone(),
        }
    }

    /// The arming half of this controller.
    pub fn arm(&self) -> &ArmController {
        &self.arm
    }

    /// Fire the action.
    pub fn fire(&self) {
        tracing::trace!(target: targets::CONTROLS, "button fired");
        self.action.emit(());
    }

    /// Release the button, firing if it was armed.
    pub fn release(&self) {
        if self.arm.is_armed() {
            self.arm.disarm();
            self.fire();
        }
    }
}

impl Controller for ButtonController {
    fn parent_kind() -> Option<ControllerKind> {
        Some(ControllerKind::of::<ArmController>())
    }

    fn as_parent(&self) -> Option<&dyn Controller> {
        Some(&self.arm)
    }
}

fn press_aspect() -> BehaviorAspect<Button> {
    let mut press = BehaviorAspect::<Button>::builder(ArmController::new);
    press
        .register_event_handler(EventType::MousePressed, |arm: &ArmController, event| {
            if event.as_mouse().and_then(|mouse| mouse.button) == Some(MouseButton::Left) {
                arm.arm();
                event.consume();
            }
        })
        .register_event_handler(EventType::MouseExited, |arm: &ArmController, _| arm.disarm());
    press.build()
}

fn activation_aspect() -> BehaviorAspect<Button> {
    let mut activation = BehaviorAspect::<Button>::builder(ButtonController::new);
    activation
        .register_event_handler(EventType::MouseReleased, |button: &ButtonController, event| {
            if event.as_mouse().and_then(|mouse| mouse.button) == Some(MouseButton::Left) {
                button.release();
                event.consume();
            }
        })
        .register_key_pressed_handler(KeyCombination::key_only(Key::Space), |button: &ButtonController| {
            button.arm().arm();
        })
        .register_key_pressed_handler(KeyCombination::key_only(Key::Enter), ButtonController::fire)
        .register_event_handler(EventType::KeyReleased, |button: &ButtonController, event: &mut ControlEvent| {
            if event.as_key().is_some_and(|key| key.key == Key::Space) {
                button.release();
                event.consume();
            }
        });
    activation.build()
}

fn focus_aspect() -> BehaviorAspect<Button> {
    let mut focus = BehaviorAspect::<Button>::builder(ButtonController::new);
    focus.register_property_listener(
        |button: &Button| button.control_base().focused().clone(),
        |button: &ButtonController, focused: &bool| {
            if !focused {
                button.arm().disarm();
            }
        },
    );
    focus.build()
}

/// The standard button behavior: pointer and keyboard activation, and
/// disarming when focus is lost.
pub fn button_behavior() -> Result<BehaviorConfiguration<Button>, ConfigurationError> {
    BehaviorConfiguration::builder()
        .aspect(press_aspect())
        .aspect(activation_aspect())
        .aspect(focus_aspect())
        .build()
}

static_assertions::assert_impl_all!(Button: Send, Sync);
