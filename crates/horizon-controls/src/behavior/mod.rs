//! Behaviors: the input handling half of a control.
//!
//! A behavior turns events and property changes on a control into model
//! updates. There are two ways to write one.
//!
//! # Standard Behaviors
//!
//! A [`StandardBehavior`] owns one state value per control and registers
//! handlers against it. It suits controls whose input handling lives in one
//! place. Install it with a [`StandardBehaviorInstaller`].
//!
//! # Aspects and Configurations
//!
//! A [`BehaviorAspect`] is a reusable slice of behavior bound to a
//! controller kind. A [`BehaviorConfiguration`] combines aspects, and
//! aspects asking for related controller kinds share one controller
//! instance per control:
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_controls::behavior::{
//!     BehaviorAspect, BehaviorConfiguration, Controller, ControllerKind, HandlerRegistry,
//! };
//! use horizon_controls::control::{Control, ControlBase};
//! use horizon_controls::event::{ControlEvent, EventType, MouseButton};
//! use parking_lot::Mutex;
//!
//! #[derive(Default)]
//! struct Slider {
//!     base: ControlBase,
//! }
//!
//! impl Control for Slider {
//!     fn control_base(&self) -> &ControlBase {
//!         &self.base
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Press {
//!     presses: Mutex<u32>,
//! }
//! impl Controller for Press {}
//!
//! #[derive(Default)]
//! struct Drag {
//!     press: Press,
//! }
//!
//! impl Controller for Drag {
//!     fn parent_kind() -> Option<ControllerKind> {
//!         Some(ControllerKind::of::<Press>())
//!     }
//!     fn as_parent(&self) -> Option<&dyn Controller> {
//!         Some(&self.press)
//!     }
//! }
//!
//! let mut pressing = BehaviorAspect::<Slider>::builder(|_: &Slider| Press::default());
//! pressing.register_event_handler(EventType::MousePressed, |press: &Press, _| {
//!     *press.presses.lock() += 1;
//! });
//!
//! let mut dragging = BehaviorAspect::<Slider>::builder(|_: &Slider| Drag::default());
//! dragging.register_event_handler(EventType::MouseReleased, |drag: &Drag, _| {
//!     assert_eq!(*drag.press.presses.lock(), 1);
//! });
//!
//! let configuration = BehaviorConfiguration::<Slider>::builder()
//!     .aspect(pressing.build())
//!     .aspect(dragging.build())
//!     .build()
//!     .unwrap();
//!
//! let slider = Arc::new(Slider::default());
//! slider.install_behavior(&configuration);
//!
//! slider.dispatch_event(&mut ControlEvent::mouse_pressed(MouseButton::Left, 4.0, 2.0));
//! slider.dispatch_event(&mut ControlEvent::mouse_released(MouseButton::Left, 4.0, 2.0));
//! ```

mod aspect;
mod cache;
mod configuration;
mod controller;
mod registry;
mod standard;

pub use aspect::{BehaviorAspect, BehaviorAspectBuilder};
pub use cache::{ControllerCache, ControllerHandle};
pub use configuration::{BehaviorConfiguration, BehaviorConfigurationBuilder};
pub use controller::{AsAny, Controller, ControllerFactory, ControllerKind, downcast, is_instance_of, project};
pub use registry::{HandlerRegistry, KeyBindingTable};
pub use standard::{StandardBehavior, StandardBehaviorContext, StandardBehaviorInstaller};

use std::sync::Arc;

use horizon_controls_core::Subscription;

/// Something that can install a behavior on a control of type `N`.
///
/// Implemented by [`BehaviorConfiguration`] and
/// [`StandardBehaviorInstaller`]. Pass one to
/// [`Control::install_behavior`](crate::control::Control::install_behavior).
pub trait BehaviorInstaller<N>: Send + Sync {
    /// Install on `control`, returning the subscription that uninstalls.
    fn install(&self, control: &Arc<N>) -> Subscription;
}
