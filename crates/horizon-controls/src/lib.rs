//! Horizon Controls - controls, behaviors and selection models.
//!
//! This crate provides the non-visual half of a desktop control toolkit:
//!
//! - **Controls**: a shared [`ControlBase`](control::ControlBase) with ordered
//!   event delivery, plus a [`Button`](control::Button) and a
//!   [`ListView`](control::ListView)
//! - **Behaviors**: reusable input handling, either as a single
//!   [`StandardBehavior`](behavior::StandardBehavior) or as
//!   [`BehaviorAspect`](behavior::BehaviorAspect)s combined into a
//!   [`BehaviorConfiguration`](behavior::BehaviorConfiguration) that shares
//!   controllers between aspects
//! - **Models**: focus, single selection and multiple selection over an
//!   [`ItemSource`](model::ItemSource), and table cell positions
//! - **Toggle groups**: mutually exclusive selection of toggles
//! - **Key maps**: action bindings loaded from TOML
//!
//! Reactive primitives (signals, observable properties, subscriptions) come
//! from [`horizon_controls_core`] and are re-exported here.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_controls::prelude::*;
//!
//! fn main() -> horizon_controls::Result<()> {
//!     let button = Arc::new(Button::new("Save"));
//!     button.install_behavior(&button_behavior()?);
//!
//!     let saved = Arc::new(Property::new(false));
//!     let flag = saved.clone();
//!     button.action().connect(move |_| {
//!         flag.set(true);
//!     });
//!
//!     button.dispatch_event(&mut ControlEvent::key_pressed(Key::Enter, KeyboardModifiers::NONE));
//!     assert!(saved.get());
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! Every module logs through [`tracing`] under the targets listed in
//! [`logging::targets`](horizon_controls_core::logging::targets). Install
//! any `tracing` subscriber to see them.

pub mod behavior;
pub mod control;
pub mod error;
pub mod event;
pub mod input;
pub mod model;
pub mod prelude;
pub mod toggle;

pub use error::{Error, Result};
pub use horizon_controls_core::{
    ConnectionGuard, ConnectionId, ObservableProperty, PerfSpan, Property, Signal, Subscription, logging,
};
