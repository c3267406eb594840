//! Core systems for Horizon Controls.
//!
//! This crate provides the reactive primitives the control layer is built on:
//!
//! - **Signal/Slot System**: Ordered, re-entrant change notification
//! - **Property System**: Value cells with change detection and observable,
//!   shareable properties
//! - **Subscriptions**: Composable handles that reverse registrations
//! - **Logging**: Tracing targets and helpers shared by all crates
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_controls_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use horizon_controls_core::ObservableProperty;
//!
//! let armed = ObservableProperty::new(false);
//! let subscription = armed.subscribe(|armed| println!("armed: {armed}"));
//!
//! armed.set(true);
//! subscription.unsubscribe();
//! ```

pub mod logging;
pub mod property;
pub mod signal;
pub mod subscription;

pub use logging::PerfSpan;
pub use property::{ObservableProperty, Property};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use subscription::Subscription;
