//! Logging and tracing facilities for Horizon Controls.
//!
//! Horizon Controls uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_controls::behavior=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every event is emitted with one of the targets in [`targets`], so a
//! single subsystem can be enabled without the noise of the others.

/// Span names used throughout Horizon Controls for tracing.
pub mod span_names {
    /// Behavior installation span.
    pub const INSTALL: &str = "horizon_controls::install";
    /// Event dispatch span.
    pub const DISPATCH: &str = "horizon_controls::dispatch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_controls_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_controls_core::signal";
    /// Property system target.
    pub const PROPERTY: &str = "horizon_controls_core::property";
    /// Controls crate target.
    pub const CONTROLS: &str = "horizon_controls";
    /// Behavior installation and controller sharing.
    pub const BEHAVIOR: &str = "horizon_controls::behavior";
    /// Event dispatch on controls.
    pub const EVENT: &str = "horizon_controls::event";
    /// Selection models.
    pub const SELECTION: &str = "horizon_controls::selection";
    /// Focus model.
    pub const FOCUS: &str = "horizon_controls::focus";
    /// Toggle groups.
    pub const TOGGLE: &str = "horizon_controls::toggle";
    /// Key maps and key bindings.
    pub const KEYMAP: &str = "horizon_controls::keymap";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_controls::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with the crate
/// target filled in. The calling crate must depend on `tracing`.
#[macro_export]
macro_rules! controls_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_controls", $($arg)*)
    };
}

#[macro_export]
macro_rules! controls_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_controls", $($arg)*)
    };
}

#[macro_export]
macro_rules! controls_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_controls", $($arg)*)
    };
}

#[macro_export]
macro_rules! controls_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_controls", $($arg)*)
    };
}
