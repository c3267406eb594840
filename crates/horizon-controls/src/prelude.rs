//! Prelude module for Horizon Controls.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```
//! use horizon_controls::prelude::*;
//! ```

// ============================================================================
// Reactive Primitives
// ============================================================================

pub use horizon_controls_core::{ConnectionId, ObservableProperty, Property, Signal, Subscription};

// ============================================================================
// Controls and Events
// ============================================================================

pub use crate::control::{Button, Control, ControlBase, ListBehavior, ListView, button_behavior};
pub use crate::event::{ControlEvent, EventType, MouseButton};
pub use crate::input::{Key, KeyCombination, KeyMap, KeyboardModifiers};

// ============================================================================
// Behaviors
// ============================================================================

pub use crate::behavior::{
    BehaviorAspect, BehaviorConfiguration, BehaviorInstaller, Controller, ControllerKind, HandlerRegistry,
    StandardBehavior, StandardBehaviorInstaller,
};

// ============================================================================
// Models
// ============================================================================

pub use crate::model::{FocusModel, ItemSource, MultipleSelectionModel, SelectionMode, SingleSelectionModel};
pub use crate::toggle::{ToggleGroupId, ToggleId, Toggles};

#[cfg(test)]
mod tests {
    #![allow(unused)]
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_prelude_types_exist() {
        let _signal: Signal<i32> = Signal::new();
        let _property: ObservableProperty<String> = ObservableProperty::new(String::new());
        let _combination = KeyCombination::ctrl(Key::A);
        let _toggles = Toggles::new();

        let items: Arc<dyn ItemSource<u8>> = Arc::new(vec![1, 2, 3]);
        let selection = MultipleSelectionModel::new(items.clone());
        let single = SingleSelectionModel::new(items.clone());
        let focus = FocusModel::new(items);
        assert_eq!(selection.selection_mode(), SelectionMode::Single);
        assert!(single.is_empty());
        assert_eq!(focus.item_count(), 3);
    }
}
