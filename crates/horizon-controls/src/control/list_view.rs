//! List view control and its keyboard behavior.
//!
//! A [`ListView`] owns an observable item list together with a
//! [`MultipleSelectionModel`] and a [`FocusModel`] over it. The models
//! follow edits to the list on their own.
//!
//! [`ListBehavior`] is a standard behavior translating key presses into
//! selection and focus moves. Its bindings come from a [`KeyMap`], so they
//! can be overridden from configuration:
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_controls::behavior::StandardBehaviorInstaller;
//! use horizon_controls::control::{Control, ListBehavior, ListView};
//! use horizon_controls::event::ControlEvent;
//! use horizon_controls::input::{Key, KeyMap, KeyboardModifiers};
//!
//! let overrides = KeyMap::from_toml_str(r#"
//!     [bindings]
//!     select-next = ["J"]
//! "#).unwrap();
//!
//! let list = Arc::new(ListView::new(vec!["one", "two", "three"]));
//! list.install_behavior(&StandardBehaviorInstaller::new(ListBehavior::with_key_map(&overrides)));
//!
//! list.dispatch_event(&mut ControlEvent::key_pressed(Key::J, KeyboardModifiers::NONE));
//! list.dispatch_event(&mut ControlEvent::key_pressed(Key::J, KeyboardModifiers::NONE));
//! assert_eq!(list.selection_model().selected_item(), Some("two"));
//! ```

use std::fmt;
use std::sync::Arc;

use horizon_controls_core::{ObservableProperty, controls_debug};

use super::{Control, ControlBase};
use crate::behavior::{HandlerRegistry, StandardBehavior, StandardBehaviorContext};
use crate::event::EventType;
use crate::input::{Key, KeyCombination, KeyMap};
use crate::model::{FocusModel, ItemSource, MultipleSelectionModel, SelectionMode};

/// Action names understood by [`ListBehavior`].
pub mod list_actions {
    /// Select the item above the focused one.
    pub const SELECT_PREVIOUS: &str = "select-previous";
    /// Select the item below the focused one.
    pub const SELECT_NEXT: &str = "select-next";
    /// Select the first item.
    pub const SELECT_FIRST: &str = "select-first";
    /// Select the last item.
    pub const SELECT_LAST: &str = "select-last";
    /// Add the item above the focused one to the selection.
    pub const EXTEND_PREVIOUS: &str = "extend-previous";
    /// Add the item below the focused one to the selection.
    pub const EXTEND_NEXT: &str = "extend-next";
    /// Move focus up without selecting.
    pub const FOCUS_PREVIOUS: &str = "focus-previous";
    /// Move focus down without selecting.
    pub const FOCUS_NEXT: &str = "focus-next";
    /// Select every item.
    pub const SELECT_ALL: &str = "select-all";
    /// Deselect everything.
    pub const CLEAR_SELECTION: &str = "clear-selection";
}

/// A vertical list of items.
pub struct ListView<T> {
    base: ControlBase,
    items: ObservableProperty<Vec<T>>,
    selection: Arc<MultipleSelectionModel<T>>,
    focus: Arc<FocusModel<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> ListView<T> {
    /// Create a list showing `items`.
    pub fn new(items: Vec<T>) -> Self {
        let items = ObservableProperty::new(items);
        let source: Arc<dyn ItemSource<T>> = Arc::new(items.clone());
        let selection = Arc::new(MultipleSelectionModel::new(source.clone()));
        let focus = Arc::new(FocusModel::new(source));

        let selection_ref = Arc::downgrade(&selection);
        let focus_ref = Arc::downgrade(&focus);
        // The subscription lives as long as the item property.
        let _ = items.subscribe(move |_| {
            if let Some(selection) = selection_ref.upgrade() {
                selection.refresh();
            }
            if let Some(focus) = focus_ref.upgrade() {
                focus.refresh();
            }
        });

        Self {
            base: ControlBase::new(),
            items,
            selection,
            focus,
        }
    }

    /// A snapshot of the items.
    pub fn items(&self) -> Vec<T> {
        self.items.get()
    }

    /// Replace the items. Selection and focus drop indices that no longer
    /// exist.
    pub fn set_items(&self, items: Vec<T>) {
        self.items.set(items);
    }

    /// The item list property.
    pub fn items_property(&self) -> &ObservableProperty<Vec<T>> {
        &self.items
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.items.with(Vec::len)
    }

    /// The selection model.
    pub fn selection_model(&self) -> &Arc<MultipleSelectionModel<T>> {
        &self.selection
    }

    /// The focus model.
    pub fn focus_model(&self) -> &Arc<FocusModel<T>> {
        &self.focus
    }
}

impl<T: Send + Sync + 'static> Control for ListView<T> {
    fn control_base(&self) -> &ControlBase {
        &self.base
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for ListView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListView")
            .field("items", &self.items)
            .field("selection", &self.selection)
            .field("focus", &self.focus)
            .finish()
    }
}

/// Per-list state of a [`ListBehavior`]: the models it drives.
pub struct ListBehaviorState<T> {
    selection: Arc<MultipleSelectionModel<T>>,
    focus: Arc<FocusModel<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> ListBehaviorState<T> {
    /// Whether the list allows several selected items.
    pub fn is_multiple(&self) -> bool {
        self.selection.selection_mode() == SelectionMode::Multiple
    }

    /// The index keyboard moves start from.
    fn anchor(&self) -> Option<usize> {
        self.focus.focused_index().or_else(|| self.selection.selected_index())
    }

    fn select_only(&self, index: usize) {
        self.selection.clear_and_select(index);
        self.focus.focus(index);
    }

    fn extend_to(&self, index: usize) {
        self.selection.select(index);
        self.focus.focus(index);
    }

    /// Select the previous item alone.
    pub fn select_previous(&self) {
        match self.anchor() {
            None => self.select_first(),
            Some(0) => {}
            Some(index) => self.select_only(index - 1),
        }
    }

    /// Select the next item alone.
    pub fn select_next(&self) {
        match self.anchor() {
            None => self.select_first(),
            Some(index) if index + 1 < self.focus.item_count() => self.select_only(index + 1),
            Some(_) => {}
        }
    }

    /// Select the first item alone.
    pub fn select_first(&self) {
        if self.focus.item_count() > 0 {
            self.select_only(0);
        }
    }

    /// Select the last item alone.
    pub fn select_last(&self) {
        let count = self.focus.item_count();
        if count > 0 {
            self.select_only(count - 1);
        }
    }

    /// Add the previous item to the selection.
    pub fn extend_previous(&self) {
        if let Some(index) = self.anchor()
            && index > 0
        {
            self.extend_to(index - 1);
        }
    }

    /// Add the next item to the selection.
    pub fn extend_next(&self) {
        match self.anchor() {
            None => self.select_first(),
            Some(index) if index + 1 < self.focus.item_count() => self.extend_to(index + 1),
            Some(_) => {}
        }
    }

    /// Move focus up.
    pub fn focus_previous(&self) {
        self.focus.focus_previous();
    }

    /// Move focus down.
    pub fn focus_next(&self) {
        self.focus.focus_next();
    }

    /// Select everything, focusing the last item.
    pub fn select_all(&self) {
        self.selection.select_all();
        if let Some(last) = self.selection.selected_index() {
            self.focus.focus(last);
        }
    }

    /// Deselect everything, leaving focus alone.
    pub fn clear_selection(&self) {
        self.selection.clear_selection();
    }

    /// Focus the first item if nothing has focus yet.
    pub fn ensure_focus(&self) {
        if self.focus.focused_index().is_none() {
            self.focus.focus(0);
        }
    }
}

impl<T> fmt::Debug for ListBehaviorState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListBehaviorState").finish_non_exhaustive()
    }
}

type ListAction<T> = fn(&ListBehaviorState<T>);

/// Keyboard navigation for [`ListView`].
#[derive(Debug, Clone)]
pub struct ListBehavior {
    key_map: KeyMap,
}

impl Default for ListBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl ListBehavior {
    /// A behavior using [`default_key_map`](Self::default_key_map).
    pub fn new() -> Self {
        Self {
            key_map: Self::default_key_map(),
        }
    }

    /// A behavior using the default bindings with `overrides` merged over
    /// them.
    pub fn with_key_map(overrides: &KeyMap) -> Self {
        let mut key_map = Self::default_key_map();
        key_map.merge(overrides);
        Self { key_map }
    }

    /// The bindings in effect.
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// The default list bindings.
    pub fn default_key_map() -> KeyMap {
        KeyMap::new()
            .with_binding(list_actions::SELECT_PREVIOUS, KeyCombination::key_only(Key::ArrowUp))
            .with_binding(list_actions::SELECT_NEXT, KeyCombination::key_only(Key::ArrowDown))
            .with_binding(list_actions::SELECT_FIRST, KeyCombination::key_only(Key::Home))
            .with_binding(list_actions::SELECT_LAST, KeyCombination::key_only(Key::End))
            .with_binding(list_actions::EXTEND_PREVIOUS, KeyCombination::shift(Key::ArrowUp))
            .with_binding(list_actions::EXTEND_NEXT, KeyCombination::shift(Key::ArrowDown))
            .with_binding(list_actions::FOCUS_PREVIOUS, KeyCombination::ctrl(Key::ArrowUp))
            .with_binding(list_actions::FOCUS_NEXT, KeyCombination::ctrl(Key::ArrowDown))
            .with_binding(list_actions::SELECT_ALL, KeyCombination::ctrl(Key::A))
            .with_binding(list_actions::CLEAR_SELECTION, KeyCombination::key_only(Key::Escape))
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> StandardBehavior<ListView<T>> for ListBehavior {
    type State = ListBehaviorState<T>;

    fn create_state(&self, control: &Arc<ListView<T>>) -> ListBehaviorState<T> {
        ListBehaviorState {
            selection: control.selection.clone(),
            focus: control.focus.clone(),
        }
    }

    fn install(&self, context: &mut StandardBehaviorContext<'_, ListView<T>, ListBehaviorState<T>>) {
        // (action, needs multiple selection, handler)
        let actions: [(&str, bool, ListAction<T>); 10] = [
            (list_actions::SELECT_PREVIOUS, false, ListBehaviorState::select_previous),
            (list_actions::SELECT_NEXT, false, ListBehaviorState::select_next),
            (list_actions::SELECT_FIRST, false, ListBehaviorState::select_first),
            (list_actions::SELECT_LAST, false, ListBehaviorState::select_last),
            (list_actions::EXTEND_PREVIOUS, true, ListBehaviorState::extend_previous),
            (list_actions::EXTEND_NEXT, true, ListBehaviorState::extend_next),
            (list_actions::FOCUS_PREVIOUS, false, ListBehaviorState::focus_previous),
            (list_actions::FOCUS_NEXT, false, ListBehaviorState::focus_next),
            (list_actions::SELECT_ALL, true, ListBehaviorState::select_all),
            (list_actions::CLEAR_SELECTION, false, ListBehaviorState::clear_selection),
        ];

        for (action, needs_multiple, handler) in actions {
            for &combination in self.key_map.bindings(action) {
                if needs_multiple {
                    context.register_key_pressed_handler_if(combination, ListBehaviorState::<T>::is_multiple, handler);
                } else {
                    context.register_key_pressed_handler(combination, handler);
                }
            }
        }

        context.register_event_handler(EventType::FocusGained, |state: &ListBehaviorState<T>, _| {
            state.ensure_focus();
        });
        controls_debug!(actions = self.key_map.actions().count(), "list behavior installed");
    }
}

static_assertions::assert_impl_all!(ListView<String>: Send, Sync);
