//! Keyboard focus within an item view.
//!
//! A [`FocusModel`] tracks which item of a list has keyboard focus. Focus is
//! independent of selection: arrow keys with Ctrl held typically move focus
//! without changing the selection.

use std::fmt;
use std::sync::Arc;

use horizon_controls_core::ObservableProperty;
use horizon_controls_core::logging::targets;

use super::source::ItemSource;

/// The focused index and item of an item view.
///
/// The focused item always equals the item at the focused index as resolved
/// through the model's [`ItemSource`]. With no focus both are `None`.
pub struct FocusModel<T> {
    source: Arc<dyn ItemSource<T>>,
    focused_index: ObservableProperty<Option<usize>>,
    focused_item: ObservableProperty<Option<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> FocusModel<T> {
    /// Create an unfocused model over `source`.
    pub fn new(source: Arc<dyn ItemSource<T>>) -> Self {
        Self {
            source,
            focused_index: ObservableProperty::new(None),
            focused_item: ObservableProperty::new(None),
        }
    }

    /// Focus the item at `index`.
    ///
    /// An index past the last item clears focus. The focused item is
    /// re-resolved even when the index is unchanged, so a replaced item is
    /// picked up.
    pub fn focus(&self, index: usize) {
        if index >= self.source.item_count() {
            self.clear_focus();
            return;
        }
        tracing::trace!(target: targets::FOCUS, index, "focus");
        self.focused_index.set(Some(index));
        self.focused_item.set(self.source.item(index));
    }

    /// Remove focus.
    pub fn clear_focus(&self) {
        self.focused_index.set(None);
        self.focused_item.set(None);
    }

    /// Focus the first item equal to `item`. Does nothing if there is none.
    pub fn focus_item(&self, item: &T) {
        if let Some(index) = self.source.position_of(item) {
            self.focus(index);
        }
    }

    /// Move focus one item up, stopping at the first item.
    ///
    /// With no focus, the first item is focused.
    pub fn focus_previous(&self) {
        match self.focused_index() {
            None => self.focus(0),
            Some(index) => self.focus(index.saturating_sub(1)),
        }
    }

    /// Move focus one item down, stopping at the last item.
    ///
    /// With no focus, the first item is focused.
    pub fn focus_next(&self) {
        match self.focused_index() {
            None => self.focus(0),
            Some(index) if index + 1 < self.source.item_count() => self.focus(index + 1),
            Some(_) => {}
        }
    }

    /// Re-resolve focus after the items changed.
    ///
    /// Focus is cleared if the focused index no longer exists.
    pub fn refresh(&self) {
        match self.focused_index() {
            Some(index) => self.focus(index),
            None => self.clear_focus(),
        }
    }

    /// The focused index.
    pub fn focused_index(&self) -> Option<usize> {
        self.focused_index.get()
    }

    /// The focused item.
    pub fn focused_item(&self) -> Option<T> {
        self.focused_item.get()
    }

    /// Check whether the item at `index` has focus.
    pub fn is_focused(&self, index: usize) -> bool {
        index < self.source.item_count() && self.focused_index() == Some(index)
    }

    /// The focused index property, for observation.
    pub fn focused_index_property(&self) -> &ObservableProperty<Option<usize>> {
        &self.focused_index
    }

    /// The focused item property, for observation.
    pub fn focused_item_property(&self) -> &ObservableProperty<Option<T>> {
        &self.focused_item
    }

    /// Number of items in the underlying source.
    pub fn item_count(&self) -> usize {
        self.source.item_count()
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for FocusModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusModel")
            .field("focused_index", &self.focused_index)
            .field("focused_item", &self.focused_item)
            .finish()
    }
}

static_assertions::assert_impl_all!(FocusModel<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn model_over(items: &[&'static str]) -> (ObservableProperty<Vec<&'static str>>, FocusModel<&'static str>) {
        let items = ObservableProperty::new(items.to_vec());
        let model = FocusModel::new(Arc::new(items.clone()));
        (items, model)
    }

    #[test]
    fn test_focus_out_of_range_clears() {
        let (_, model) = model_over(&["a", "b", "c"]);
        model.focus(1);
        assert_eq!(model.focused_item(), Some("b"));

        model.focus(3);
        assert_eq!(model.focused_index(), None);
        assert_eq!(model.focused_item(), None);

        model.focus(2);
        model.clear_focus();
        assert_eq!(model.focused_index(), None);
        assert_eq!(model.focused_item(), None);
    }

    #[test]
    fn test_focus_next_saturates() {
        let (_, model) = model_over(&["a", "b", "c", "d"]);
        model.focus(0);
        for _ in 0..model.item_count() - 1 {
            model.focus_next();
        }
        assert_eq!(model.focused_index(), Some(3));

        model.focus_next();
        assert_eq!(model.focused_index(), Some(3));
        assert_eq!(model.focused_item(), Some("d"));
    }

    #[test]
    fn test_unfocused_moves_start_at_first_item() {
        let (_, model) = model_over(&["a", "b", "c"]);
        model.focus_next();
        assert_eq!(model.focused_index(), Some(0));

        model.clear_focus();
        model.focus_previous();
        assert_eq!(model.focused_index(), Some(0));
        model.focus_previous();
        assert_eq!(model.focused_index(), Some(0));

        // Starting unfocused, item_count moves reach the last item.
        model.clear_focus();
        for _ in 0..model.item_count() + 2 {
            model.focus_next();
        }
        assert_eq!(model.focused_index(), Some(2));
    }

    #[test]
    fn test_empty_source_never_focuses() {
        let (_, model) = model_over(&[]);
        model.focus_next();
        model.focus_previous();
        model.focus(0);
        assert_eq!(model.focused_index(), None);
        assert!(!model.is_focused(0));
    }

    #[test]
    fn test_focus_item_and_is_focused() {
        let (_, model) = model_over(&["a", "b", "b"]);
        model.focus_item(&"b");
        assert_eq!(model.focused_index(), Some(1));
        assert!(model.is_focused(1));
        assert!(!model.is_focused(2));

        model.focus_item(&"z");
        assert_eq!(model.focused_index(), Some(1));
    }

    #[test]
    fn test_refocus_same_index_refreshes_item() {
        let (items, model) = model_over(&["a", "b"]);
        model.focus(1);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = model.focused_item_property().subscribe(move |item| s.lock().push(*item));

        items.set(vec!["a", "x"]);
        model.focus(1);
        assert_eq!(model.focused_item(), Some("x"));
        assert_eq!(*seen.lock(), vec![Some("x")]);
    }

    #[test]
    fn test_refresh_after_items_shrink() {
        let (items, model) = model_over(&["a", "b", "c"]);
        model.focus(2);

        items.set(vec!["a"]);
        model.refresh();
        assert_eq!(model.focused_index(), None);
        assert_eq!(model.focused_item(), None);
    }
}
