//! Selection of at most one item.

use std::fmt;
use std::sync::Arc;

use horizon_controls_core::ObservableProperty;
use horizon_controls_core::logging::targets;

use super::source::ItemSource;

/// The selected index and item pair shared by both selection models.
pub(crate) struct SelectionCursor<T> {
    index: ObservableProperty<Option<usize>>,
    item: ObservableProperty<Option<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> SelectionCursor<T> {
    pub(crate) fn new() -> Self {
        Self {
            index: ObservableProperty::new(None),
            item: ObservableProperty::new(None),
        }
    }

    /// Move the selected index and resolve the item from it.
    ///
    /// Clearing an already cleared index keeps an item that was selected
    /// without being in the list.
    pub(crate) fn update(&self, source: &dyn ItemSource<T>, index: Option<usize>) {
        let previous_index = self.index.get();
        let has_orphan = self.item.with(Option::is_some);
        self.index.set(index);
        if previous_index.is_none() && has_orphan && index.is_none() {
            return;
        }
        self.item.set(index.and_then(|index| source.item(index)));
    }

    /// Select an item that is not in the list, leaving the index alone.
    pub(crate) fn set_orphan(&self, item: T) {
        self.item.set(Some(item));
    }

    /// Clear both the index and the item unconditionally.
    pub(crate) fn reset(&self) {
        self.index.set(None);
        self.item.set(None);
    }

    pub(crate) fn index(&self) -> Option<usize> {
        self.index.get()
    }

    pub(crate) fn item(&self) -> Option<T> {
        self.item.get()
    }

    pub(crate) fn index_property(&self) -> &ObservableProperty<Option<usize>> {
        &self.index
    }

    pub(crate) fn item_property(&self) -> &ObservableProperty<Option<T>> {
        &self.item
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for SelectionCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionCursor")
            .field("index", &self.index)
            .field("item", &self.item)
            .finish()
    }
}

/// A selection model allowing at most one selected index.
///
/// Used by controls such as combo boxes and tab panes. Out of range
/// requests are ignored rather than reported.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use horizon_controls::model::SingleSelectionModel;
///
/// let model = SingleSelectionModel::new(Arc::new(vec!["red", "green", "blue"]));
/// model.select(1);
/// assert_eq!(model.selected_item(), Some("green"));
///
/// model.select_next();
/// model.select_next();
/// assert_eq!(model.selected_index(), Some(2));
/// ```
pub struct SingleSelectionModel<T> {
    source: Arc<dyn ItemSource<T>>,
    cursor: SelectionCursor<T>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> SingleSelectionModel<T> {
    /// Create a model with nothing selected.
    pub fn new(source: Arc<dyn ItemSource<T>>) -> Self {
        Self {
            source,
            cursor: SelectionCursor::new(),
        }
    }

    /// Select the item at `index`, replacing the selection.
    ///
    /// Does nothing if `index` is out of range.
    pub fn select(&self, index: usize) {
        if index >= self.source.item_count() {
            return;
        }
        tracing::trace!(target: targets::SELECTION, index, "select");
        self.cursor.update(self.source.as_ref(), Some(index));
    }

    /// Same as [`select`](Self::select); a single selection always replaces.
    pub fn clear_and_select(&self, index: usize) {
        self.select(index);
    }

    /// Select an item by value.
    ///
    /// The first equal item in the list is selected. An item not in the list
    /// becomes the selected item while the selected index stays as it was.
    /// `None` clears the selection, item included.
    pub fn select_item(&self, item: Option<T>) {
        let Some(item) = item else {
            self.cursor.reset();
            return;
        };
        match self.source.position_of(&item) {
            Some(index) => self.select(index),
            None => self.cursor.set_orphan(item),
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&self) {
        self.cursor.update(self.source.as_ref(), None);
    }

    /// Clear the selection if `index` is the selected index.
    pub fn clear_selection_at(&self, index: usize) {
        if self.selected_index() == Some(index) {
            self.clear_selection();
        }
    }

    /// Select the item before the selected one. Does nothing with no
    /// selection or at the first item.
    pub fn select_previous(&self) {
        if let Some(index) = self.selected_index()
            && index > 0
        {
            self.select(index - 1);
        }
    }

    /// Select the item after the selected one, or the first item when
    /// nothing is selected. Does nothing at the last item.
    pub fn select_next(&self) {
        match self.selected_index() {
            None => self.select(0),
            Some(index) => self.select(index + 1),
        }
    }

    /// Select the first item, if any.
    pub fn select_first(&self) {
        if self.source.item_count() > 0 {
            self.select(0);
        }
    }

    /// Select the last item, if any and not already selected.
    pub fn select_last(&self) {
        let count = self.source.item_count();
        if count > 0 && self.selected_index() != Some(count - 1) {
            self.select(count - 1);
        }
    }

    /// Check whether `index` is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected_index() == Some(index)
    }

    /// Check whether no index is selected.
    pub fn is_empty(&self) -> bool {
        self.selected_index().is_none()
    }

    /// The selected index.
    pub fn selected_index(&self) -> Option<usize> {
        self.cursor.index()
    }

    /// The selected item. May be an item outside the list, see
    /// [`select_item`](Self::select_item).
    pub fn selected_item(&self) -> Option<T> {
        self.cursor.item()
    }

    /// The selected index property, for observation.
    pub fn selected_index_property(&self) -> &ObservableProperty<Option<usize>> {
        self.cursor.index_property()
    }

    /// The selected item property, for observation.
    pub fn selected_item_property(&self) -> &ObservableProperty<Option<T>> {
        self.cursor.item_property()
    }

    /// Number of items in the underlying source.
    pub fn item_count(&self) -> usize {
        self.source.item_count()
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for SingleSelectionModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleSelectionModel")
            .field("cursor", &self.cursor)
            .finish()
    }
}

static_assertions::assert_impl_all!(SingleSelectionModel<String>: Send, Sync);
