//! Selection of any number of items.
//!
//! [`MultipleSelectionModel`] backs list-like views. In
//! [`SelectionMode::Single`] it behaves like a single selection; in
//! [`SelectionMode::Multiple`] indices accumulate until cleared.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_controls::model::{MultipleSelectionModel, SelectionMode};
//!
//! let items: Vec<u32> = (0..10).collect();
//! let selection = MultipleSelectionModel::new(Arc::new(items));
//! selection.set_selection_mode(SelectionMode::Multiple);
//!
//! // Listen for changes
//! selection.selection_changed.connect(|(added, removed)| {
//!     println!("Selection changed: +{} -{}", added.len(), removed.len());
//! });
//!
//! selection.select_range(2, 5);
//! assert_eq!(selection.selected_indices(), vec![2, 3, 4]);
//! assert_eq!(selection.selected_index(), Some(4));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use horizon_controls_core::logging::targets;
use horizon_controls_core::{ObservableProperty, Signal};
use parking_lot::RwLock;

use super::single_selection::SelectionCursor;
use super::source::ItemSource;

/// How many items a [`MultipleSelectionModel`] may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionMode {
    /// At most one item (default).
    #[default]
    Single,
    /// Any number of items.
    Multiple,
}

/// A selection model over a list that may select several indices.
///
/// The selected index and item always report the most recently selected
/// index. Out of range requests are ignored rather than reported.
pub struct MultipleSelectionModel<T> {
    source: Arc<dyn ItemSource<T>>,
    mode: ObservableProperty<SelectionMode>,
    indices: RwLock<BTreeSet<usize>>,
    cursor: SelectionCursor<T>,

    /// Emitted after the set of selected indices changes, with the indices
    /// added and the indices removed, each in ascending order.
    pub selection_changed: Signal<(Vec<usize>, Vec<usize>)>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> MultipleSelectionModel<T> {
    /// Create a model in [`SelectionMode::Single`] with nothing selected.
    pub fn new(source: Arc<dyn ItemSource<T>>) -> Self {
        Self {
            source,
            mode: ObservableProperty::new(SelectionMode::default()),
            indices: RwLock::new(BTreeSet::new()),
            cursor: SelectionCursor::new(),
            selection_changed: Signal::new(),
        }
    }

    /// The current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.mode.get()
    }

    /// The selection mode property, for observation.
    pub fn selection_mode_property(&self) -> &ObservableProperty<SelectionMode> {
        &self.mode
    }

    /// Change the selection mode.
    ///
    /// Switching to [`SelectionMode::Single`] keeps only the most recently
    /// selected index, or the greatest selected index if there is none.
    pub fn set_selection_mode(&self, mode: SelectionMode) {
        if !self.mode.set(mode) {
            return;
        }
        tracing::debug!(target: targets::SELECTION, ?mode, "selection mode changed");
        if mode == SelectionMode::Single
            && self.selected_count() > 1
            && let Some(last) = self.selected_index().or_else(|| self.indices.read().last().copied())
        {
            self.clear_and_select(last);
        }
    }

    /// Select `index`. In single mode this replaces the selection; in
    /// multiple mode it adds to it.
    pub fn select(&self, index: usize) {
        if index >= self.source.item_count() {
            return;
        }
        tracing::trace!(target: targets::SELECTION, index, "select");
        let single = self.selection_mode() == SelectionMode::Single;
        self.edit(|indices| {
            if single {
                indices.clear();
            }
            indices.insert(index);
        });
        self.cursor.update(self.source.as_ref(), Some(index));
    }

    /// Replace the whole selection with `index`.
    ///
    /// An out of range index clears the selection.
    pub fn clear_and_select(&self, index: usize) {
        if index >= self.source.item_count() {
            self.clear_selection();
            return;
        }
        self.edit(|indices| {
            indices.clear();
            indices.insert(index);
        });
        self.cursor.update(self.source.as_ref(), Some(index));
    }

    /// Select several indices at once.
    ///
    /// Out of range indices are skipped. The last valid index becomes the
    /// selected index; in single mode it is also the only one selected.
    pub fn select_indices(&self, index: usize, rest: &[usize]) {
        let count = self.source.item_count();
        let valid: Vec<usize> = std::iter::once(index)
            .chain(rest.iter().copied())
            .filter(|&index| index < count)
            .collect();
        self.select_sequence(valid);
    }

    /// Select the half-open range between `start` and `end`.
    ///
    /// With `start < end` this selects `start..end`, walking up. With
    /// `start > end` it selects `end + 1..=start`, walking down. Either way
    /// the last index walked becomes the selected index, and equal bounds
    /// select nothing.
    pub fn select_range(&self, start: usize, end: usize) {
        if start == end {
            return;
        }
        let count = self.source.item_count();
        let walk: Vec<usize> = if start < end {
            (start.min(count)..end.min(count)).collect()
        } else {
            ((end + 1).min(count)..start.saturating_add(1).min(count)).rev().collect()
        };
        tracing::trace!(target: targets::SELECTION, start, end, selected = walk.len(), "select range");
        self.select_sequence(walk);
    }

    /// Select every item. Only available in multiple mode.
    pub fn select_all(&self) {
        if self.selection_mode() == SelectionMode::Single {
            return;
        }
        let count = self.source.item_count();
        if count == 0 {
            return;
        }
        self.edit(|indices| indices.extend(0..count));
        self.cursor.update(self.source.as_ref(), Some(count - 1));
    }

    /// Select the first item.
    pub fn select_first(&self) {
        if self.source.item_count() > 0 {
            self.select(0);
        }
    }

    /// Select the last item.
    pub fn select_last(&self) {
        let count = self.source.item_count();
        if count > 0 {
            self.select(count - 1);
        }
    }

    /// Select the item before the selected index. Does nothing with no
    /// selection or at the first item.
    pub fn select_previous(&self) {
        if let Some(index) = self.selected_index()
            && index > 0
        {
            self.select(index - 1);
        }
    }

    /// Select the item after the selected index, or the first item when
    /// nothing is selected. Does nothing at the last item.
    pub fn select_next(&self) {
        match self.selected_index() {
            None => self.select(0),
            Some(index) => self.select(index + 1),
        }
    }

    /// Select an item by value, as [`SingleSelectionModel::select_item`]
    /// does.
    ///
    /// [`SingleSelectionModel::select_item`]: super::SingleSelectionModel::select_item
    pub fn select_item(&self, item: Option<T>) {
        let Some(item) = item else {
            self.edit(|indices| indices.clear());
            self.cursor.reset();
            return;
        };
        match self.source.position_of(&item) {
            Some(index) => self.select(index),
            None => self.cursor.set_orphan(item),
        }
    }

    /// Deselect everything.
    pub fn clear_selection(&self) {
        self.edit(|indices| indices.clear());
        self.cursor.update(self.source.as_ref(), None);
    }

    /// Deselect one index.
    ///
    /// If it was the selected index, the greatest remaining selected index
    /// takes its place.
    pub fn clear_selection_at(&self, index: usize) {
        self.edit(|indices| {
            indices.remove(&index);
        });
        if self.selected_index() != Some(index) {
            return;
        }
        let replacement = self.indices.read().last().copied();
        self.cursor.update(self.source.as_ref(), replacement);
    }

    /// Drop selected indices that no longer exist and re-resolve the
    /// selected item after the items changed.
    ///
    /// If the selected index itself is gone, the greatest remaining selected
    /// index takes its place.
    pub fn refresh(&self) {
        let count = self.source.item_count();
        self.edit(|indices| indices.retain(|&index| index < count));
        let index = match self.selected_index() {
            Some(index) if index < count => Some(index),
            Some(_) => self.indices.read().last().copied(),
            None => None,
        };
        self.cursor.update(self.source.as_ref(), index);
    }

    /// Check whether `index` is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.indices.read().contains(&index)
    }

    /// Check whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.read().is_empty()
    }

    /// Number of selected indices.
    pub fn selected_count(&self) -> usize {
        self.indices.read().len()
    }

    /// The selected indices in ascending order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.indices.read().iter().copied().collect()
    }

    /// The selected items, in index order.
    pub fn selected_items(&self) -> Vec<T> {
        self.selected_indices()
            .into_iter()
            .filter_map(|index| self.source.item(index))
            .collect()
    }

    /// The most recently selected index.
    pub fn selected_index(&self) -> Option<usize> {
        self.cursor.index()
    }

    /// The most recently selected item.
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

    /// Select already validated indices in order, the last one becoming the
    /// selected index.
    fn select_sequence(&self, walk: Vec<usize>) {
        let Some(&last) = walk.last() else {
            return;
        };
        if self.selection_mode() == SelectionMode::Single {
            self.clear_and_select(last);
            return;
        }
        self.edit(|indices| indices.extend(walk));
        self.cursor.update(self.source.as_ref(), Some(last));
    }

    /// Apply `change` to the selected indices and announce the difference.
    ///
    /// The lock is released before `selection_changed` is emitted.
    fn edit<F>(&self, change: F)
    where
        F: FnOnce(&mut BTreeSet<usize>),
    {
        let (added, removed) = {
            let mut indices = self.indices.write();
            let before = indices.clone();
            change(&mut indices);
            let added: Vec<usize> = indices.difference(&before).copied().collect();
            let removed: Vec<usize> = before.difference(&indices).copied().collect();
            (added, removed)
        };
        if !added.is_empty() || !removed.is_empty() {
            self.selection_changed.emit((added, removed));
        }
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for MultipleSelectionModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipleSelectionModel")
            .field("mode", &self.mode)
            .field("indices", &*self.indices.read())
            .field("cursor", &self.cursor)
            .finish()
    }
}

static_assertions::assert_impl_all!(MultipleSelectionModel<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn numbers(count: u32) -> MultipleSelectionModel<u32> {
        let items: Vec<u32> = (0..count).collect();
        MultipleSelectionModel::new(Arc::new(items))
    }

    fn multiple(count: u32) -> MultipleSelectionModel<u32> {
        let model = numbers(count);
        model.set_selection_mode(SelectionMode::Multiple);
        model
    }

    #[test]
    fn test_single_mode_replaces() {
        let model = numbers(20);
        model.select(5);
        model.select(10);
        assert_eq!(model.selected_indices(), vec![10]);
        assert_eq!(model.selected_items(), vec![10]);
    }

    #[test]
    fn test_multiple_mode_accumulates() {
        let model = multiple(20);
        model.select(5);
        model.select(10);
        assert_eq!(model.selected_indices(), vec![5, 10]);
        assert_eq!(model.selected_index(), Some(10));
    }

    #[test]
    fn test_select_range_ascending() {
        let model = multiple(10);
        model.select_range(2, 6);
        assert_eq!(model.selected_indices(), vec![2, 3, 4, 5]);
        assert_eq!(model.selected_index(), Some(5));
    }

    #[test]
    fn test_select_range_descending() {
        let model = multiple(10);
        model.select_range(6, 2);
        assert_eq!(model.selected_indices(), vec![3, 4, 5, 6]);
        assert_eq!(model.selected_index(), Some(3));
        assert_eq!(model.selected_item(), Some(3));
    }

    #[test]
    fn test_select_range_degenerate() {
        let model = multiple(10);
        model.select_range(4, 4);
        model.select_range(20, 30);
        assert!(model.is_empty());
        assert_eq!(model.selected_index(), None);

        model.select_range(8, 15);
        assert_eq!(model.selected_indices(), vec![8, 9]);
        assert_eq!(model.selected_index(), Some(9));
    }

    #[test]
    fn test_select_indices_skips_invalid() {
        let model = multiple(20);
        model.select_indices(750, &[3, 7000, 4, 85]);
        assert_eq!(model.selected_indices(), vec![3, 4]);
        assert_eq!(model.selected_index(), Some(4));

        let single = numbers(20);
        single.select_indices(750, &[3, 7000, 4, 85]);
        assert_eq!(single.selected_indices(), vec![4]);

        let none = multiple(20);
        none.select_indices(100, &[200]);
        assert_eq!(none.selected_index(), None);
        assert!(none.is_empty());
    }

    #[test]
    fn test_switch_to_single_keeps_last_selected() {
        let model = multiple(20);
        model.select_indices(5, &[10, 15]);
        assert_eq!(model.selected_count(), 3);

        model.set_selection_mode(SelectionMode::Single);
        assert_eq!(model.selected_indices(), vec![15]);
        assert_eq!(model.selected_index(), Some(15));
        assert!(!model.is_selected(5));
    }

    #[test]
    fn test_select_all() {
        let single = numbers(5);
        single.select_all();
        assert!(single.is_empty());

        single.select(3);
        single.select_all();
        assert_eq!(single.selected_indices(), vec![3]);

        let model = multiple(5);
        model.select_all();
        assert_eq!(model.selected_count(), 5);
        assert_eq!(model.selected_index(), Some(4));

        model.clear_selection_at(2);
        assert!(model.is_selected(1));
        assert!(!model.is_selected(2));
        assert!(model.is_selected(3));
    }

    #[test]
    fn test_clear_selection_at_selected_index() {
        let model = multiple(10);
        model.select_indices(2, &[7, 4]);
        model.clear_selection_at(4);
        assert_eq!(model.selected_index(), Some(7));

        model.clear_selection_at(2);
        model.clear_selection_at(7);
        assert!(model.is_empty());
        assert_eq!(model.selected_index(), None);
        assert_eq!(model.selected_item(), None);
    }

    #[test]
    fn test_navigation_in_single_mode() {
        let model = numbers(3);
        model.select_next();
        model.select_next();
        assert_eq!(model.selected_indices(), vec![1]);

        model.select_last();
        model.select_next();
        assert_eq!(model.selected_index(), Some(2));

        model.select_first();
        model.select_previous();
        assert_eq!(model.selected_indices(), vec![0]);
    }

    #[test]
    fn test_select_item() {
        let model = multiple(5);
        model.select_item(Some(3));
        assert!(model.is_selected(3));

        model.select_item(Some(99));
        assert_eq!(model.selected_item(), Some(99));
        assert_eq!(model.selected_index(), Some(3));

        model.select_item(None);
        assert!(model.is_empty());
        assert_eq!(model.selected_item(), None);
    }

    #[test]
    fn test_selection_changed_reports_difference() {
        let model = multiple(10);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let c = changes.clone();
        model.selection_changed.connect(move |change| c.lock().push(change.clone()));

        model.select_range(1, 3);
        model.clear_and_select(2);
        model.select(2);
        model.clear_selection();

        assert_eq!(
            *changes.lock(),
            vec![(vec![1, 2], vec![]), (vec![], vec![1]), (vec![], vec![2])]
        );
    }

    #[test]
    fn test_refresh_drops_missing_indices() {
        let items = ObservableProperty::new(vec!["a", "b", "c", "d"]);
        let model = MultipleSelectionModel::new(Arc::new(items.clone()));
        model.set_selection_mode(SelectionMode::Multiple);
        model.select_indices(1, &[3]);

        items.set(vec!["a", "b"]);
        model.refresh();
        assert_eq!(model.selected_indices(), vec![1]);
        assert_eq!(model.selected_index(), Some(1));
        assert_eq!(model.selected_item(), Some("b"));

        items.set(Vec::new());
        model.refresh();
        assert!(model.is_empty());
        assert_eq!(model.selected_index(), None);
    }

    #[test]
    fn test_single_mode_after_shrink_keeps_one_index() {
        let items = ObservableProperty::new((0..6u32).collect::<Vec<_>>());
        let model = MultipleSelectionModel::new(Arc::new(items.clone()));
        model.set_selection_mode(SelectionMode::Multiple);
        model.select_indices(1, &[2, 5]);

        items.set(vec![0, 1, 2, 3]);
        model.refresh();
        assert_eq!(model.selected_index(), Some(2));

        model.set_selection_mode(SelectionMode::Single);
        assert_eq!(model.selected_indices(), vec![2]);
        assert_eq!(model.selected_count(), 1);
    }

    #[test]
    fn test_select_range_with_huge_bounds() {
        let model = multiple(3);
        model.select_range(0, usize::MAX);
        assert_eq!(model.selected_indices(), vec![0, 1, 2]);
        assert_eq!(model.selected_index(), Some(2));

        let model = multiple(3);
        model.select_range(usize::MAX, 0);
        assert_eq!(model.selected_indices(), vec![1, 2]);
        assert_eq!(model.selected_index(), Some(1));

        let model = multiple(3);
        model.select_range(usize::MAX - 1, usize::MAX);
        model.select_range(usize::MAX, usize::MAX - 10);
        assert!(model.is_empty());
    }
}
