//! Integration tests for the focus and selection models.

use std::sync::Arc;

use horizon_controls::ObservableProperty;
use horizon_controls::model::{FocusModel, ItemSource, MultipleSelectionModel, SelectionMode, SingleSelectionModel};
use parking_lot::Mutex;

fn letters(count: u8) -> ObservableProperty<Vec<char>> {
    ObservableProperty::new((0..count).map(|offset| (b'a' + offset) as char).collect())
}

fn source(items: &ObservableProperty<Vec<char>>) -> Arc<dyn ItemSource<char>> {
    Arc::new(items.clone())
}

#[test]
fn test_focus_walks_the_whole_list() {
    let items = letters(5);
    let focus = FocusModel::new(source(&items));

    for _ in 0..5 {
        focus.focus_next();
    }
    assert_eq!(focus.focused_index(), Some(4));
    assert_eq!(focus.focused_item(), Some('e'));

    focus.focus_next();
    assert_eq!(focus.focused_index(), Some(4));

    for _ in 0..10 {
        focus.focus_previous();
    }
    assert_eq!(focus.focused_index(), Some(0));

    focus.focus(9);
    assert_eq!(focus.focused_index(), None);
    assert_eq!(focus.focused_item(), None);
}

#[test]
fn test_focus_tracks_item_edits() {
    let items = letters(4);
    let focus = FocusModel::new(source(&items));
    focus.focus(3);

    items.set(vec!['x', 'y']);
    focus.refresh();
    assert!(!focus.is_focused(3));
    assert_eq!(focus.focused_index(), None);

    focus.focus_item(&'y');
    assert_eq!(focus.focused_index(), Some(1));
}

#[test]
fn test_single_selection_clears_on_none() {
    let items = letters(3);
    let selection = SingleSelectionModel::new(source(&items));
    selection.select(2);
    assert_eq!(selection.selected_item(), Some('c'));

    selection.select_item(None);
    assert_eq!(selection.selected_index(), None);
    assert_eq!(selection.selected_item(), None);
    assert!(selection.is_empty());
}

#[test]
fn test_single_selection_keeps_orphan_item() {
    let items = letters(3);
    let selection = SingleSelectionModel::new(source(&items));

    selection.select_item(Some('z'));
    assert_eq!(selection.selected_index(), None);
    assert_eq!(selection.selected_item(), Some('z'));

    selection.select(0);
    assert_eq!(selection.selected_item(), Some('a'));
}

#[test]
fn test_ascending_range() {
    let items = letters(10);
    let selection = MultipleSelectionModel::new(source(&items));
    selection.set_selection_mode(SelectionMode::Multiple);

    selection.select_range(2, 6);
    assert_eq!(selection.selected_indices(), vec![2, 3, 4, 5]);
    assert_eq!(selection.selected_index(), Some(5));
}

#[test]
fn test_descending_range() {
    let items = letters(10);
    let selection = MultipleSelectionModel::new(source(&items));
    selection.set_selection_mode(SelectionMode::Multiple);

    selection.select_range(7, 3);
    assert_eq!(selection.selected_indices(), vec![4, 5, 6, 7]);
    assert_eq!(selection.selected_index(), Some(4));

    selection.clear_selection();
    selection.select_range(3, 3);
    assert!(selection.is_empty());
}

#[test]
fn test_switching_to_single_keeps_last_selected() {
    let items = letters(20);
    let selection = MultipleSelectionModel::new(source(&items));
    selection.set_selection_mode(SelectionMode::Multiple);
    selection.select_indices(5, &[10, 15]);
    assert_eq!(selection.selected_count(), 3);

    selection.set_selection_mode(SelectionMode::Single);
    assert_eq!(selection.selected_indices(), vec![15]);
    assert_eq!(selection.selected_item(), Some('p'));
}

#[test]
fn test_selection_changed_reports_differences() {
    let items = letters(6);
    let selection = MultipleSelectionModel::new(source(&items));
    selection.set_selection_mode(SelectionMode::Multiple);

    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    selection.selection_changed.connect(move |(added, removed)| {
        sink.lock().push((added.clone(), removed.clone()));
    });

    selection.select_indices(1, &[2]);
    selection.clear_and_select(4);
    selection.select(4);

    assert_eq!(
        *changes.lock(),
        vec![(vec![1, 2], vec![]), (vec![4], vec![1, 2])]
    );
}
