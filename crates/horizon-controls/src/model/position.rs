//! Cell positions in table and tree-table views.
//!
//! A position names its view and column by id rather than by reference.
//! Ids are resolved through a [`PositionResolver`], so a position whose
//! view has been removed simply stops resolving instead of dangling.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Identifies a table view registered with a [`TableRegistry`].
    pub struct ViewId;

    /// Identifies a column of a table view.
    pub struct ColumnId;
}

/// Lookup of views, columns and rows for positions.
pub trait PositionResolver<T> {
    /// Number of rows in `view`, or `None` if the view does not exist.
    fn row_count(&self, view: ViewId) -> Option<usize>;

    /// Index of `column` within `view`, or `None` if either does not exist
    /// or the column belongs to another view.
    fn column_index(&self, view: ViewId, column: ColumnId) -> Option<usize>;

    /// The row item at `row` of `view`.
    fn row_item(&self, view: ViewId, row: usize) -> Option<T>;

    /// Nesting depth of `row` in a tree-table view. Flat tables are depth 0.
    fn row_depth(&self, view: ViewId, row: usize) -> Option<usize> {
        self.row_count(view).filter(|&count| row < count).map(|_| 0)
    }
}

/// A cell, row or whole-table position within one table view.
///
/// A missing row means the position refers to the view as a whole; a
/// missing column means the position refers to a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TablePosition {
    view: ViewId,
    row: Option<usize>,
    column: Option<ColumnId>,
}

impl TablePosition {
    /// Create a position.
    pub fn new(view: ViewId, row: Option<usize>, column: Option<ColumnId>) -> Self {
        Self { view, row, column }
    }

    /// A position covering a whole row.
    pub fn row(view: ViewId, row: usize) -> Self {
        Self::new(view, Some(row), None)
    }

    /// A position naming one cell.
    pub fn cell(view: ViewId, row: usize, column: ColumnId) -> Self {
        Self::new(view, Some(row), Some(column))
    }

    /// The view this position belongs to.
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// The row index, if any.
    pub fn row_index(&self) -> Option<usize> {
        self.row
    }

    /// The column id, if any.
    pub fn column(&self) -> Option<ColumnId> {
        self.column
    }

    /// Check whether the view, row and column all still resolve.
    pub fn is_valid<T>(&self, resolver: &impl PositionResolver<T>) -> bool {
        let Some(count) = resolver.row_count(self.view) else {
            return false;
        };
        if let Some(row) = self.row
            && row >= count
        {
            return false;
        }
        match self.column {
            Some(column) => resolver.column_index(self.view, column).is_some(),
            None => true,
        }
    }

    /// The column's current index within the view.
    pub fn column_index<T>(&self, resolver: &impl PositionResolver<T>) -> Option<usize> {
        resolver.column_index(self.view, self.column?)
    }

    /// The item of the row this position refers to.
    pub fn item<T>(&self, resolver: &impl PositionResolver<T>) -> Option<T> {
        resolver.row_item(self.view, self.row?)
    }
}

/// A position within a tree-table view.
///
/// Rows are counted over the visible (expanded) tree, so the same tree
/// item may occupy different rows over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeTablePosition {
    position: TablePosition,
}

impl TreeTablePosition {
    /// Create a position.
    pub fn new(view: ViewId, row: Option<usize>, column: Option<ColumnId>) -> Self {
        Self {
            position: TablePosition::new(view, row, column),
        }
    }

    /// The flat table position.
    pub fn position(&self) -> &TablePosition {
        &self.position
    }

    /// The view this position belongs to.
    pub fn view(&self) -> ViewId {
        self.position.view()
    }

    /// The visible row index, if any.
    pub fn row_index(&self) -> Option<usize> {
        self.position.row_index()
    }

    /// The column id, if any.
    pub fn column(&self) -> Option<ColumnId> {
        self.position.column()
    }

    /// Check whether the view, row and column all still resolve.
    pub fn is_valid<T>(&self, resolver: &impl PositionResolver<T>) -> bool {
        self.position.is_valid(resolver)
    }

    /// The tree item shown on this position's row.
    pub fn tree_item<T>(&self, resolver: &impl PositionResolver<T>) -> Option<T> {
        self.position.item(resolver)
    }

    /// Nesting depth of the row, the root's children being depth 0.
    pub fn depth<T>(&self, resolver: &impl PositionResolver<T>) -> Option<usize> {
        resolver.row_depth(self.view(), self.row_index()?)
    }
}

impl From<TablePosition> for TreeTablePosition {
    fn from(position: TablePosition) -> Self {
        Self { position }
    }
}

#[derive(Debug)]
struct ViewEntry<T> {
    rows: Vec<(T, usize)>,
    columns: Vec<ColumnId>,
}

/// An arena of table views that positions resolve against.
///
/// Each row carries its tree depth; flat tables use depth 0 throughout.
#[derive(Debug)]
pub struct TableRegistry<T> {
    views: SlotMap<ViewId, ViewEntry<T>>,
    columns: SlotMap<ColumnId, ViewId>,
}

impl<T> Default for TableRegistry<T> {
    fn default() -> Self {
        Self {
            views: SlotMap::with_key(),
            columns: SlotMap::with_key(),
        }
    }
}

impl<T: Clone> TableRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flat table view.
    pub fn insert_view(&mut self, rows: Vec<T>) -> ViewId {
        self.insert_tree_view(rows.into_iter().map(|row| (row, 0)).collect())
    }

    /// Register a tree-table view given its visible rows and their depths.
    pub fn insert_tree_view(&mut self, rows: Vec<(T, usize)>) -> ViewId {
        self.views.insert(ViewEntry {
            rows,
            columns: Vec::new(),
        })
    }

    /// Remove a view and its columns. Positions in it stop resolving.
    pub fn remove_view(&mut self, view: ViewId) -> bool {
        let Some(entry) = self.views.remove(view) else {
            return false;
        };
        for column in entry.columns {
            self.columns.remove(column);
        }
        true
    }

    /// Replace the rows of a flat view.
    pub fn set_rows(&mut self, view: ViewId, rows: Vec<T>) -> bool {
        match self.views.get_mut(view) {
            Some(entry) => {
                entry.rows = rows.into_iter().map(|row| (row, 0)).collect();
                true
            }
            None => false,
        }
    }

    /// Append a column to a view.
    pub fn add_column(&mut self, view: ViewId) -> Option<ColumnId> {
        let entry = self.views.get_mut(view)?;
        let column = self.columns.insert(view);
        entry.columns.push(column);
        Some(column)
    }

    /// Remove a column from its view.
    pub fn remove_column(&mut self, column: ColumnId) -> bool {
        let Some(view) = self.columns.remove(column) else {
            return false;
        };
        if let Some(entry) = self.views.get_mut(view) {
            entry.columns.retain(|&existing| existing != column);
        }
        true
    }

    /// Move a column to a new index within its view.
    pub fn move_column(&mut self, column: ColumnId, to: usize) -> bool {
        let Some(&view) = self.columns.get(column) else {
            return false;
        };
        let Some(entry) = self.views.get_mut(view) else {
            return false;
        };
        entry.columns.retain(|&existing| existing != column);
        let to = to.min(entry.columns.len());
        entry.columns.insert(to, column);
        true
    }
}

impl<T: Clone> PositionResolver<T> for TableRegistry<T> {
    fn row_count(&self, view: ViewId) -> Option<usize> {
        self.views.get(view).map(|entry| entry.rows.len())
    }

    fn column_index(&self, view: ViewId, column: ColumnId) -> Option<usize> {
        self.views
            .get(view)?
            .columns
            .iter()
            .position(|&existing| existing == column)
    }

    fn row_item(&self, view: ViewId, row: usize) -> Option<T> {
        self.views.get(view)?.rows.get(row).map(|(item, _)| item.clone())
    }

    fn row_depth(&self, view: ViewId, row: usize) -> Option<usize> {
        self.views.get(view)?.rows.get(row).map(|&(_, depth)| depth)
    }
}
