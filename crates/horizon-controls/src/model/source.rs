//! The item lookup contract shared by focus and selection models.

use std::sync::Arc;

use horizon_controls_core::ObservableProperty;

/// Read access to an ordered list of items.
///
/// Models never own their items; they resolve indices through an
/// `ItemSource` so the owning control can swap or edit the list freely.
pub trait ItemSource<T>: Send + Sync {
    /// Number of items.
    fn item_count(&self) -> usize;

    /// The item at `index`, or `None` if the index is out of range.
    fn item(&self, index: usize) -> Option<T>;

    /// Index of the first item equal to `item`.
    fn position_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        (0..self.item_count()).find(|&index| self.item(index).as_ref() == Some(item))
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> ItemSource<T> for ObservableProperty<Vec<T>> {
    fn item_count(&self) -> usize {
        self.with(Vec::len)
    }

    fn item(&self, index: usize) -> Option<T> {
        self.with(|items| items.get(index).cloned())
    }

    fn position_of(&self, item: &T) -> Option<usize> {
        self.with(|items| items.iter().position(|candidate| candidate == item))
    }
}

impl<T: Clone + Send + Sync> ItemSource<T> for Vec<T> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }
}

impl<T, S: ItemSource<T> + ?Sized> ItemSource<T> for Arc<S> {
    fn item_count(&self) -> usize {
        (**self).item_count()
    }

    fn item(&self, index: usize) -> Option<T> {
        (**self).item(index)
    }
}
