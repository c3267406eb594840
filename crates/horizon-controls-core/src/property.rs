//! Property system for Horizon Controls.
//!
//! This module provides reactive properties with change notification.
//! Properties are the data backbone of controls and their models: skins and
//! behaviors observe them and re-render or react when they change.
//!
//! # Property Types
//!
//! - **Property<T>**: A value cell with change detection but no listeners
//! - **ObservableProperty<T>**: A shared property handle that notifies
//!   subscribers whenever its value changes
//!
//! # Example
//!
//! ```
//! use horizon_controls_core::ObservableProperty;
//!
//! let text = ObservableProperty::new(String::from("OK"));
//!
//! let subscription = text.subscribe(|value| println!("text is now {value}"));
//! assert!(text.set("Cancel".to_string()));
//! assert!(!text.set("Cancel".to_string())); // unchanged, no notification
//!
//! subscription.unsubscribe();
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::logging::targets;
use crate::signal::Signal;
use crate::subscription::Subscription;

/// A reactive property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. When `set()` is
/// called, it compares the new value with the current one and returns whether
/// the value actually changed. This enables efficient change notification.
///
/// # Example
///
/// ```
/// use horizon_controls_core::Property;
///
/// let prop = Property::new(42);
/// assert_eq!(prop.get(), 42);
///
/// // Setting same value returns false (no change)
/// assert!(!prop.set(42));
///
/// // Setting different value returns true (changed)
/// assert!(prop.set(100));
/// assert_eq!(prop.get(), 100);
/// ```
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()` instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

struct PropertyCell<T> {
    value: Property<T>,
    changed: Signal<T>,
}

/// A shared, observable property.
///
/// Cloning an `ObservableProperty` produces another handle to the same value
/// and the same set of listeners. Listeners receive the new value after it
/// has been stored, so calling [`get`](Self::get) from a listener observes
/// the new value too.
pub struct ObservableProperty<T> {
    cell: Arc<PropertyCell<T>>,
}

impl<T> Clone for ObservableProperty<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> ObservableProperty<T> {
    /// Create a property holding `value` with no listeners.
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(PropertyCell {
                value: Property::new(value),
                changed: Signal::new(),
            }),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.cell.value.get()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.cell.value.with(f)
    }

    /// Set the value and notify listeners if it changed.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Set the value and notify listeners if it changed, returning the
    /// previous value in that case.
    pub fn replace(&self, value: T) -> Option<T> {
        let old = self.cell.value.replace(value)?;
        tracing::trace!(target: targets::PROPERTY, "property changed");
        self.notify();
        Some(old)
    }

    /// Store a value without notifying listeners.
    pub fn set_silent(&self, value: T) {
        self.cell.value.set_silent(value);
    }

    /// Notify listeners with the current value, whether or not it changed.
    pub fn notify(&self) {
        let current = self.get();
        self.cell.changed.emit(current);
    }

    /// Subscribe to value changes.
    ///
    /// The returned [`Subscription`] removes the listener. It holds only a
    /// weak reference to the property, so it never keeps the property alive.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.cell.changed.connect(listener);
        let cell: Weak<PropertyCell<T>> = Arc::downgrade(&self.cell);
        Subscription::new(move || {
            if let Some(cell) = cell.upgrade() {
                cell.changed.disconnect(id);
            }
        })
    }

    /// The change signal, emitted with the new value.
    pub fn changed(&self) -> &Signal<T> {
        &self.cell.changed
    }

    /// Number of active listeners.
    pub fn listener_count(&self) -> usize {
        self.cell.changed.connection_count()
    }

    /// Whether two handles refer to the same property.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone + PartialEq + Default + Send + Sync + 'static> Default for ObservableProperty<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for ObservableProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("value", &self.cell.value.get())
            .field("listeners", &self.cell.changed.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(ObservableProperty<Option<usize>>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_property_set_detects_change() {
        let prop = Property::new(10);

        assert!(!prop.set(10));
        assert_eq!(prop.get(), 10);

        assert!(prop.set(20));
        assert_eq!(prop.get(), 20);
    }

    #[test]
    fn test_property_replace() {
        let prop = Property::new("hello".to_string());

        assert!(prop.replace("hello".to_string()).is_none());
        assert_eq!(prop.replace("world".to_string()), Some("hello".to_string()));
        assert_eq!(prop.get(), "world");
    }

    #[test]
    fn test_property_with_closure() {
        let prop = Property::new(vec![1, 2, 3]);
        let sum: i32 = prop.with(|v| v.iter().sum());
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_observable_notifies_on_change_only() {
        let prop = ObservableProperty::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = seen.clone();
        let _sub = prop.subscribe(move |v| s.lock().push(*v));

        prop.set(1);
        prop.set(2);
        prop.set(2);
        prop.set(3);

        assert_eq!(*seen.lock(), vec![2, 3]);
    }

    #[test]
    fn test_observable_listener_sees_stored_value() {
        let prop = ObservableProperty::new(0);
        let observed = Arc::new(Mutex::new(None));

        let handle = prop.clone();
        let o = observed.clone();
        let _sub = prop.subscribe(move |_| *o.lock() = Some(handle.get()));

        prop.set(7);
        assert_eq!(*observed.lock(), Some(7));
    }

    #[test]
    fn test_observable_unsubscribe() {
        let prop = ObservableProperty::new(String::new());
        let sub = prop.subscribe(|_| {});
        assert_eq!(prop.listener_count(), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        assert_eq!(prop.listener_count(), 0);
    }

    #[test]
    fn test_silent_set_and_notify() {
        let prop = ObservableProperty::new(0);
        let hits = Arc::new(Mutex::new(0));

        let h = hits.clone();
        let _sub = prop.subscribe(move |_| *h.lock() += 1);

        prop.set_silent(5);
        assert_eq!(*hits.lock(), 0);
        assert_eq!(prop.get(), 5);

        prop.notify();
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let a = ObservableProperty::new(1);
        let b = a.clone();
        b.set(9);
        assert_eq!(a.get(), 9);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&ObservableProperty::new(9)));
    }
}
