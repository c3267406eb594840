//! Cancellable subscription handles.
//!
//! Every registration made against a control or a property (an event
//! handler, a property listener, a whole installed behavior) hands back a
//! [`Subscription`]. Calling [`Subscription::unsubscribe`] reverses the
//! registration. Handles compose with [`Subscription::and`], so a behavior
//! made of many registrations is still cancelled with a single call.
//!
//! Unlike [`ConnectionGuard`](crate::ConnectionGuard), a subscription does
//! nothing when dropped: the owner decides when to cancel it.
//!
//! ```
//! use horizon_controls_core::{ObservableProperty, Subscription};
//!
//! let width = ObservableProperty::new(10);
//! let height = ObservableProperty::new(20);
//!
//! let subscription = width
//!     .subscribe(|w| println!("width: {w}"))
//!     .and(height.subscribe(|h| println!("height: {h}")));
//!
//! subscription.unsubscribe();
//! subscription.unsubscribe(); // no-op
//! assert_eq!(width.listener_count(), 0);
//! ```

use std::fmt;

use parking_lot::Mutex;

type CancelFn = Box<dyn FnOnce() + Send>;

/// A handle that reverses one or more registrations when cancelled.
///
/// Cancellation is idempotent: the second and later calls to
/// [`unsubscribe`](Self::unsubscribe) do nothing.
pub struct Subscription {
    cancels: Mutex<Vec<CancelFn>>,
}

impl Subscription {
    /// Create a subscription that runs `cancel` when unsubscribed.
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancels: Mutex::new(vec![Box::new(cancel)]),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn empty() -> Self {
        Self {
            cancels: Mutex::new(Vec::new()),
        }
    }

    /// Combine two subscriptions into one that cancels both, `self` first.
    pub fn and(self, other: Subscription) -> Subscription {
        let mut cancels = self.cancels.into_inner();
        cancels.extend(other.cancels.into_inner());
        Self {
            cancels: Mutex::new(cancels),
        }
    }

    /// Combine any number of subscriptions, cancelled in iteration order.
    pub fn all<I>(subscriptions: I) -> Subscription
    where
        I: IntoIterator<Item = Subscription>,
    {
        subscriptions
            .into_iter()
            .fold(Subscription::empty(), Subscription::and)
    }

    /// Cancel every registration held by this handle.
    pub fn unsubscribe(&self) {
        // Take the callbacks out before running them so a cancel callback
        // may touch this handle again.
        let cancels = std::mem::take(&mut *self.cancels.lock());
        for cancel in cancels {
            cancel();
        }
    }

    /// Whether there is nothing left to cancel.
    pub fn is_cancelled(&self) -> bool {
        self.cancels.lock().is_empty()
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("pending", &self.cancels.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Subscription: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Subscription {
        let counter = counter.clone();
        Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let counter = Arc::new(AtomicUsize::new(0));
        let sub = counting(&counter);

        assert!(!sub.is_cancelled());
        sub.unsubscribe();
        sub.unsubscribe();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(sub.is_cancelled());
    }

    #[test]
    fn test_and_cancels_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let a = {
            let order = order.clone();
            Subscription::new(move || order.lock().push("a"))
        };
        let b = {
            let order = order.clone();
            Subscription::new(move || order.lock().push("b"))
        };

        a.and(b).unsubscribe();
        assert_eq!(*order.lock(), vec!["a", "b"]);
    }

    #[test]
    fn test_all_and_empty() {
        let counter = Arc::new(AtomicUsize::new(0));
        let sub = Subscription::all((0..3).map(|_| counting(&counter)).chain([Subscription::empty()]));

        sub.unsubscribe();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(Subscription::empty().is_cancelled());
    }
}
