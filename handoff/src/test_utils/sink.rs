use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::error::HandoffResult;
use crate::sink::Sink;
use crate::test_utils::notify::TimedNotify;

type Predicate<T> = Box<dyn Fn(&[T]) -> bool + Send + Sync>;

struct Inner<T> {
    items: Vec<T>,
    watchers: Vec<(Predicate<T>, Arc<Notify>)>,
}

/// Capture sink that lets tests wait for conditions on the delivered items.
///
/// [`NotifyingSink`] stores every delivered item and evaluates registered
/// predicates on each delivery, firing the matching watchers. Tests register
/// a predicate with [`notify_when`](NotifyingSink::notify_when) and then
/// await the returned [`TimedNotify`] instead of polling the sink.
pub struct NotifyingSink<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for NotifyingSink<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for NotifyingSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NotifyingSink<T> {
    /// Creates a new empty notifying sink.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                items: Vec::new(),
                watchers: Vec::new(),
            })),
        }
    }

    /// Returns a copy of all items delivered so far.
    pub async fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.lock().await.items.clone()
    }

    /// Returns the number of items delivered so far.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.items.len()
    }

    /// Returns whether no items have been delivered yet.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.items.is_empty()
    }

    /// Registers a condition on the delivered items and returns a waiter for it.
    ///
    /// The predicate is evaluated immediately against the items already
    /// delivered, and then again after every future delivery; the returned
    /// [`TimedNotify`] fires the first time it holds.
    pub async fn notify_when(
        &self,
        predicate: impl Fn(&[T]) -> bool + Send + Sync + 'static,
    ) -> TimedNotify {
        let notify = Arc::new(Notify::new());

        let mut inner = self.inner.lock().await;
        if predicate(&inner.items) {
            // The permit makes a later `notified` return immediately.
            notify.notify_one();
        } else {
            inner.watchers.push((Box::new(predicate), notify.clone()));
        }

        TimedNotify::new(notify)
    }
}

impl<T: Send + Sync> Sink<T> for NotifyingSink<T> {
    async fn deliver(&self, item: T) -> HandoffResult<()> {
        let mut inner = self.inner.lock().await;
        let Inner { items, watchers } = &mut *inner;

        items.push(item);
        watchers.retain(|(predicate, notify)| {
            if predicate(items) {
                notify.notify_one();
                false
            } else {
                true
            }
        });

        Ok(())
    }
}
