use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::HandoffResult;
use crate::sink::Sink;

/// In-memory sink for testing and development purposes.
///
/// [`MemorySink`] stores every delivered item in memory, making it ideal for
/// asserting on what a pipeline actually produced. All data is held in memory
/// and is lost when the process terminates.
#[derive(Debug)]
pub struct MemorySink<T> {
    inner: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for MemorySink<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for MemorySink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemorySink<T> {
    /// Creates a new empty memory sink.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a copy of all items delivered so far.
    pub async fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.lock().await.clone()
    }

    /// Returns the number of items delivered so far.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Returns whether no items have been delivered yet.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Clears all stored items.
    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }
}

impl<T: Send> Sink<T> for MemorySink<T> {
    async fn deliver(&self, item: T) -> HandoffResult<()> {
        self.inner.lock().await.push(item);

        Ok(())
    }
}
