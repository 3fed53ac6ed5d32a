use std::future::Future;

use crate::error::HandoffResult;

/// Trait for collaborators that receive pipeline or oracle output.
///
/// [`Sink`] is the boundary where the concurrency core hands results to the
/// outside world: consumer workers deliver processed items here, and the
/// oracle's printer delivers its paced text chunks here. Implementations must
/// tolerate concurrent delivery from multiple consumer workers; the ordering
/// across workers is scheduler-determined and carries no guarantee.
pub trait Sink<T> {
    /// Delivers one item to the sink.
    fn deliver(&self, item: T) -> impl Future<Output = HandoffResult<()>> + Send;
}
