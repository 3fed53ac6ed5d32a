use std::fmt;
use std::future::Future;

use crate::error::HandoffResult;

/// Classification of worker types with identifying properties.
///
/// [`WorkerType`] distinguishes the categories of workers in a pipeline or
/// oracle run. This is useful for logging and diagnostics; it carries no
/// ownership over channels or barriers, only a usage relationship.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WorkerType {
    /// Worker that sends a bounded stream of items into the channel.
    Producer {
        /// Identifier of the producer within its pipeline.
        id: u32,
    },
    /// Worker that drains the channel until end-of-stream.
    Consumer {
        /// Identifier of the consumer within its pipeline.
        id: u32,
    },
    /// The oracle's intake loop that spawns one respond task per question.
    Responder,
    /// The oracle's sole response consumer.
    Printer,
}

impl fmt::Display for WorkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerType::Producer { id } => write!(f, "p{id}"),
            WorkerType::Consumer { id } => write!(f, "c{id}"),
            WorkerType::Responder => write!(f, "responder"),
            WorkerType::Printer => write!(f, "printer"),
        }
    }
}

/// Trait for workers scheduled onto their own tasks.
///
/// [`Worker`] defines the interface for starting background workers. Starting
/// a worker hands it to an independent task and returns immediately with a
/// handle; this must happen strictly before anything attempts to rendezvous
/// with the worker, otherwise the rendezvous blocks forever.
///
/// The generic parameter `H` is the handle type returned when the worker
/// starts, and `S` is the state type accessible through the handle.
pub trait Worker<H, S>
where
    H: WorkerHandle<S>,
{
    /// Error type returned when worker startup fails.
    type Error;

    /// Starts the worker and returns a handle for monitoring its execution.
    fn start(self) -> impl Future<Output = Result<H, Self::Error>> + Send;
}

/// Handle for monitoring a running worker.
///
/// [`WorkerHandle`] provides access to worker state and enables waiting for
/// worker completion. The handle remains valid after the worker completes,
/// allowing for state inspection and result retrieval.
pub trait WorkerHandle<S> {
    /// Returns the current state of the worker.
    ///
    /// The state is a live snapshot, independent of the worker's lifetime;
    /// holding it gives no guarantee about whether the worker is still
    /// running.
    fn state(&self) -> S;

    /// Waits for the worker to complete and returns the final result.
    ///
    /// The handle is consumed by this operation.
    fn wait(self) -> impl Future<Output = HandoffResult<()>> + Send;
}
