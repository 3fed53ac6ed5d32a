use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use crate::concurrency::barrier::CompletionBarrier;
use crate::concurrency::channel::RendezvousChannel;
use crate::concurrency::delay::RandomDelay;
use crate::error::{ErrorKind, HandoffError, HandoffResult};
use crate::handoff_error;
use crate::types::Item;
use crate::workers::base::{Worker, WorkerHandle, WorkerType};

/// Live counters exposed by a running producer worker.
#[derive(Debug, Clone, Default)]
pub struct ProducerState {
    sent: Arc<AtomicU64>,
}

impl ProducerState {
    /// Returns the number of items whose handoff has completed so far.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Acquire)
    }

    fn record_send(&self) {
        self.sent.fetch_add(1, Ordering::Release);
    }
}

/// Handle for monitoring a producer worker.
#[derive(Debug)]
pub struct ProducerWorkerHandle {
    state: ProducerState,
    handle: Option<JoinHandle<HandoffResult<()>>>,
}

impl WorkerHandle<ProducerState> for ProducerWorkerHandle {
    fn state(&self) -> ProducerState {
        self.state.clone()
    }

    async fn wait(mut self) -> HandoffResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        handle.await.map_err(|err| {
            handoff_error!(ErrorKind::ProducerPanic, "Producer worker panicked", err)
        })??;

        Ok(())
    }
}

/// Worker that sends a bounded stream of items into the shared channel.
///
/// For every sequence number from 1 through its item count the producer
/// optionally pauses a bounded random duration, then performs one rendezvous
/// send. On loop exit, whether the stream completed or a send faulted, it
/// signals its completion barrier exactly once.
#[derive(Debug)]
pub struct ProducerWorker {
    id: u32,
    items: u32,
    delay: RandomDelay,
    channel: RendezvousChannel<Item>,
    barrier: CompletionBarrier,
    rng: StdRng,
}

impl ProducerWorker {
    /// Creates a new producer worker over the given channel and barrier.
    ///
    /// The worker only references the channel and barrier; it never creates or
    /// closes them.
    pub fn new(
        id: u32,
        items: u32,
        delay: RandomDelay,
        channel: RendezvousChannel<Item>,
        barrier: CompletionBarrier,
        rng: StdRng,
    ) -> Self {
        Self {
            id,
            items,
            delay,
            channel,
            barrier,
            rng,
        }
    }
}

impl Worker<ProducerWorkerHandle, ProducerState> for ProducerWorker {
    type Error = HandoffError;

    async fn start(self) -> Result<ProducerWorkerHandle, HandoffError> {
        let ProducerWorker {
            id,
            items,
            delay,
            channel,
            barrier,
            mut rng,
        } = self;

        let worker = WorkerType::Producer { id };
        info!(%worker, items, "starting producer worker");

        let state = ProducerState::default();
        let task_state = state.clone();

        let span = tracing::info_span!("producer", id);
        let producer = async move {
            let result: HandoffResult<()> = async {
                for seq in 1..=items {
                    delay.pause(&mut rng).await;

                    let item = Item { producer: id, seq };
                    channel.send(item).await?;
                    task_state.record_send();

                    debug!(%item, "produced item");
                }

                Ok(())
            }
            .await;

            if let Err(ref err) = result {
                warn!(error = %err, "producer stopped before sending all items");
            }

            // Completion is reported exactly once on every exit path; a missed
            // signal would leave the orchestrator's wait blocked forever.
            let signaled = barrier.signal().await;

            result.and(signaled)
        }
        .instrument(span.or_current());

        let handle = tokio::spawn(producer);

        Ok(ProducerWorkerHandle {
            state,
            handle: Some(handle),
        })
    }
}
