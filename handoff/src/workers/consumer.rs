use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info};

use crate::concurrency::channel::RendezvousChannel;
use crate::concurrency::delay::RandomDelay;
use crate::error::{ErrorKind, HandoffError, HandoffResult};
use crate::handoff_error;
use crate::sink::Sink;
use crate::types::Item;
use crate::workers::base::{Worker, WorkerHandle, WorkerType};

/// Live counters exposed by a running consumer worker.
#[derive(Debug, Clone, Default)]
pub struct ConsumerState {
    received: Arc<AtomicU64>,
}

impl ConsumerState {
    /// Returns the number of items recorded to the sink so far.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Acquire)
    }

    fn record_receive(&self) {
        self.received.fetch_add(1, Ordering::Release);
    }
}

/// Handle for monitoring a consumer worker.
#[derive(Debug)]
pub struct ConsumerWorkerHandle {
    state: ConsumerState,
    handle: Option<JoinHandle<HandoffResult<()>>>,
}

impl WorkerHandle<ConsumerState> for ConsumerWorkerHandle {
    fn state(&self) -> ConsumerState {
        self.state.clone()
    }

    async fn wait(mut self) -> HandoffResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        handle.await.map_err(|err| {
            handoff_error!(ErrorKind::ConsumerPanic, "Consumer worker panicked", err)
        })??;

        Ok(())
    }
}

/// Worker that drains the shared channel until end-of-stream.
///
/// Each received item is delivered to the sink and then optionally followed by
/// a bounded random pause simulating processing latency. The consumer does not
/// signal the production-side barrier: it has no obligation to finish before
/// the orchestrator decides the production side is done, and items it has not
/// yet recorded by then are accepted loss unless the orchestrator opts into
/// awaiting consumers.
#[derive(Debug)]
pub struct ConsumerWorker<K> {
    id: u32,
    delay: RandomDelay,
    channel: RendezvousChannel<Item>,
    sink: K,
    rng: StdRng,
}

impl<K> ConsumerWorker<K> {
    /// Creates a new consumer worker draining the given channel into the sink.
    pub fn new(
        id: u32,
        delay: RandomDelay,
        channel: RendezvousChannel<Item>,
        sink: K,
        rng: StdRng,
    ) -> Self {
        Self {
            id,
            delay,
            channel,
            sink,
            rng,
        }
    }
}

impl<K> Worker<ConsumerWorkerHandle, ConsumerState> for ConsumerWorker<K>
where
    K: Sink<Item> + Send + Sync + 'static,
{
    type Error = HandoffError;

    async fn start(self) -> Result<ConsumerWorkerHandle, HandoffError> {
        let ConsumerWorker {
            id,
            delay,
            channel,
            sink,
            mut rng,
        } = self;

        let worker = WorkerType::Consumer { id };
        info!(%worker, "starting consumer worker");

        let state = ConsumerState::default();
        let task_state = state.clone();

        let span = tracing::info_span!("consumer", id);
        let consumer = async move {
            let result: HandoffResult<()> = async {
                while let Some(item) = channel.recv().await {
                    debug!(%item, "received item");

                    sink.deliver(item).await?;
                    task_state.record_receive();

                    delay.pause(&mut rng).await;
                }

                debug!("consumer observed end of stream");

                Ok(())
            }
            .await;

            result
        }
        .instrument(span.or_current());

        let handle = tokio::spawn(consumer);

        Ok(ConsumerWorkerHandle {
            state,
            handle: Some(handle),
        })
    }
}
