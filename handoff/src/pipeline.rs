//! Orchestration of producer/consumer pipelines over one shared channel.

use std::time::{Duration, Instant};

use futures::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::concurrency::barrier::CompletionBarrier;
use crate::concurrency::channel::RendezvousChannel;
use crate::concurrency::delay::RandomDelay;
use crate::config::PipelineConfig;
use crate::error::HandoffResult;
use crate::sink::Sink;
use crate::types::{Item, PipelineId};
use crate::workers::base::{Worker, WorkerHandle};
use crate::workers::consumer::{ConsumerWorker, ConsumerWorkerHandle};
use crate::workers::producer::{ProducerWorker, ProducerWorkerHandle};

#[derive(Debug)]
enum PipelineState {
    NotStarted,
    Started {
        channel: RendezvousChannel<Item>,
        barrier: CompletionBarrier,
        producers: Vec<ProducerWorkerHandle>,
        consumers: Vec<ConsumerWorkerHandle>,
        started_at: Instant,
    },
}

/// Outcome of a completed pipeline run.
///
/// `items_sent` and `items_delivered` always agree once the barrier has
/// released, since a rendezvous send only completes when a receiver took the
/// value. `items_recorded` counts what consumers actually wrote to the sink
/// and is only known when the orchestrator awaited them; the gap between
/// delivered and recorded is the accepted loss documented on
/// [`PipelineConfig::await_consumers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    /// Number of sends completed across all producers.
    pub items_sent: u64,
    /// Number of handoffs completed on the channel.
    pub items_delivered: u64,
    /// Number of items recorded to the sink, when consumers were awaited.
    pub items_recorded: Option<u64>,
    /// Wall-clock time from start to the end of the shutdown sequence.
    pub elapsed: Duration,
}

/// Orchestrator for a many-producer/many-consumer pipeline.
///
/// The pipeline owns the channel and barrier for its run; workers only
/// reference them. Its shutdown sequence is fixed: wait on the barrier until
/// every producer has signaled, then close the channel, in that order and
/// never reversed. Closing first would fault producers still mid-stream.
#[derive(Debug)]
pub struct Pipeline<K> {
    id: PipelineId,
    config: PipelineConfig,
    sink: K,
    state: PipelineState,
}

impl<K> Pipeline<K>
where
    K: Sink<Item> + Clone + Send + Sync + 'static,
{
    /// Creates a new pipeline in the not-started state.
    pub fn new(id: PipelineId, config: PipelineConfig, sink: K) -> Self {
        Self {
            id,
            config,
            sink,
            state: PipelineState::NotStarted,
        }
    }

    /// Returns this pipeline's identifier.
    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// Creates the channel and barrier and spawns all workers.
    ///
    /// The barrier learns the full producer count before any worker exists,
    /// and every worker is scheduled onto its own task before this method
    /// returns, so no later rendezvous can run ahead of its partner. The
    /// orchestrator itself never receives; all receiving is delegated to the
    /// consumer workers.
    pub async fn start(&mut self) -> HandoffResult<()> {
        info!(
            pipeline_id = self.id,
            producers = self.config.producer_count,
            consumers = self.config.consumer_count,
            items_per_producer = self.config.items_per_producer,
            "starting pipeline"
        );

        let channel = RendezvousChannel::new();
        let barrier = CompletionBarrier::new();
        barrier.expect(self.config.producer_count as usize).await?;

        let started_at = Instant::now();

        let produce_delay = RandomDelay::from_millis(self.config.produce_delay_ms);
        let consume_delay = RandomDelay::from_millis(self.config.consume_delay_ms);

        let mut producers = Vec::with_capacity(self.config.producer_count as usize);
        for id in 0..self.config.producer_count {
            let worker = ProducerWorker::new(
                id,
                self.config.items_per_producer,
                produce_delay,
                channel.clone(),
                barrier.clone(),
                StdRng::seed_from_u64(self.config.seed.wrapping_add(id as u64)),
            );
            producers.push(worker.start().await?);
        }

        let mut consumers = Vec::with_capacity(self.config.consumer_count as usize);
        for id in 0..self.config.consumer_count {
            let worker = ConsumerWorker::new(
                id,
                consume_delay,
                channel.clone(),
                self.sink.clone(),
                StdRng::seed_from_u64(!self.config.seed.wrapping_add(id as u64)),
            );
            consumers.push(worker.start().await?);
        }

        self.state = PipelineState::Started {
            channel,
            barrier,
            producers,
            consumers,
            started_at,
        };

        Ok(())
    }

    /// Runs the shutdown sequence and returns the run's report.
    ///
    /// Blocks on the barrier until all producers report done, only then closes
    /// the channel, and finally collects worker results. Producer failures are
    /// aggregated into a single error. Consumers are joined only when the
    /// config asks for it; otherwise they are left to drain in the background
    /// and whatever they have not recorded by process exit is accepted loss.
    pub async fn wait(self) -> HandoffResult<PipelineReport> {
        let Pipeline { id, config, state, .. } = self;

        let PipelineState::Started {
            channel,
            barrier,
            producers,
            consumers,
            started_at,
        } = state
        else {
            info!(pipeline_id = id, "pipeline was not started, nothing to wait for");

            return Ok(PipelineReport {
                items_sent: 0,
                items_delivered: 0,
                items_recorded: None,
                elapsed: Duration::ZERO,
            });
        };

        // Producers first: the channel may only close once every producer has
        // confirmed it will send no more values. Closing earlier faults any
        // producer still mid-stream.
        barrier.wait().await?;
        channel.close().await?;

        let mut errors = Vec::new();

        let producer_states: Vec<_> = producers.iter().map(|handle| handle.state()).collect();
        for result in join_all(producers.into_iter().map(|handle| handle.wait())).await {
            if let Err(err) = result {
                errors.push(err);
            }
        }
        let items_sent: u64 = producer_states.iter().map(|state| state.sent()).sum();

        let items_delivered = channel.delivered().await;

        let items_recorded = if config.await_consumers {
            let consumer_states: Vec<_> = consumers.iter().map(|handle| handle.state()).collect();
            for result in join_all(consumers.into_iter().map(|handle| handle.wait())).await {
                if let Err(err) = result {
                    errors.push(err);
                }
            }

            Some(consumer_states.iter().map(|state| state.received()).sum())
        } else {
            debug!(
                pipeline_id = id,
                consumers = consumers.len(),
                "leaving consumer workers to drain in the background"
            );

            None
        };

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let elapsed = started_at.elapsed();
        info!(
            pipeline_id = id,
            items_sent,
            items_delivered,
            elapsed_ms = elapsed.as_millis() as u64,
            "pipeline completed"
        );

        Ok(PipelineReport {
            items_sent,
            items_delivered,
            items_recorded,
            elapsed,
        })
    }
}
