use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use crate::concurrency::channel::RendezvousChannel;
use crate::concurrency::delay::RandomDelay;
use crate::config::OracleConfig;
use crate::error::HandoffResult;
use crate::oracle::lexicon;
use crate::oracle::printer::PrinterWorker;
use crate::sink::Sink;
use crate::types::Response;
use crate::workers::base::WorkerType;

/// The oracle responder before it starts.
///
/// Starting the oracle spawns its three long-lived tasks (the intake loop,
/// the idle muse, and the printer) and hands back an [`OracleHandle`] for
/// feeding it questions. The oracle never terminates on its own.
pub struct Oracle<K> {
    config: OracleConfig,
    sink: K,
}

/// Handle to a running oracle.
///
/// Questions go in through [`ask`](OracleHandle::ask); answers come out of
/// the sink the oracle was started with, in the order the respond tasks
/// finished. Since the responder never terminates,
/// [`abort`](OracleHandle::abort) is the only way to stop it.
pub struct OracleHandle {
    questions: RendezvousChannel<String>,
    tasks: Vec<JoinHandle<()>>,
}

impl OracleHandle {
    /// Forwards one question to the oracle.
    ///
    /// The send is a rendezvous, but the intake loop is always ready to
    /// receive, so in practice this does not block: every question is
    /// accepted immediately and answered whenever its respond task gets
    /// around to it.
    pub async fn ask(&self, question: impl Into<String>) -> HandoffResult<()> {
        self.questions.send(question.into()).await
    }

    /// Stops the oracle's long-lived tasks.
    ///
    /// In-flight respond tasks are not tracked and will find the responses
    /// channel without a reader; their prophecies are lost, which is the
    /// fire-and-forget contract.
    pub fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl<K> Oracle<K>
where
    K: Sink<String> + Send + Sync + 'static,
{
    /// Creates a new oracle with the given configuration and output sink.
    pub fn new(config: OracleConfig, sink: K) -> Self {
        Self { config, sink }
    }

    /// Spawns the intake loop, the idle muse, and the printer.
    pub async fn start(self) -> HandoffResult<OracleHandle> {
        let Oracle { config, sink } = self;

        info!(star = %config.star, "starting oracle responder");

        let questions = RendezvousChannel::new();
        let responses = RendezvousChannel::new();

        let reply_delay = RandomDelay::from_millis(config.reply_delay_ms);
        let nonsense_delay = RandomDelay::from_millis(config.nonsense_delay_ms);

        // One origin counter across both spawning loops, so every respond
        // task gets a distinct identity and a distinct derived seed.
        let origins = Arc::new(AtomicU64::new(0));

        let mut tasks = Vec::new();

        // Intake loop: one fresh respond task per question, fire and forget.
        {
            let questions = questions.clone();
            let responses = responses.clone();
            let origins = origins.clone();
            let seed = config.seed;

            let span = tracing::info_span!("worker", kind = %WorkerType::Responder);
            tasks.push(tokio::spawn(
                async move {
                    while let Some(question) = questions.recv().await {
                        spawn_prophecy(
                            question,
                            &origins,
                            seed,
                            &responses,
                            reply_delay,
                            nonsense_delay,
                        );
                    }

                    debug!("intake channel closed, responder ending");
                }
                .instrument(span),
            ));
        }

        // Idle muse: unsolicited prophecies on a bounded random cadence.
        if config.idle_prophecies {
            let responses = responses.clone();
            let origins = origins.clone();
            let seed = config.seed;
            let muse_delay = RandomDelay::from_millis(config.muse_delay_ms);

            let span = tracing::info_span!("muse");
            tasks.push(tokio::spawn(
                async move {
                    let mut rng = StdRng::seed_from_u64(seed.rotate_left(17));

                    loop {
                        muse_delay.pause(&mut rng).await;

                        spawn_prophecy(
                            lexicon::NONSENSE_TRIGGER.to_string(),
                            &origins,
                            seed,
                            &responses,
                            reply_delay,
                            nonsense_delay,
                        );
                    }
                }
                .instrument(span),
            ));
        }

        let printer = PrinterWorker::new(
            config.star.clone(),
            Duration::from_millis(config.char_delay_ms),
            responses,
            sink,
        );
        tasks.push(printer.start());

        Ok(OracleHandle { questions, tasks })
    }
}

/// Spawns one fire-and-forget respond task for an event.
///
/// No handle is retained and no concurrency bound applies; every event gets
/// its own task regardless of how many are already in flight.
fn spawn_prophecy(
    question: String,
    origins: &AtomicU64,
    seed: u64,
    responses: &RendezvousChannel<Response>,
    reply_delay: RandomDelay,
    nonsense_delay: RandomDelay,
) {
    let origin = origins.fetch_add(1, Ordering::Relaxed);
    let rng = StdRng::seed_from_u64(seed ^ origin.wrapping_mul(0x9E37_79B9_7F4A_7C15));

    debug!(origin, "spawning respond task");

    tokio::spawn(prophesy(
        question,
        origin,
        responses.clone(),
        reply_delay,
        nonsense_delay,
        rng,
    ));
}

/// One-shot respond task: contemplates, consults the lexicon, sends exactly
/// one response.
async fn prophesy(
    question: String,
    origin: u64,
    responses: RendezvousChannel<Response>,
    reply_delay: RandomDelay,
    nonsense_delay: RandomDelay,
    mut rng: StdRng,
) {
    // Keep them waiting. Pythia only gave prophecies on the seventh day of
    // each month.
    reply_delay.pause(&mut rng).await;

    let reply = lexicon::divine(&question, &mut rng);
    if reply.takes_longer {
        nonsense_delay.pause(&mut rng).await;
    }

    let response = Response {
        origin,
        text: reply.text.to_string(),
    };

    // Failures are dropped, never retried.
    if responses.send(response).await.is_err() {
        warn!(origin, "responses channel closed, prophecy lost");
    }
}
