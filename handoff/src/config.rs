//! Configuration objects for pipelines and the oracle.
//!
//! Both configs are immutable once the orchestrator starts. Durations are
//! carried as `_ms` fields and converted to [`crate::concurrency::delay`]
//! bounds at startup. The `seed` fields make every random choice in a run
//! reproducible; nothing in the crate touches global random state.

use serde::{Deserialize, Serialize};

/// Configuration for a producer/consumer pipeline, fixed at start.
///
/// The defaults mirror the classic many-to-many testbed: four producers and
/// two consumers moving 32 items with up to 100 ms of simulated latency per
/// item.
///
/// A config with items to produce but no consumers deadlocks the pipeline's
/// wait: the producers park on a rendezvous no one will ever complete. That
/// hang is a property of the rendezvous contract, not something the pipeline
/// papers over with timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of producer workers to spawn.
    pub producer_count: u32,
    /// Number of consumer workers to spawn.
    pub consumer_count: u32,
    /// Number of items each producer sends before signaling completion.
    pub items_per_producer: u32,
    /// Upper bound in milliseconds on the simulated production latency per item.
    pub produce_delay_ms: u64,
    /// Upper bound in milliseconds on the simulated consumption latency per item.
    pub consume_delay_ms: u64,
    /// Whether the orchestrator also waits for consumers to drain.
    ///
    /// Off by default: producers completing is the termination condition, and
    /// items a consumer has not yet recorded by then are accepted loss. Turn
    /// this on to opt into the "no message ever lost" guarantee.
    pub await_consumers: bool,
    /// Seed for all random delay choices made by this pipeline's workers.
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            producer_count: 4,
            consumer_count: 2,
            items_per_producer: 8,
            produce_delay_ms: 100,
            consume_delay_ms: 100,
            await_consumers: false,
            seed: 0,
        }
    }
}

/// Configuration for the oracle responder, fixed at start.
///
/// The delay defaults preserve the original oracle's pacing: up to five
/// seconds of contemplation per reply, up to ten between unsolicited
/// prophecies, ten more for nonsense, and a tenth of a second between printed
/// characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Name the oracle answers under.
    pub star: String,
    /// Where the oracle holds court; used by greeting text only.
    pub venue: String,
    /// Upper bound in milliseconds on the contemplation delay before a reply.
    pub reply_delay_ms: u64,
    /// Upper bound in milliseconds between unsolicited idle prophecies.
    ///
    /// Keep this above zero while `idle_prophecies` is on; a zero bound makes
    /// the muse loop spawn respond tasks without ever suspending.
    pub muse_delay_ms: u64,
    /// Upper bound in milliseconds on the extra delay taken by nonsense replies.
    pub nonsense_delay_ms: u64,
    /// Fixed delay in milliseconds between printed characters.
    pub char_delay_ms: u64,
    /// Whether the oracle mutters prophecies even when nobody asks.
    pub idle_prophecies: bool,
    /// Seed for all of the oracle's random choices.
    pub seed: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            star: "Pythia".to_string(),
            venue: "Delphi".to_string(),
            reply_delay_ms: 5_000,
            muse_delay_ms: 10_000,
            nonsense_delay_ms: 10_000,
            char_delay_ms: 100,
            idle_prophecies: true,
            seed: 0,
        }
    }
}
