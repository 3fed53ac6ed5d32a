//! Producer/consumer pipelines over an unbuffered rendezvous channel.
//!
//! This crate distills the lifecycle discipline of a concurrent
//! producer/consumer pipeline into a small set of composable pieces: a
//! rendezvous [channel](concurrency::channel) with explicit close semantics,
//! a completion [barrier](concurrency::barrier) that tells "all workers
//! finished" apart from "the channel looks empty", a
//! [worker](workers) model that is always scheduled before anyone
//! rendezvouses with it, a [pipeline](pipeline) orchestrator that enforces the
//! barrier-before-close shutdown ordering, and an [oracle](oracle) responder
//! that fans one fire-and-forget task out per input event and streams replies
//! back through a single printer.

pub mod concurrency;
pub mod config;
pub mod error;
mod macros;
pub mod oracle;
pub mod pipeline;
pub mod sink;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
pub mod workers;
