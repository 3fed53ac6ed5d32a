//! Concurrency primitives for coordinating producer/consumer pipelines.
//!
//! This module provides the two synchronization objects everything else is
//! built on, plus the latency model used to exercise them:
//!
//! - The [`channel`] module implements the unbuffered rendezvous channel that
//!   connects producers and consumers. A send completes only when a receiver
//!   has taken the value, so the channel never hides unfinished work behind a
//!   buffer.
//! - The [`barrier`] module implements the completion barrier an orchestrator
//!   waits on before it may close the channel. The barrier is what
//!   distinguishes "the channel has no value right now" from "every producer
//!   has actually finished".
//! - The [`delay`] module models bounded random production and consumption
//!   latency from an injected random source.
//!
//! # Ordering rules
//!
//! Two orderings keep a pipeline built from these primitives deadlock- and
//! fault-free:
//!
//! 1. A worker must be handed to its own task before anything attempts to
//!    rendezvous with it. Sending or receiving against a partner that was
//!    never scheduled blocks forever.
//! 2. The orchestrator waits on the barrier first and closes the channel
//!    second, never the reverse. Closing early faults any producer still
//!    mid-stream.

pub mod barrier;
pub mod channel;
pub mod delay;
