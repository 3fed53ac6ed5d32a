//! The oracle: a never-terminating responder over two rendezvous channels.
//!
//! The oracle keeps one long-lived intake channel for questions and one
//! long-lived responses channel feeding a single printer. Every question
//! spawns a fresh fire-and-forget respond task that sends exactly one reply
//! after a bounded random delay; a muse loop does the same for unsolicited
//! prophecies. Because the printer is the sole consumer of the responses
//! channel, output order exactly matches arrival order even though respond
//! tasks complete in arbitrary order.
//!
//! Respond tasks are spawned without any bound or backpressure, matching the
//! original fire-and-forget design. Under an adversarial question rate this
//! is a resource-exhaustion risk; it is left unbounded deliberately rather
//! than capped.

pub mod lexicon;
pub mod printer;
pub mod responder;

pub use responder::{Oracle, OracleHandle};
