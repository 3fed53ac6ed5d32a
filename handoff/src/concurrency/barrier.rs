//! Counting barrier that gates an orchestrator on worker completion.
//!
//! A [`CompletionBarrier`] answers a question a drained channel cannot: has
//! every producer actually finished its own work? A consuming loop that sees
//! an empty channel only knows no value is buffered right now; the barrier
//! releases exactly when all expected completion signals have arrived, which
//! is the condition an orchestrator must reach before it may close the shared
//! channel.

use std::pin::pin;
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, HandoffResult};

#[derive(Debug)]
struct BarrierState {
    /// Required signal count, set exactly once through `expect`.
    expected: Option<usize>,
    remaining: usize,
}

#[derive(Debug)]
struct BarrierInner {
    state: Mutex<BarrierState>,
    released: Notify,
}

/// Cloneable counting barrier with explicit usage faults.
///
/// The barrier is configured once with [`expect`](CompletionBarrier::expect),
/// signaled exactly once per worker with
/// [`signal`](CompletionBarrier::signal), and awaited with
/// [`wait`](CompletionBarrier::wait). Every signal happens-before the wait
/// returns. Misuse (reconfiguring, signaling before configuration, or
/// signaling past the expected count) surfaces as an error instead of
/// silently corrupting the count.
#[derive(Debug, Clone)]
pub struct CompletionBarrier {
    inner: Arc<BarrierInner>,
}

impl Default for CompletionBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionBarrier {
    /// Creates a new unconfigured barrier.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BarrierInner {
                state: Mutex::new(BarrierState {
                    expected: None,
                    remaining: 0,
                }),
                released: Notify::new(),
            }),
        }
    }

    /// Sets the required signal count.
    ///
    /// Must be called before any worker starts; configuring a barrier twice is
    /// a usage fault ([`ErrorKind::BarrierAlreadyConfigured`]). Expecting zero
    /// signals is valid and makes [`wait`](CompletionBarrier::wait) return
    /// immediately.
    pub async fn expect(&self, count: usize) -> HandoffResult<()> {
        let mut state = self.inner.state.lock().await;
        if let Some(expected) = state.expected {
            bail!(
                ErrorKind::BarrierAlreadyConfigured,
                "Barrier configured twice",
                format!("barrier already expects {expected} signals")
            );
        }

        state.expected = Some(count);
        state.remaining = count;

        Ok(())
    }

    /// Reports the completion of one worker.
    ///
    /// A worker must call this exactly once on every exit path, including
    /// failure paths; a missed signal leaves
    /// [`wait`](CompletionBarrier::wait) blocked forever. Signaling an
    /// unconfigured barrier or signaling past the expected count is a usage
    /// fault.
    pub async fn signal(&self) -> HandoffResult<()> {
        let release = {
            let mut state = self.inner.state.lock().await;
            let Some(expected) = state.expected else {
                bail!(
                    ErrorKind::BarrierNotConfigured,
                    "Signal on unconfigured barrier"
                );
            };
            if state.remaining == 0 {
                bail!(
                    ErrorKind::BarrierOverSignaled,
                    "Barrier signaled more times than expected",
                    format!("barrier expects {expected} signals")
                );
            }

            state.remaining -= 1;
            debug!(remaining = state.remaining, "barrier signaled");

            state.remaining == 0
        };

        // The release happens exactly once, on the signal that brings the
        // count to zero.
        if release {
            self.inner.released.notify_waiters();
        }

        Ok(())
    }

    /// Blocks until every expected signal has arrived.
    ///
    /// Returns immediately when the barrier expects zero signals. Waiting on
    /// an unconfigured barrier is a usage fault
    /// ([`ErrorKind::BarrierNotConfigured`]).
    pub async fn wait(&self) -> HandoffResult<()> {
        loop {
            // Register before checking so a release between the check and the
            // await cannot be missed.
            let mut released = pin!(self.inner.released.notified());
            released.as_mut().enable();

            {
                let state = self.inner.state.lock().await;
                if state.expected.is_none() {
                    bail!(
                        ErrorKind::BarrierNotConfigured,
                        "Wait on unconfigured barrier"
                    );
                }
                if state.remaining == 0 {
                    return Ok(());
                }
            }

            released.as_mut().await;
        }
    }

    /// Returns the number of signals still outstanding.
    pub async fn remaining(&self) -> usize {
        self.inner.state.lock().await.remaining
    }
}
