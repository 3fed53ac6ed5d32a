//! Unbuffered rendezvous channel connecting producers and consumers.
//!
//! A [`RendezvousChannel`] has no buffer at all: a send parks the sender until
//! a receiver has actually taken the value, and a receive parks the receiver
//! until a sender shows up or the channel closes. The close is the only
//! shutdown primitive, and it only affects receivers, which observe it as
//! end-of-stream; a sender caught mid-handoff by a close faults instead.

use std::pin::pin;
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tracing::warn;

use crate::bail;
use crate::error::{ErrorKind, HandoffResult};

/// Shared state behind a [`RendezvousChannel`].
#[derive(Debug)]
struct ChannelState<T> {
    /// The single exchange slot. `Some` means a sender has deposited a value
    /// and is parked waiting for a receiver to take it.
    slot: Option<T>,
    /// Number of completed handoffs.
    delivered: u64,
    closed: bool,
}

#[derive(Debug)]
struct ChannelInner<T> {
    state: Mutex<ChannelState<T>>,
    /// Notified when the exchange slot becomes free.
    slot_free: Notify,
    /// Notified when a value lands in the slot or the channel closes.
    value_ready: Notify,
    /// Notified when a receiver completes a handoff or the channel closes.
    handoff_done: Notify,
}

/// Unbuffered, closable handoff channel shared by any number of senders and
/// receivers.
///
/// Cloning the channel clones a handle to the same shared state; all clones
/// exchange values through the same single slot. Each sent value is delivered
/// to exactly one receiver. Send order is preserved for a single sender; the
/// interleaving across senders is scheduler-determined.
///
/// The rendezvous only makes progress when both sides are scheduled: a
/// [`send`](RendezvousChannel::send) with no receiver task anywhere (and the
/// mirror case for [`recv`](RendezvousChannel::recv)) blocks forever. Spawn
/// the partner first, then rendezvous.
#[derive(Debug)]
pub struct RendezvousChannel<T> {
    inner: Arc<ChannelInner<T>>,
}

impl<T> Clone for RendezvousChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for RendezvousChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RendezvousChannel<T> {
    /// Creates a new open channel with an empty exchange slot.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                state: Mutex::new(ChannelState {
                    slot: None,
                    delivered: 0,
                    closed: false,
                }),
                slot_free: Notify::new(),
                value_ready: Notify::new(),
                handoff_done: Notify::new(),
            }),
        }
    }

    /// Sends one value, blocking until a receiver has taken it.
    ///
    /// The send happens in two phases: first the sender claims the exchange
    /// slot, then it waits for a receiver to complete the handoff. Returning
    /// after the first phase would turn the rendezvous into a buffered send.
    ///
    /// Sending on a closed channel is a usage fault
    /// ([`ErrorKind::SendOnClosedChannel`]), and so is being parked mid-handoff
    /// when the channel closes: the deposited value is discarded and this call
    /// returns the fault instead of completing.
    pub async fn send(&self, value: T) -> HandoffResult<()> {
        let mut outgoing = Some(value);

        // Phase one: claim the exchange slot.
        let ticket = loop {
            // The notified future is registered before the state check so that a
            // wakeup arriving between the check and the await cannot be missed.
            let mut slot_free = pin!(self.inner.slot_free.notified());
            slot_free.as_mut().enable();

            {
                let mut state = self.inner.state.lock().await;
                if state.closed {
                    bail!(
                        ErrorKind::SendOnClosedChannel,
                        "Send on closed channel",
                        "the producer side was already confirmed done when this send started"
                    );
                }
                if state.slot.is_none() {
                    state.slot = outgoing.take();
                    // The value just deposited completes handoff number
                    // `delivered + 1`.
                    let ticket = state.delivered;
                    drop(state);
                    self.inner.value_ready.notify_waiters();
                    break ticket;
                }
            }

            slot_free.as_mut().await;
        };

        // Phase two: wait for a receiver to take the value.
        loop {
            let mut handoff_done = pin!(self.inner.handoff_done.notified());
            handoff_done.as_mut().enable();

            {
                let state = self.inner.state.lock().await;
                if state.delivered > ticket {
                    return Ok(());
                }
                if state.closed {
                    bail!(
                        ErrorKind::SendOnClosedChannel,
                        "Channel closed while a handoff was in flight",
                        "the deposited value was discarded by the close"
                    );
                }
            }

            handoff_done.as_mut().await;
        }
    }

    /// Receives one value, blocking until a sender provides it.
    ///
    /// Returns [`None`] once the channel is closed and no in-flight value
    /// remains. End-of-stream is not an error: it is how a consuming loop
    /// terminates cleanly, and repeated calls after close keep returning
    /// [`None`] without blocking.
    pub async fn recv(&self) -> Option<T> {
        loop {
            let mut value_ready = pin!(self.inner.value_ready.notified());
            value_ready.as_mut().enable();

            {
                let mut state = self.inner.state.lock().await;
                if let Some(value) = state.slot.take() {
                    state.delivered += 1;
                    drop(state);
                    self.inner.slot_free.notify_waiters();
                    self.inner.handoff_done.notify_waiters();
                    return Some(value);
                }
                if state.closed {
                    return None;
                }
            }

            value_ready.as_mut().await;
        }
    }

    /// Closes the channel, waking every parked sender and receiver.
    ///
    /// Closing is not idempotent: a second close is a usage fault
    /// ([`ErrorKind::ChannelAlreadyClosed`]). Only the party that owns
    /// producer-completion responsibility may close, and only after every
    /// producer has confirmed it will send no more values; an undelivered
    /// in-flight value is discarded and its sender faults.
    pub async fn close(&self) -> HandoffResult<()> {
        {
            let mut state = self.inner.state.lock().await;
            if state.closed {
                bail!(ErrorKind::ChannelAlreadyClosed, "Channel closed twice");
            }
            state.closed = true;

            if state.slot.take().is_some() {
                warn!("channel closed with an undelivered value in flight");
            }
        }

        self.inner.value_ready.notify_waiters();
        self.inner.slot_free.notify_waiters();
        self.inner.handoff_done.notify_waiters();

        Ok(())
    }

    /// Returns the number of completed handoffs so far.
    pub async fn delivered(&self) -> u64 {
        self.inner.state.lock().await.delivered
    }

    /// Returns whether the channel has been closed.
    pub async fn is_closed(&self) -> bool {
        self.inner.state.lock().await.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handoff_increments_delivered_counter() {
        let channel = RendezvousChannel::new();

        let sender = channel.clone();
        tokio::spawn(async move {
            for n in 0..3u32 {
                sender.send(n).await.unwrap();
            }
        });

        for _ in 0..3 {
            channel.recv().await.unwrap();
        }

        assert_eq!(channel.delivered().await, 3);
    }

    #[tokio::test]
    async fn test_close_marks_channel_closed() {
        let channel: RendezvousChannel<u32> = RendezvousChannel::new();
        assert!(!channel.is_closed().await);

        channel.close().await.unwrap();
        assert!(channel.is_closed().await);
    }
}
