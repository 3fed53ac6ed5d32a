//! Value types exchanged over the handoff channels.

use std::fmt;

/// Identifier of a pipeline instance, used for logging and diagnostics.
pub type PipelineId = u64;

/// One unit of work exchanged between a producer and a consumer.
///
/// Producers number their items starting at 1, so a single-producer stream of
/// `n` items is observed by its consumer as the sequence `1..=n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    /// Identifier of the producer that created this item.
    pub producer: u32,
    /// Position of this item in its producer's stream, starting at 1.
    pub seq: u32,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}:{}", self.producer, self.seq)
    }
}

/// A single oracle reply on its way to the printer.
///
/// The origin identifies the respond task that produced the reply; arrival
/// order on the responses channel, not origin order, decides output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Sequence number of the respond task that produced this reply.
    pub origin: u64,
    /// The chosen reply text.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_display_uses_producer_prefix() {
        let item = Item {
            producer: 3,
            seq: 7,
        };
        assert_eq!(item.to_string(), "p3:7");
    }
}
