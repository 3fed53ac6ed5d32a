use tokio::io::AsyncWriteExt;

use crate::error::HandoffResult;
use crate::sink::Sink;

/// Sink that writes string chunks straight to stdout.
///
/// Every chunk is flushed immediately, so the oracle's per-character pacing is
/// visible on a terminal instead of disappearing into a line buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Creates a new stdout sink.
    pub fn new() -> Self {
        Self
    }
}

impl Sink<String> for StdoutSink {
    async fn deliver(&self, chunk: String) -> HandoffResult<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(chunk.as_bytes()).await?;
        stdout.flush().await?;

        Ok(())
    }
}
