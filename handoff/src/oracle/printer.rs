use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{Instrument, debug, warn};

use crate::concurrency::channel::RendezvousChannel;
use crate::error::HandoffResult;
use crate::sink::Sink;
use crate::types::Response;
use crate::workers::base::WorkerType;

/// Sole consumer of the oracle's responses channel.
///
/// The printer drains responses forever and delivers each one as a contiguous
/// burst: the star's name, then the reply one character at a time with a fixed
/// inter-character delay, then a newline. Because nothing else reads the
/// responses channel, no two responses ever interleave on the sink.
pub(crate) struct PrinterWorker<K> {
    star: String,
    char_delay: Duration,
    responses: RendezvousChannel<Response>,
    sink: K,
}

impl<K> PrinterWorker<K>
where
    K: Sink<String> + Send + Sync + 'static,
{
    pub(crate) fn new(
        star: String,
        char_delay: Duration,
        responses: RendezvousChannel<Response>,
        sink: K,
    ) -> Self {
        Self {
            star,
            char_delay,
            responses,
            sink,
        }
    }

    /// Spawns the printer onto its own task.
    pub(crate) fn start(self) -> JoinHandle<()> {
        let span = tracing::info_span!("worker", kind = %WorkerType::Printer);

        tokio::spawn(
            async move {
                while let Some(response) = self.responses.recv().await {
                    if let Err(err) = self.print(response).await {
                        // The printer keeps serving; one failed delivery does
                        // not end the stream.
                        warn!(error = %err, "failed to deliver a response");
                    }
                }

                debug!("responses channel closed, printer ending");
            }
            .instrument(span),
        )
    }

    async fn print(&self, response: Response) -> HandoffResult<()> {
        debug!(origin = response.origin, "printing response");

        self.sink.deliver(format!("{}\n", self.star)).await?;

        for ch in response.text.chars() {
            self.sink.deliver(ch.to_string()).await?;

            if !self.char_delay.is_zero() {
                sleep(self.char_delay).await;
            }
        }

        self.sink.deliver("\n".to_string()).await?;

        Ok(())
    }
}
