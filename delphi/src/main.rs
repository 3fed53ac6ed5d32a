use clap::Parser;
use tracing_subscriber::EnvFilter;

mod core;

/// An oracle that answers questions in its own time.
#[derive(Debug, Parser)]
#[command(name = "delphi")]
pub struct Args {
    /// Seed for the oracle's random choices; drawn from entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Upper bound in milliseconds on the oracle's contemplation delay.
    #[arg(long, default_value_t = 5_000)]
    pub reply_delay_ms: u64,

    /// Upper bound in milliseconds between unsolicited prophecies.
    #[arg(long, default_value_t = 10_000)]
    pub muse_delay_ms: u64,

    /// Fixed delay in milliseconds between printed characters.
    #[arg(long, default_value_t = 100)]
    pub char_delay_ms: u64,

    /// Keep the oracle quiet unless it is asked something.
    #[arg(long)]
    pub no_idle_prophecies: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    core::run(args).await
}

/// Default to warnings only so log lines do not cut into the oracle's
/// character-paced output; raise with RUST_LOG when debugging.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}
