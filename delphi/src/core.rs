use std::io::Write;

use handoff::config::OracleConfig;
use handoff::oracle::Oracle;
use handoff::sink::stdout::StdoutSink;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::Args;

pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = OracleConfig {
        seed: args.seed.unwrap_or_else(rand::random),
        reply_delay_ms: args.reply_delay_ms,
        muse_delay_ms: args.muse_delay_ms,
        char_delay_ms: args.char_delay_ms,
        idle_prophecies: !args.no_idle_prophecies,
        ..OracleConfig::default()
    };

    println!("Welcome to {}, the oracle at {}.", config.star, config.venue);
    println!("Your questions will be answered in due time.");

    let star = config.star.clone();
    let oracle = Oracle::new(config, StdoutSink::new());
    let handle = oracle.start().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        tokio::select! {
            maybe_line = lines.next_line() => {
                let Some(line) = maybe_line? else {
                    info!("input closed, silencing the oracle");
                    break;
                };

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                println!("{star} heard: {line}");
                handle.ask(line).await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, silencing the oracle");
                break;
            }
        }
    }

    // The responder never terminates on its own; aborting its tasks is the
    // shutdown path.
    handle.abort();

    Ok(())
}
