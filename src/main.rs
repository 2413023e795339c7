//! warden - moderation bot
//!
//! Reads gateway events as JSON lines from stdin and writes every platform
//! call as a JSON line to stdout.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use warden::config::{self, Config};
use warden::proto::GatewayEvent;
use warden::session::ConsoleSession;
use warden::{Bot, plugins};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(&config_path)?;

    // Initialize tracing; logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid config");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(bot = %config.bot.name, version = env!("CARGO_PKG_VERSION"), "Starting warden");

    let sync = config.bot.sync_commands;
    let bot = Arc::new(
        Bot::builder(config)
            .session(Arc::new(ConsoleSession::stdout()))
            .plugins(plugins::bundled())
            .build()
            .await?,
    );

    if sync {
        bot.sync_commands().await?;
    }

    let mut input = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    let mut tasks = JoinSet::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = read_line(&mut input, &mut buf) => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("Input closed");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read input");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<GatewayEvent>(&line) {
                    Ok(event) => {
                        let bot = Arc::clone(&bot);
                        tasks.spawn(async move { bot.handle_event(event).await });
                    }
                    Err(e) => warn!(error = %e, "Skipping malformed gateway event"),
                }
            }
            Some(joined) = tasks.join_next() => {
                if let Err(e) = joined {
                    error!(error = %e, "Event task failed");
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    // Let in-flight invocations finish
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Event task failed");
        }
    }

    bot.shutdown().await;
    Ok(())
}

/// Read one line, replacing invalid UTF-8 so a bad line cannot end the loop.
///
/// Bytes from a read cancelled by `select!` stay in `buf` and are picked up by
/// the next call. Returns `Ok(None)` once input is exhausted.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(['\r', '\n'])
        .to_string();
    buf.clear();
    Ok(Some(line))
}
