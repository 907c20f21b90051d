pub mod rotating_file;

use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

pub use rotating_file::RotatingFile;

/// Log file written in the working directory when file logging is enabled.
pub const DEFAULT_LOG_FILE: &str = "hostwatch.log";

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Build the subscriber: compact console output on stderr, plus an ANSI-free
/// rotating file layer when `log_file` is given.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn build_subscriber(
    verbose: bool,
    log_file: Option<&Path>,
) -> anyhow::Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file = match log_file {
        Some(path) => {
            let writer = RotatingFile::open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(writer))
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(console)
        .with(file))
}

/// Install the process-wide subscriber. Call once, from `main`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_tracing(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let subscriber = build_subscriber(verbose, log_file)?;
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")
}
