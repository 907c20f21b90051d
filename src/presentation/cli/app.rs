use clap::Parser;
use std::path::PathBuf;

/// hostwatch: host resource monitor
///
/// Samples CPU, memory and root filesystem usage at a fixed interval,
/// prints a usage report and emails an alert when a threshold is exceeded.
#[derive(Parser, Debug)]
#[command(name = "hostwatch")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Path to the configuration file (default: <config dir>/hostwatch/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Monitoring interval in seconds (overrides the config file)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Also write logs to a rotating file (hostwatch.log)
    #[arg(long)]
    pub log_file: bool,

    /// Append reports to this file instead of the terminal
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single check and exit
    #[arg(long)]
    pub once: bool,
}
