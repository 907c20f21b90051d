use std::path::Path;

use anyhow::Context;
use clap::Parser;

use hostwatch::application::config::{expand_path, AppConfig};
use hostwatch::application::services::monitor::MonitorService;
use hostwatch::domain::value_objects::thresholds::ThresholdSet;
use hostwatch::infrastructure::collectors::sysinfo_collector::SysinfoCollector;
use hostwatch::infrastructure::logging::{init_tracing, DEFAULT_LOG_FILE};
use hostwatch::infrastructure::notifications::email::EmailNotifier;
use hostwatch::presentation::cli::app::Cli;
use hostwatch::presentation::cli::commands::daemon::{run_daemon, run_once, shutdown_signal};
use hostwatch::presentation::cli::output::open_sink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_file.then(|| Path::new(DEFAULT_LOG_FILE)))?;

    let (mut config, config_path) = AppConfig::load_or_default(cli.config.as_deref());
    config.apply_interval_override(cli.interval);
    if let Err(e) = config.validate() {
        tracing::error!("{e}");
        return Err(e.into());
    }
    if config.email.is_placeholder() {
        tracing::warn!("Email settings still hold placeholder credentials; alert emails will fail");
    }

    let output = cli.output.as_deref().map(expand_path);
    let sink = open_sink(output.as_deref()).context("Failed to open report output")?;

    // Manual DI: main.rs is the only place that knows concrete types
    let sampler = SysinfoCollector::new();
    let notifier = EmailNotifier::new(config.email.clone());
    let thresholds = ThresholdSet::from(&config.thresholds);
    let interval = config.effective_interval(cli.interval);

    let mut service = MonitorService::new(
        &sampler,
        &notifier,
        sink.as_ref(),
        &thresholds,
        config.cooldown_window(),
    );

    tracing::info!("Starting system monitoring (interval: {}s)", interval.as_secs());
    tracing::info!(
        "Alert cooldown {}s, configuration from {}",
        config.alert_cooldown,
        config_path.display()
    );

    if cli.once {
        if !run_once(&mut service).await {
            tracing::warn!("Single check finished without a sample");
        }
        return Ok(());
    }

    run_daemon(&mut service, interval, shutdown_signal()).await;
    Ok(())
}
