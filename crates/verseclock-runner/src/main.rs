//! Verse clock entry point.
//!
//! Shows a Bible verse chosen by the current hour and minute instead of
//! numerals. Verses come from a JSON document served over HTTP or read
//! from disk; the face is drawn to the terminal.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `verseclock-config.yaml` (or
//!    `$VERSECLOCK_CONFIG`), falling back to defaults
//! 2. Initialize structured logging (tracing) on stderr
//! 3. Build the verse source and the terminal sink
//! 4. Run the clock controller until Ctrl-C

mod error;
mod provider;
mod terminal;

use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use verseclock_core::clock::LocalTimeSource;
use verseclock_core::config::{ClockConfig, LogFormat, LoggingConfig};
use verseclock_core::controller::ClockController;
use verseclock_core::store::VerseProvider;

use crate::error::RunnerError;
use crate::provider::create_source;
use crate::terminal::TerminalSink;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "verseclock-config.yaml";

/// Application entry point.
///
/// Runs on a single-threaded runtime: the controller's tick and refresh
/// timers share one cooperative scheduler.
///
/// # Errors
///
/// Returns an error if configuration fails, or if the verse load (initial or
/// at a refresh) fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    init_logging(&config.logging);

    info!("verseclock starting");
    info!(
        tick_interval_ms = config.clock.tick_interval_ms,
        full_refresh = config.clock.full_refresh,
        request_timeout_ms = config.source.request_timeout_ms,
        "configuration loaded"
    );

    let source = create_source(&config.source)?;
    info!(source = source.describe(), "verse source configured");

    let mut controller = ClockController::new(
        source,
        LocalTimeSource,
        TerminalSink::stdout(),
        config.clock,
    );

    let summary = controller
        .run(shutdown_signal())
        .await
        .context("verse clock stopped")?;

    info!(
        ticks = summary.ticks,
        refreshes = summary.refreshes,
        "verseclock shutdown complete"
    );
    Ok(())
}

/// Load configuration from the file named by `VERSECLOCK_CONFIG`, or from
/// `verseclock-config.yaml` in the working directory.
///
/// A missing file means defaults (with environment overrides).
fn load_config() -> Result<ClockConfig, RunnerError> {
    let path = std::env::var("VERSECLOCK_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        Ok(ClockConfig::from_file(&path)?)
    } else {
        Ok(ClockConfig::from_env()?)
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
