//! Tracing setup for the emscope binary.

use anyhow::{Context, Result};
use emscope_protocol::paths;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str =
    "emscope=info,emscope_mapping=info,emscope_db=info,emscope_client=info";

/// Initialize tracing with a log file under the emscope logs directory and a
/// stderr layer. `RUST_LOG` overrides the default filter; `verbose` lifts
/// the console to the full filter as well.
pub fn init_logging(verbose: bool) -> Result<()> {
    let log_path = paths::default_logs_dir().join("emscope.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter_spec =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    let file_filter = EnvFilter::new(&filter_spec);
    let console_filter = if verbose {
        EnvFilter::new(&filter_spec)
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();

    Ok(())
}
