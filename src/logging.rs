use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level used when `RUST_LOG` is not set.
pub fn default_level(debug_mode: bool) -> &'static str {
    if debug_mode { "debug" } else { "info" }
}

/// Setup logging to stderr, plus an optional daily rotating log file.
///
/// Stdout is left untouched because menu output is written there.
///
/// # Arguments
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `log_dir` - Directory for log files, or `None` for stderr only
/// * `log_prefix` - Prefix for log files (e.g., "wrapwine-scan")
///
/// # Returns
/// A guard that must be held for the duration of the program when a log file is used
pub fn setup_logging(
    debug_mode: bool,
    log_dir: Option<&Utf8Path>,
    log_prefix: &str,
) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(debug_mode)));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory: {}", dir))?;
            }

            let file_appender = rolling::daily(dir, log_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // No ANSI codes in log files
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        "Logging initialized: debug={}, log_dir={:?}",
        debug_mode,
        log_dir
    );

    Ok(guard)
}
