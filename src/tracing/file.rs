use std::path::Path;

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use super::filter::CrateLevelFilter;
use super::format::MuhaqqiqFormat;
use crate::config::LoggingConfig;
use crate::error::EngineError;

/// Keeps the non-blocking file writers flushing; drop it last.
#[must_use]
pub struct TracingGuard {
    _guards: Vec<WorkerGuard>,
}

/// Daily rolling files under `<directory>/debug` and `<directory>/error`, plus
/// terminal output on stderr. `RUST_LOG`, when set, replaces the terminal
/// level filter.
pub fn setup_tracing(
    logging: &LoggingConfig,
    engine_name: &str,
) -> Result<TracingGuard, EngineError> {
    let base_logs_dir = Path::new(logging.directory.as_deref().unwrap_or(".logs"));
    for dir in [base_logs_dir.to_path_buf(), base_logs_dir.join("debug"), base_logs_dir.join("error")] {
        std::fs::create_dir_all(&dir).map_err(|e| {
            EngineError::SetupTracingError(format!("failed to create logs directory {}: {}", dir.display(), e))
        })?;
    }

    let file_name = format!("{}.log", engine_name);
    let debug_appender = RollingFileAppender::new(Rotation::DAILY, base_logs_dir.join("debug"), &file_name);
    let error_appender = RollingFileAppender::new(Rotation::DAILY, base_logs_dir.join("error"), &file_name);
    let (non_blocking_debug, debug_guard) = tracing_appender::non_blocking(debug_appender);
    let (non_blocking_error, error_guard) = tracing_appender::non_blocking(error_appender);

    let format = MuhaqqiqFormat::new(engine_name);

    #[cfg(feature = "dev")]
    let terminal_levels = CrateLevelFilter::info_only();
    #[cfg(not(feature = "dev"))]
    let terminal_levels = CrateLevelFilter::error_only();

    let terminal = tracing_subscriber::fmt::Layer::default()
        .with_ansi(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .event_format(format.clone())
        .with_writer(std::io::stderr);
    let terminal = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => terminal.with_filter(env_filter).boxed(),
        Err(_) => terminal.with_filter(terminal_levels).boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(terminal)
        .with(file_layer(format.clone(), non_blocking_debug, CrateLevelFilter::debug_only()))
        .with(file_layer(format, non_blocking_error, CrateLevelFilter::warn_and_error()));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| EngineError::SetupTracingError(e.to_string()))?;

    tracing::info!("{}_logging_started::debug_logs::{}", engine_name, base_logs_dir.join("debug").join(&file_name).display());
    tracing::info!("{}_logging_started::error_logs::{}", engine_name, base_logs_dir.join("error").join(&file_name).display());

    Ok(TracingGuard {
        _guards: vec![debug_guard, error_guard],
    })
}

fn file_layer<S>(
    format: MuhaqqiqFormat,
    writer: NonBlocking,
    filter: CrateLevelFilter,
) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    tracing_subscriber::fmt::Layer::default()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .event_format(format)
        .with_writer(writer)
        .with_filter(filter)
}
