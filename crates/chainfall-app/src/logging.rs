use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: Option<PathBuf>,
}

/// Installs the global subscriber. Stdout carries the protocol, so logs go to
/// stderr, or to `logging.file` as JSON lines. `RUST_LOG` overrides the
/// configured level.
pub fn init_logging(logging: &LoggingConfig) -> Result<LoggingGuard> {
    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let Some(path) = logging.file.as_ref() else {
        let (writer, guard) = non_blocking::NonBlockingBuilder::default()
            .lossy(false)
            .finish(std::io::stderr());
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(writer)
            .finish();
        // Ignore error if a global subscriber is already set (e.g., when running in tests)
        let _ = tracing::subscriber::set_global_default(subscriber);
        return Ok(LoggingGuard {
            _guard: guard,
            log_path: None,
        });
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory at {}", dir.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("creating log file at {}", path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(LoggingGuard {
        _guard: guard,
        log_path: Some(path.clone()),
    })
}
