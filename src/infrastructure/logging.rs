//! Logging setup.
//!
//! The terminal belongs to the UI, so all output goes to
//! `<logs>/formpilot.log` through a non-blocking writer.

use super::config::Config;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "formpilot.log";

/// Keeps the background writer alive; drop it last to flush.
pub struct LoggingHandle {
    pub _guard: WorkerGuard,
    pub log_file_path: PathBuf,
}

/// Filter directive: `RUST_LOG` wins, then `--debug`, then `info`.
pub fn filter_directive(config: &Config) -> String {
    select_directive(std::env::var("RUST_LOG").ok(), config.debug)
}

fn select_directive(rust_log: Option<String>, debug: bool) -> String {
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if debug => "debug".to_string(),
        _ => "info".to_string(),
    }
}

pub fn init_logging(config: &Config) -> io::Result<LoggingHandle> {
    let logs_dir = config.logs_path();
    std::fs::create_dir_all(&logs_dir)?;

    let file_appender = tracing_appender::rolling::never(&logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter_directive(config)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(LoggingHandle {
        _guard: guard,
        log_file_path: logs_dir.join(LOG_FILE_NAME),
    })
}
