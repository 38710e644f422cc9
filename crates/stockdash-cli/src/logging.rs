//! `tracing` subscriber setup.
//!
//! Level comes from `STOCKDASH_LOG`, then `RUST_LOG`, then `info`.
//! `STOCKDASH_LOG_FORMAT=json` switches to JSON lines.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Used while the dashboard owns the terminal.
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

impl LogFormat {
    fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Plain,
        }
    }
}

pub fn init(target: &LogTarget) -> Result<(), CliError> {
    let format = log_format();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    let result = match target {
        LogTarget::Stderr => {
            let builder = builder.with_writer(std::io::stderr);
            match format {
                LogFormat::Json => builder.json().try_init(),
                LogFormat::Plain => builder.try_init(),
            }
        }
        LogTarget::File(path) => {
            let builder = builder
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?));
            match format {
                LogFormat::Json => builder.json().try_init(),
                LogFormat::Plain => builder.try_init(),
            }
        }
    };

    result.map_err(|error| CliError::Logging(error.to_string()))
}

fn open_log_file(path: &Path) -> Result<File, CliError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn env_filter() -> EnvFilter {
    let override_level = std::env::var("STOCKDASH_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| std::env::var("RUST_LOG").ok());

    match override_level {
        Some(value) => EnvFilter::new(value),
        None => EnvFilter::new("info"),
    }
}

fn log_format() -> LogFormat {
    LogFormat::from_setting(std::env::var("STOCKDASH_LOG_FORMAT").ok().as_deref())
}
