//! Logging
//!
//! Two layers: `tracing` for the process console, and [`LogSink`] for the
//! tracking-domain log entries (debug/info/warn/error with optional JSON
//! data) that the tracking flow and proxy emit. Sinks never fail their
//! caller; a sink that cannot write reports the problem on the console.

mod client;
mod file;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub(crate) use client::ClientLog;
pub(crate) use file::FileLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(AppError::InvalidLogLevel {
                input: s.to_string(),
            }),
        }
    }
}

/// Destination for tracking log entries
pub(crate) trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, data: Option<Value>);

    fn debug(&self, message: &str, data: Option<Value>) {
        self.log(LogLevel::Debug, message, data);
    }

    fn info(&self, message: &str, data: Option<Value>) {
        self.log(LogLevel::Info, message, data);
    }

    fn warn(&self, message: &str, data: Option<Value>) {
        self.log(LogLevel::Warn, message, data);
    }

    fn error(&self, message: &str, data: Option<Value>) {
        self.log(LogLevel::Error, message, data);
    }
}

/// Echo an entry on the tracing console at the matching level
pub(crate) fn emit_console(level: LogLevel, message: &str, data: Option<&Value>) {
    let data = data.map(Value::to_string).unwrap_or_default();
    match level {
        LogLevel::Debug => tracing::debug!(data = %data, "{message}"),
        LogLevel::Info => tracing::info!(data = %data, "{message}"),
        LogLevel::Warn => tracing::warn!(data = %data, "{message}"),
        LogLevel::Error => tracing::error!(data = %data, "{message}"),
    }
}

/// Install the process-wide subscriber. `RUST_LOG` wins over `debug`.
///
/// Output goes to stderr so `--json` output on stdout stays parseable.
pub(crate) fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_levels_case_insensitive() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" info ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Error".parse::<LogLevel>().unwrap(), LogLevel::Error);
    }

    #[test]
    fn parse_unknown_level_is_error() {
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn level_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), r#""warn""#);
        let level: LogLevel = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(level, LogLevel::Error);
    }
}
