use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::{LogLevel, LogSink, emit_console};

/// Append-only text log, one file per UTC day: `<dir>/YYYY-MM-DD.log`
#[derive(Debug, Clone)]
pub(crate) struct FileLog {
    dir: PathBuf,
}

impl FileLog {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `./logs`, next to where the proxy runs
    pub(crate) fn default_dir() -> PathBuf {
        PathBuf::from("logs")
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn path_for(&self, at: DateTime<Utc>) -> PathBuf {
        self.dir.join(format!("{}.log", at.format("%Y-%m-%d")))
    }

    /// Record an entry whose kind came from outside (the `/api/log` body).
    /// Unrecognized kinds are written verbatim and echoed at info level.
    pub(crate) fn record(&self, kind: &str, message: &str, data: Option<&Value>, at: DateTime<Utc>) {
        let level = kind.parse::<LogLevel>().unwrap_or(LogLevel::Info);
        emit_console(level, message, data);
        if let Err(e) = self.append(kind, message, data, at) {
            tracing::error!(path = %self.path_for(at).display(), "Error writing to log file: {e}");
        }
    }

    pub(crate) fn append(
        &self,
        kind: &str,
        message: &str,
        data: Option<&Value>,
        at: DateTime<Utc>,
    ) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(at))?;
        file.write_all(format_entry(kind, message, data, at).as_bytes())
    }
}

impl LogSink for FileLog {
    fn log(&self, level: LogLevel, message: &str, data: Option<Value>) {
        self.record(level.as_str(), message, data.as_ref(), Utc::now());
    }
}

/// `[2026-03-05T14:30:00.000Z] [INFO] message`, then the data (strings raw,
/// everything else pretty-printed JSON), then a blank line.
pub(crate) fn format_entry(
    kind: &str,
    message: &str,
    data: Option<&Value>,
    at: DateTime<Utc>,
) -> String {
    let mut entry = format!(
        "[{}] [{}] {}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        kind.to_uppercase(),
        message
    );
    match data {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) if s.is_empty() => {}
        Some(Value::String(s)) => {
            entry.push('\n');
            entry.push_str(s);
        }
        Some(other) => {
            entry.push('\n');
            entry.push_str(&serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()));
        }
    }
    entry.push_str("\n\n");
    entry
}
