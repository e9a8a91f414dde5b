use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::{LogLevel, LogSink, emit_console};

#[derive(Serialize)]
struct RemoteEntry<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    message: &'a str,
    data: &'a Value,
}

/// Logger used by the tracking client: filters by level, echoes to the
/// console and, when a proxy is known, forwards each entry to its
/// `/api/log` endpoint. Forwarding failures are reported and dropped.
pub(crate) struct ClientLog {
    min_level: LogLevel,
    remote: Option<Remote>,
}

struct Remote {
    agent: ureq::Agent,
    url: String,
}

impl ClientLog {
    pub(crate) fn console(min_level: LogLevel) -> Self {
        Self {
            min_level,
            remote: None,
        }
    }

    pub(crate) fn with_proxy(min_level: LogLevel, proxy_url: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            min_level,
            remote: Some(Remote {
                agent,
                url: format!("{}/api/log", proxy_url.trim_end_matches('/')),
            }),
        }
    }

    pub(crate) fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn forward(remote: &Remote, level: LogLevel, message: &str, data: &Value) -> Result<(), ureq::Error> {
        let entry = RemoteEntry {
            kind: level.as_str(),
            message,
            data,
        };
        remote.agent.post(&remote.url).send_json(&entry)?;
        Ok(())
    }
}

impl LogSink for ClientLog {
    fn log(&self, level: LogLevel, message: &str, data: Option<Value>) {
        if !self.enabled(level) {
            return;
        }
        let data = data.unwrap_or_else(|| Value::Object(Default::default()));
        if let Some(remote) = &self.remote
            && let Err(e) = Self::forward(remote, level, message, &data)
        {
            tracing::warn!(url = %remote.url, "Failed to send log to server: {e}");
        }
        emit_console(level, message, Some(&data));
    }
}
