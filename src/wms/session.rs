//! WMS session caching
//!
//! A login yields a cookie that stays usable for a while. The client keeps
//! one cookie with a fixed 24-hour validity window and reuses it until the
//! window closes. On disk it is a single JSON record `{cookie, expiry, origin}`.
//! A cookie is only reused against the base URL that issued it.

use std::fs::{self, File};
use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Wms;
use crate::error::TrackError;
use crate::logging::LogSink;

pub(crate) const SESSION_TTL_HOURS: i64 = 24;

const SESSION_FILE: &str = "wmsSession.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CachedSession {
    pub(crate) cookie: String,
    pub(crate) expiry: DateTime<Utc>,
    /// Base URL that issued the cookie; records without one never match
    #[serde(default)]
    pub(crate) origin: String,
}

impl CachedSession {
    pub(crate) fn issued_at(cookie: String, origin: &str, now: DateTime<Utc>) -> Self {
        Self {
            cookie,
            expiry: now + TimeDelta::hours(SESSION_TTL_HOURS),
            origin: origin.to_string(),
        }
    }

    pub(crate) fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }

    pub(crate) fn belongs_to(&self, origin: &str) -> bool {
        !self.origin.is_empty() && self.origin == origin
    }
}

/// Session store, optionally backed by a file. Writes are best-effort: a
/// cache that cannot be persisted still serves the current process.
#[derive(Debug, Default)]
pub(crate) struct SessionCache {
    path: Option<PathBuf>,
    current: Option<CachedSession>,
}

impl SessionCache {
    pub(crate) fn in_memory() -> Self {
        Self::default()
    }

    /// Open the cache at `path`, loading any record already there.
    /// Unreadable or malformed files count as an empty cache.
    pub(crate) fn at_path(path: PathBuf) -> Self {
        let current = File::open(&path)
            .ok()
            .and_then(|file| serde_json::from_reader(file).ok());
        Self {
            path: Some(path),
            current,
        }
    }

    pub(crate) fn default_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Some(home.join(".cache").join("ordertrack").join(SESSION_FILE))
    }

    /// File-backed cache at the default location, in-memory when there is
    /// no home directory
    pub(crate) fn open_default() -> Self {
        Self::default_path()
            .map(Self::at_path)
            .unwrap_or_else(Self::in_memory)
    }

    pub(crate) fn current(&self) -> Option<&CachedSession> {
        self.current.as_ref()
    }

    pub(crate) fn store(&mut self, cookie: String, origin: &str, now: DateTime<Utc>) -> &CachedSession {
        let session = CachedSession::issued_at(cookie, origin, now);
        self.persist(&session);
        self.current.insert(session)
    }

    pub(crate) fn clear(&mut self) -> std::io::Result<()> {
        self.current = None;
        match &self.path {
            Some(path) if path.exists() => fs::remove_file(path),
            _ => Ok(()),
        }
    }

    fn persist(&self, session: &CachedSession) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match File::create(path) {
            Ok(mut file) => {
                if let Err(e) = serde_json::to_writer(&mut file, session) {
                    tracing::warn!(path = %path.display(), "Failed to write session cache: {e}");
                }
            }
            Err(e) => tracing::warn!(path = %path.display(), "Failed to create session cache: {e}"),
        }
    }
}

/// Return a usable session cookie, logging in only when the cache holds
/// none for this WMS or its window has closed. Login failures propagate
/// unretried.
pub(crate) fn acquire_session(
    wms: &dyn Wms,
    cache: &mut SessionCache,
    log: &dyn LogSink,
    now: DateTime<Utc>,
) -> Result<String, TrackError> {
    let origin = wms.origin();
    match cache.current() {
        Some(session) if !session.belongs_to(origin) => log.info(
            "Session cookie belongs to another WMS, logging in...",
            Some(json!({ "cached": session.origin, "wms": origin })),
        ),
        Some(session) if session.is_valid_at(now) => {
            let remaining = (session.expiry - now).num_minutes();
            log.info(
                "Using existing session cookie",
                Some(json!({
                    "expiry": session.expiry.to_rfc3339(),
                    "timeRemaining": format!("{remaining} minutes"),
                })),
            );
            return Ok(session.cookie.clone());
        }
        Some(session) => log.info(
            "Session cookie expired, logging in again",
            Some(json!({ "expiry": session.expiry.to_rfc3339() })),
        ),
        None => log.info("No session cookie found, logging in...", None),
    }

    let cookie = wms.login()?;
    let session = cache.store(cookie, origin, now);
    log.info(
        "Session cookie saved",
        Some(json!({ "expiry": session.expiry.to_rfc3339(), "via": wms.name() })),
    );
    Ok(session.cookie.clone())
}
