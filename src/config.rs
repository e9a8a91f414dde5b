use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::consts::{DEFAULT_ORDER_ORIGIN, DEFAULT_PORT, DEFAULT_WMS_BASE_URL};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) wms_base_url: Option<String>,
    #[serde(default)]
    pub(crate) user_no: Option<String>,
    #[serde(default)]
    pub(crate) user_password: Option<String>,
    #[serde(default)]
    pub(crate) order_origin: Option<String>,
    #[serde(default)]
    pub(crate) port: Option<u16>,
    #[serde(default)]
    pub(crate) log_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) proxy_url: Option<String>,
    #[serde(default)]
    pub(crate) share_base_url: Option<String>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) log_level: Option<String>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl Config {
    /// First parseable config file, with environment overrides applied
    pub(crate) fn load() -> Self {
        let mut config = Self::load_from(&Self::get_config_paths());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn load_from(paths: &[PathBuf]) -> Self {
        for path in paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(path)
                && let Some(config) = Self::parse(&content, path)
            {
                return config;
            }
        }
        Self::default()
    }

    fn parse(content: &str, path: &Path) -> Option<Self> {
        match toml::from_str::<Config>(content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Secrets and the listen port may come from the environment, which wins
    /// over the file. Blank values are ignored.
    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(user_no) = get("WMS_USER_NO") {
            self.user_no = Some(user_no);
        }
        if let Some(password) = get("WMS_USER_PASSWORD") {
            self.user_password = Some(password);
        }
        match get("PORT").map(|raw| raw.trim().parse::<u16>()) {
            Some(Ok(port)) => self.port = Some(port),
            Some(Err(e)) => tracing::warn!("Ignoring invalid PORT: {e}"),
            None => {}
        }
    }

    pub(crate) fn wms_base_url(&self) -> &str {
        self.wms_base_url.as_deref().unwrap_or(DEFAULT_WMS_BASE_URL)
    }

    pub(crate) fn order_origin(&self) -> &str {
        self.order_origin.as_deref().unwrap_or(DEFAULT_ORDER_ORIGIN)
    }

    pub(crate) fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/ordertrack/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("ordertrack").join("config.toml"));
        }

        // 2. Platform config dir (Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("ordertrack").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.ordertrack.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ordertrack.toml"));
        }

        paths
    }
}
