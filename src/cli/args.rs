//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::config::Config;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "ordertrack")]
#[command(about = "Order tracking against the warehouse management system", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// WMS JSON API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) wms_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,
}

#[derive(Debug, Args)]
pub(crate) struct TrackArgs {
    /// Order number as the customer typed it (e.g. 12345 or TMR-O12345)
    pub(crate) order: String,

    /// Output as JSON
    #[arg(short, long)]
    pub(crate) json: bool,

    /// Go through a running `ordertrack serve` instead of the WMS directly
    #[arg(long, value_name = "URL")]
    pub(crate) proxy: Option<String>,

    /// Timezone for date display (e.g., "Asia/Kuala_Lumpur", "UTC")
    #[arg(long, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Page URL used to build a shareable tracking link
    #[arg(long, value_name = "URL")]
    pub(crate) share_base: Option<String>,

    /// Color output mode
    #[arg(long, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long)]
    pub(crate) no_color: bool,

    /// Minimum level of tracking log entries (debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub(crate) log_level: Option<String>,

    /// Neither read nor write the session cache file
    #[arg(long)]
    pub(crate) no_cache: bool,
}

impl TrackArgs {
    /// Merge config file values (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if self.proxy.is_none() {
            self.proxy = config.proxy_url.clone();
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.share_base.is_none() {
            self.share_base = config.share_base_url.clone();
        }
        if self.log_level.is_none() {
            self.log_level = config.log_level.clone();
        }
        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color || self.json {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct ServeArgs {
    /// Port to listen on [default: $PORT or 3000]
    #[arg(short, long)]
    pub(crate) port: Option<u16>,

    /// Directory for daily log files [default: ./logs]
    #[arg(long, value_name = "DIR")]
    pub(crate) log_dir: Option<PathBuf>,
}

impl ServeArgs {
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if self.port.is_none() {
            self.port = Some(config.port());
        }
        if self.log_dir.is_none() {
            self.log_dir = config.log_dir.clone();
        }
        self
    }
}

impl Cli {
    /// Merge config file values into the global options
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if self.wms_url.is_none() {
            self.wms_url = config.wms_base_url.clone();
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout_secs;
        }
        self
    }
}
