use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cli::{Cli, Commands, ServeArgs, TrackArgs};
use crate::config::Config;
use crate::error::AppError;
use crate::logging::{ClientLog, FileLog, LogLevel};
use crate::output::{output_tracking_json, print_tracking_table};
use crate::server;
use crate::tracking::{RenderOptions, Tracker, render};
use crate::utils::Timezone;
use crate::wms::{CachedSession, Credentials, ProxyClient, SessionCache, Wms, WmsClient};

/// Options shared by every command after CLI and config are merged
struct Settings<'a> {
    config: &'a Config,
    wms_url: String,
    timeout: Duration,
    debug: bool,
}

impl Settings<'_> {
    fn direct_client(&self) -> WmsClient {
        let credentials = Credentials {
            user_no: self.config.user_no.clone().unwrap_or_default(),
            user_password: self.config.user_password.clone().unwrap_or_default(),
        };
        WmsClient::new(
            &self.wms_url,
            credentials,
            self.config.order_origin(),
            self.timeout,
        )
    }
}

pub(crate) fn run(cli: Cli, config: &Config) -> Result<ExitCode, AppError> {
    let settings = Settings {
        config,
        wms_url: cli
            .wms_url
            .clone()
            .unwrap_or_else(|| config.wms_base_url().to_string()),
        timeout: cli
            .timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.timeout()),
        debug: cli.debug,
    };

    match cli.command {
        Commands::Track(args) => handle_track(args.with_config(config), &settings),
        Commands::Serve(args) => handle_serve(args.with_config(config), &settings),
        Commands::Session { clear } => handle_session(clear, Utc::now()),
    }
}

fn handle_track(args: TrackArgs, settings: &Settings<'_>) -> Result<ExitCode, AppError> {
    let timezone = Timezone::parse(args.timezone.as_deref())?;
    let min_level = match args.log_level.as_deref() {
        Some(raw) => raw.parse::<LogLevel>()?,
        None if settings.debug => LogLevel::Debug,
        None => LogLevel::Info,
    };

    let (wms, log): (Box<dyn Wms>, ClientLog) = match args.proxy.as_deref() {
        Some(proxy) => (
            Box::new(ProxyClient::new(proxy, settings.timeout)),
            ClientLog::with_proxy(min_level, proxy, settings.timeout),
        ),
        None => (
            Box::new(settings.direct_client()),
            ClientLog::console(min_level),
        ),
    };
    tracing::debug!(via = wms.name(), level = log.min_level().as_str(), "Tracking setup");

    let mut sessions = if args.no_cache {
        SessionCache::in_memory()
    } else {
        SessionCache::open_default()
    };

    let now = Utc::now();
    let view = Tracker::new(wms.as_ref(), &mut sessions, &log).track(&args.order, now);
    let rendered = render(
        &view,
        &RenderOptions {
            timezone,
            share_base_url: args.share_base.as_deref(),
            now,
        },
    );

    if args.json {
        println!("{}", output_tracking_json(&rendered));
    } else {
        print_tracking_table(&rendered, args.use_color());
    }

    Ok(if view.is_found() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn handle_serve(args: ServeArgs, settings: &Settings<'_>) -> Result<ExitCode, AppError> {
    let client = settings.direct_client();
    if settings.config.user_no.is_none() || settings.config.user_password.is_none() {
        tracing::warn!("WMS_USER_NO / WMS_USER_PASSWORD not set; logins will be rejected");
    }
    let log = FileLog::new(args.log_dir.unwrap_or_else(FileLog::default_dir));
    let port = args.port.unwrap_or_else(|| settings.config.port());
    let state = server::new_state(Arc::new(client), log);

    let runtime = tokio::runtime::Runtime::new().map_err(AppError::Runtime)?;
    runtime.block_on(server::serve(state, port))?;
    Ok(ExitCode::SUCCESS)
}

fn handle_session(clear: bool, now: DateTime<Utc>) -> Result<ExitCode, AppError> {
    let mut cache = SessionCache::open_default();
    if clear {
        cache.clear().map_err(AppError::SessionCache)?;
        println!("Session cache cleared.");
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(path) = SessionCache::default_path() {
        println!("Cache file: {}", path.display());
    }
    println!("{}", describe_session(cache.current(), now));
    Ok(ExitCode::SUCCESS)
}

fn describe_session(session: Option<&CachedSession>, now: DateTime<Utc>) -> String {
    let Some(session) = session else {
        return "No cached session.".to_string();
    };
    let name = session.cookie.split('=').next().unwrap_or_default();
    if session.is_valid_at(now) {
        let remaining = (session.expiry - now).num_minutes();
        format!(
            "Session {name} valid until {} ({remaining} minutes left)",
            session.expiry.to_rfc3339()
        )
    } else {
        format!("Session {name} expired at {}", session.expiry.to_rfc3339())
    }
}
