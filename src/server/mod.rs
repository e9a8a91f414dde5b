//! Proxy HTTP service
//!
//! Holds the WMS credentials so browsers never see them. Routes:
//! `POST /api/login`, `POST /api/query-order`, `POST /api/log`,
//! `GET /health`. Each request is independent; the only shared resource is
//! the append-only log directory.

pub(crate) mod api;
mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::error::AppError;
use crate::logging::LogSink;

pub(crate) use handlers::{AppState, SharedState};

pub(crate) fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/query-order", post(handlers::query_order))
        .route("/api/log", post(handlers::client_log))
        .route("/health", get(handlers::health))
        .with_state(state)
}

pub(crate) async fn bind(addr: &str) -> Result<TcpListener, AppError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serve on an already bound listener until `shutdown` resolves
pub(crate) async fn serve_on<F>(
    listener: TcpListener,
    state: SharedState,
    shutdown: F,
) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::Serve)
}

/// Bind all interfaces on `port` and serve until Ctrl-C.
pub(crate) async fn serve(state: SharedState, port: u16) -> Result<(), AppError> {
    let listener = bind(&format!("0.0.0.0:{port}")).await?;
    let data = serde_json::json!({ "logDir": state.log.dir().display().to_string() });
    handlers::write_log(&state.log, move |log| {
        log.info(&format!("Server running on port {port}"), Some(data))
    })
    .await;
    serve_on(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down");
    })
    .await
}

pub(crate) fn new_state(wms: Arc<dyn crate::wms::Wms>, log: crate::logging::FileLog) -> SharedState {
    Arc::new(AppState { wms, log })
}
