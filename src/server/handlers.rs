//! Axum handlers: translate proxy API calls into blocking WMS calls.
//!
//! Upstream calls and log file writes both block, so both run on the
//! blocking pool.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

use super::api::{AckReply, ErrorReply, LogBody, LoginReply, QueryOrderBody, QueryOrderReply};
use crate::error::TrackError;
use crate::logging::{FileLog, LogSink};
use crate::wms::Wms;

pub(crate) struct AppState {
    pub(crate) wms: Arc<dyn Wms>,
    pub(crate) log: FileLog,
}

pub(crate) type SharedState = Arc<AppState>;

/// Run an upstream call on the blocking pool; ureq is synchronous.
async fn run_blocking<T, F>(f: F) -> Result<T, TrackError>
where
    F: FnOnce() -> Result<T, TrackError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or_else(|e| Err(TrackError::Internal(e.to_string())))
}

/// Write to the log directory from the blocking pool
pub(super) async fn write_log<F>(log: &FileLog, write: F)
where
    F: FnOnce(&FileLog) + Send + 'static,
{
    let log = log.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || write(&log)).await {
        tracing::error!("Log write task failed: {e}");
    }
}

fn reply(status: StatusCode, body: ErrorReply) -> Response {
    (status, Json(body)).into_response()
}

fn bad_request(message: &str) -> Response {
    reply(StatusCode::BAD_REQUEST, ErrorReply::new(message))
}

/// `POST /api/login`: exchange the server-held credentials for a session.
pub(crate) async fn login(State(state): State<SharedState>) -> Response {
    write_log(&state.log, |log| log.info("Attempting login to WMS API", None)).await;

    let wms = state.wms.clone();
    match run_blocking(move || wms.login()).await {
        Ok(session_cookie) => {
            write_log(&state.log, |log| log.info("Login successful", None)).await;
            Json(LoginReply {
                success: true,
                session_cookie,
            })
            .into_response()
        }
        Err(e) => {
            let data = json!({ "message": e.to_string() });
            write_log(&state.log, move |log| log.error("Login error", Some(data))).await;
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorReply::new("Failed to login to WMS API").with_error(e.to_string()),
            )
        }
    }
}

/// `POST /api/query-order`: look up an order and return its tracking code.
pub(crate) async fn query_order(
    State(state): State<SharedState>,
    body: Result<Json<QueryOrderBody>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return bad_request(&rejection.body_text()),
    };
    let Some(order_name) = body.order_name.filter(|n| !n.trim().is_empty()) else {
        return bad_request("Order name is required");
    };
    let Some(cookie) = body.session_cookie.filter(|c| !c.is_empty()) else {
        return bad_request("Session cookie is required");
    };

    let data = json!({ "orderName": order_name });
    write_log(&state.log, move |log| {
        log.info("Query order request received", Some(data))
    })
    .await;

    let wms = state.wms.clone();
    let name = order_name.clone();
    let header = cookie.to_header();
    let order = match run_blocking(move || wms.query_order(&name, &header)).await {
        Ok(order) => order,
        Err(e) => return query_error(&state.log, e).await,
    };

    let Some(tracking_code) = order.tracking_code().map(str::to_string) else {
        let data = json!({ "orderName": order_name });
        write_log(&state.log, move |log| {
            log.warn("No tracking code found for this order", Some(data))
        })
        .await;
        return reply(
            StatusCode::NOT_FOUND,
            ErrorReply::new("No tracking code found for this order").with_order(order),
        );
    };

    let data = json!({ "orderName": order_name, "trackingCode": tracking_code });
    write_log(&state.log, move |log| log.info("Found tracking code", Some(data))).await;
    Json(QueryOrderReply {
        success: true,
        tracking_code: Some(tracking_code),
        order: Some(order),
        message: None,
    })
    .into_response()
}

async fn query_error(log: &FileLog, err: TrackError) -> Response {
    if let TrackError::NotFound { order_name } = &err {
        let data = json!({ "orderName": order_name });
        write_log(log, move |log| {
            log.warn("No orders found in response data", Some(data))
        })
        .await;
        return reply(StatusCode::NOT_FOUND, ErrorReply::new(err.to_string()));
    }

    let (status, message) = match &err {
        TrackError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
        TrackError::Query { status } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            format!("API responded with status {status}"),
        ),
        TrackError::Network(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "No response received from API server".to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to query order".to_string(),
        ),
    };
    let data = json!({ "message": err.to_string() });
    write_log(log, move |log| log.error("Order query error", Some(data))).await;
    reply(status, ErrorReply::new(message).with_error(err.to_string()))
}

/// `POST /api/log`: append a client log entry to today's log file.
pub(crate) async fn client_log(
    State(state): State<SharedState>,
    body: Result<Json<LogBody>, JsonRejection>,
) -> Response {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let non_empty = |s: &String| !s.trim().is_empty();
    let (Some(kind), Some(message)) = (body.kind.filter(non_empty), body.message.filter(non_empty))
    else {
        return bad_request("Log type and message are required");
    };

    let data = body.data;
    let at = Utc::now();
    write_log(&state.log, move |log| {
        log.record(&kind, &message, data.as_ref(), at)
    })
    .await;
    Json(AckReply {
        success: true,
        message: "Log entry created".to_string(),
    })
    .into_response()
}

pub(crate) async fn health() -> &'static str {
    "ok"
}
