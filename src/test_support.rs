//! Test doubles shared by unit tests: a scripted [`Wms`], a recording
//! [`LogSink`], a fake WMS HTTP server and the real proxy service, both on
//! ephemeral ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};

use crate::error::TrackError;
use crate::logging::{FileLog, LogLevel, LogSink};
use crate::server;
use crate::wms::{Order, ProxyClient, Wms};

pub(crate) fn order(document_no: &str, status: &str) -> Order {
    Order {
        document_no: document_no.to_string(),
        status: status.to_string(),
        created_date: None,
        dispatched_date: None,
        delivered_date: None,
        tracking_code: None,
    }
}

#[derive(Debug, Clone)]
pub(crate) enum StubQuery {
    Found(Order),
    NotFound,
    Status(u16),
    Network,
}

/// Scripted WMS that counts its calls
pub(crate) struct StubWms {
    login: Result<String, String>,
    query: StubQuery,
    origin: String,
    login_calls: AtomicUsize,
    query_calls: AtomicUsize,
    last_session: Mutex<Option<String>>,
    last_query: Mutex<Option<String>>,
}

impl StubWms {
    pub(crate) fn with_cookie(cookie: &str) -> Self {
        Self {
            login: Ok(cookie.to_string()),
            query: StubQuery::NotFound,
            origin: "http://wms.test/Json".to_string(),
            login_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            last_session: Mutex::new(None),
            last_query: Mutex::new(None),
        }
    }

    pub(crate) fn failing_login(message: &str) -> Self {
        Self {
            login: Err(message.to_string()),
            ..Self::with_cookie("")
        }
    }

    pub(crate) fn answering(mut self, query: StubQuery) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn at_origin(mut self, origin: &str) -> Self {
        self.origin = origin.to_string();
        self
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_session(&self) -> Option<String> {
        self.last_session.lock().unwrap().clone()
    }

    pub(crate) fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

impl Wms for StubWms {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn login(&self) -> Result<String, TrackError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login.clone().map_err(TrackError::Auth)
    }

    fn query_order(&self, order_name: &str, session: &str) -> Result<Order, TrackError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_session.lock().unwrap() = Some(session.to_string());
        *self.last_query.lock().unwrap() = Some(order_name.to_string());
        match &self.query {
            StubQuery::Found(order) => Ok(order.clone()),
            StubQuery::NotFound => Err(TrackError::NotFound {
                order_name: order_name.to_string(),
            }),
            StubQuery::Status(status) => Err(TrackError::Query { status: *status }),
            StubQuery::Network => Err(TrackError::Network("connection refused".to_string())),
        }
    }
}

/// Log sink that keeps every entry in memory
#[derive(Default)]
pub(crate) struct RecordingLog {
    entries: Mutex<Vec<(LogLevel, String, Option<Value>)>>,
}

impl RecordingLog {
    pub(crate) fn count(&self, level: LogLevel) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _, _)| *l == level)
            .count()
    }

    pub(crate) fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _, _)| *l == level)
            .map(|(_, m, _)| m.clone())
            .collect()
    }
}

impl LogSink for RecordingLog {
    fn log(&self, level: LogLevel, message: &str, data: Option<Value>) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string(), data));
    }
}

/// Behavior of the fake WMS server
#[derive(Debug, Clone)]
pub(crate) struct FakeUpstreamConfig {
    pub(crate) login_status: u16,
    pub(crate) set_cookie: Option<&'static str>,
    pub(crate) query_status: u16,
    pub(crate) query_body: Value,
}

impl Default for FakeUpstreamConfig {
    fn default() -> Self {
        Self {
            login_status: 200,
            set_cookie: Some("JSESSIONID=fake-session; Path=/; HttpOnly"),
            query_status: 200,
            query_body: json!({"returnObject": {"currentPageData": []}}),
        }
    }
}

impl FakeUpstreamConfig {
    pub(crate) fn with_orders(orders: Value) -> Self {
        Self {
            query_body: json!({"returnObject": {"currentPageData": orders}}),
            ..Default::default()
        }
    }
}

#[derive(Default)]
struct Recorded {
    login_calls: AtomicUsize,
    login_body: Mutex<Option<Value>>,
    query_body: Mutex<Option<Value>>,
    cookie: Mutex<Option<String>>,
}

struct FakeState {
    config: FakeUpstreamConfig,
    recorded: Arc<Recorded>,
}

/// Fake WMS served from a background thread with its own runtime, usable
/// from synchronous tests. Stops when dropped.
pub(crate) struct FakeUpstream {
    port: u16,
    recorded: Arc<Recorded>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeUpstream {
    pub(crate) fn start(config: FakeUpstreamConfig) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind fake upstream");
        listener.set_nonblocking(true).expect("nonblocking");
        let port = listener.local_addr().expect("local addr").port();

        let recorded = Arc::new(Recorded::default());
        let state = Arc::new(FakeState {
            config,
            recorded: recorded.clone(),
        });
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("listener");
                let app = fake_router(state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .ok();
            });
        });

        Self {
            port,
            recorded,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/IsisWMS-War/Json", self.port)
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.recorded.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_login_body(&self) -> Option<Value> {
        self.recorded.login_body.lock().unwrap().clone()
    }

    pub(crate) fn last_query_body(&self) -> Option<Value> {
        self.recorded.query_body.lock().unwrap().clone()
    }

    pub(crate) fn last_cookie(&self) -> Option<String> {
        self.recorded.cookie.lock().unwrap().clone()
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn fake_router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/IsisWMS-War/Json/Public/login/", post(fake_login))
        .route("/IsisWMS-War/Json/WhseOrder/doQueryOrderPage", post(fake_query))
        .with_state(state)
}

async fn fake_login(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    state.recorded.login_calls.fetch_add(1, Ordering::SeqCst);
    *state.recorded.login_body.lock().unwrap() = Some(body);
    let status = StatusCode::from_u16(state.config.login_status).unwrap_or(StatusCode::OK);
    match state.config.set_cookie {
        Some(cookie) => (status, [(header::SET_COOKIE, cookie)], Json(json!({"userId": 7}))).into_response(),
        None => (status, Json(json!({"userId": 7}))).into_response(),
    }
}

async fn fake_query(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    *state.recorded.query_body.lock().unwrap() = Some(body);
    *state.recorded.cookie.lock().unwrap() = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let status = StatusCode::from_u16(state.config.query_status).unwrap_or(StatusCode::OK);
    (status, Json(state.config.query_body.clone())).into_response()
}

/// The proxy service itself, started on its own thread and runtime with a
/// temporary log directory. Stops when dropped.
pub(crate) struct ProxyServer {
    port: u16,
    logs: tempfile::TempDir,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl ProxyServer {
    pub(crate) fn start(wms: StubWms) -> Self {
        let logs = tempfile::tempdir().expect("log dir");
        let state = server::new_state(Arc::new(wms), FileLog::new(logs.path()));
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind proxy");
        listener.set_nonblocking(true).expect("nonblocking");
        let port = listener.local_addr().expect("local addr").port();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("listener");
                server::serve_on(listener, state, async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
            });
        });

        Self {
            port,
            logs,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub(crate) fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    pub(crate) fn client(&self) -> ProxyClient {
        ProxyClient::new(&self.url(), Duration::from_secs(5))
    }

    /// Everything written to the proxy's log directory so far
    pub(crate) fn logged(&self) -> String {
        std::fs::read_dir(self.logs.path())
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| std::fs::read_to_string(entry.path()).ok())
            .collect()
    }
}

impl Drop for ProxyServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
