use std::time::Duration;

use serde::de::DeserializeOwned;

use super::Wms;
use super::types::Order;
use crate::error::TrackError;
use crate::server::api::{ErrorReply, LoginReply, QueryOrderBody, QueryOrderReply, SessionCookie};

/// Talks to the WMS through a running `ordertrack serve` instance, so the
/// caller never needs WMS credentials.
pub(crate) struct ProxyClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ProxyClient {
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn read_body<T: DeserializeOwned>(
    response: &mut ureq::http::Response<ureq::Body>,
) -> Result<T, TrackError> {
    response
        .body_mut()
        .read_json()
        .map_err(|e| TrackError::InvalidResponse(e.to_string()))
}

impl Wms for ProxyClient {
    fn name(&self) -> &'static str {
        "proxy"
    }

    fn origin(&self) -> &str {
        &self.base_url
    }

    fn login(&self) -> Result<String, TrackError> {
        let mut response = self.agent.post(&self.url("/api/login")).send_empty()?;
        let status = response.status();
        if !status.is_success() {
            let detail = read_body::<ErrorReply>(&mut response)
                .ok()
                .and_then(|reply| reply.error);
            return Err(TrackError::Auth(detail.unwrap_or_else(|| {
                format!("Login failed with status: {}", status.as_u16())
            })));
        }

        let reply: LoginReply = read_body(&mut response)?;
        if reply.session_cookie.trim().is_empty() {
            return Err(TrackError::Auth(
                "No cookies received from login response".to_string(),
            ));
        }
        Ok(reply.session_cookie)
    }

    fn query_order(&self, order_name: &str, session: &str) -> Result<Order, TrackError> {
        let body = QueryOrderBody {
            order_name: Some(order_name.to_string()),
            session_cookie: Some(SessionCookie::One(session.to_string())),
        };
        let mut response = self
            .agent
            .post(&self.url("/api/query-order"))
            .send_json(&body)?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            let reply: QueryOrderReply = read_body(&mut response)?;
            return reply.order.ok_or_else(|| {
                TrackError::InvalidResponse("proxy reply carried no order".to_string())
            });
        }

        let reply = read_body::<ErrorReply>(&mut response).ok();
        match (status, reply) {
            // Order exists but has no tracking code yet
            (404, Some(ErrorReply { order: Some(order), .. })) => Ok(order),
            (404, _) => Err(TrackError::NotFound {
                order_name: order_name.to_string(),
            }),
            (400, Some(reply)) => Err(TrackError::Validation(reply.message)),
            (status, _) => Err(TrackError::Query { status }),
        }
    }
}
