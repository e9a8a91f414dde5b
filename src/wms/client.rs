use std::time::Duration;

use ureq::http::header::{COOKIE, SET_COOKIE};

use super::Wms;
use super::types::{LoginRequest, Order, OrderQueryRequest, OrderQueryResponse};
use crate::error::TrackError;

/// Account the WMS login is performed with
#[derive(Debug, Clone, Default)]
pub(crate) struct Credentials {
    pub(crate) user_no: String,
    pub(crate) user_password: String,
}

impl Credentials {
    pub(crate) fn is_complete(&self) -> bool {
        !self.user_no.is_empty() && !self.user_password.is_empty()
    }
}

/// Direct HTTP client for the WMS JSON API
pub(crate) struct WmsClient {
    agent: ureq::Agent,
    base_url: String,
    credentials: Credentials,
    order_origin: String,
}

impl WmsClient {
    pub(crate) fn new(
        base_url: &str,
        credentials: Credentials,
        order_origin: &str,
        timeout: Duration,
    ) -> Self {
        // Statuses are inspected by hand so auth and query failures stay distinct
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            order_origin: order_origin.to_string(),
        }
    }

    fn login_url(&self) -> String {
        format!("{}/Public/login/", self.base_url)
    }

    fn query_url(&self) -> String {
        format!("{}/WhseOrder/doQueryOrderPage", self.base_url)
    }
}

impl Wms for WmsClient {
    fn name(&self) -> &'static str {
        "wms"
    }

    fn origin(&self) -> &str {
        &self.base_url
    }

    fn login(&self) -> Result<String, TrackError> {
        if !self.credentials.is_complete() {
            return Err(TrackError::Validation(
                "WMS credentials are not configured (set WMS_USER_NO and WMS_USER_PASSWORD)"
                    .to_string(),
            ));
        }
        let body = LoginRequest {
            user_no: &self.credentials.user_no,
            user_password: &self.credentials.user_password,
        };
        let response = self.agent.post(&self.login_url()).send_json(&body)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackError::Auth(format!(
                "Login failed with status: {}",
                status.as_u16()
            )));
        }

        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok());
        cookie_header(set_cookies)
            .ok_or_else(|| TrackError::Auth("No cookies received from login response".to_string()))
    }

    fn query_order(&self, order_name: &str, session: &str) -> Result<Order, TrackError> {
        let request = OrderQueryRequest::first_page(&self.order_origin, order_name);
        let mut response = self
            .agent
            .post(&self.query_url())
            .header(COOKIE, session)
            .send_json(&request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackError::Query {
                status: status.as_u16(),
            });
        }

        let parsed: OrderQueryResponse = response.body_mut().read_json()?;
        parsed.into_first_order().ok_or_else(|| TrackError::NotFound {
            order_name: order_name.to_string(),
        })
    }
}

/// Build a `Cookie` header value from `Set-Cookie` values, keeping only the
/// `name=value` pair of each. `None` when no usable cookie is present.
pub(crate) fn cookie_header<'a>(set_cookies: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let pairs: Vec<&str> = set_cookies
        .into_iter()
        .filter_map(|raw| raw.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
