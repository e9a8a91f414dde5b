//! Request and response bodies of the proxy HTTP API

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::wms::Order;

/// Session cookie as clients send it back: one header string or the raw
/// list of cookies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum SessionCookie {
    One(String),
    Many(Vec<String>),
}

impl SessionCookie {
    /// Value for the upstream `Cookie` header
    pub(crate) fn to_header(&self) -> String {
        match self {
            SessionCookie::One(s) => s.clone(),
            SessionCookie::Many(list) => list.join("; "),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            SessionCookie::One(s) => s.trim().is_empty(),
            SessionCookie::Many(list) => list.iter().all(|s| s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginReply {
    pub(crate) success: bool,
    pub(crate) session_cookie: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryOrderBody {
    #[serde(default)]
    pub(crate) order_name: Option<String>,
    #[serde(default)]
    pub(crate) session_cookie: Option<SessionCookie>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryOrderReply {
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) tracking_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) order: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LogBody {
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) data: Option<Value>,
}

/// Body of every non-success reply
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorReply {
    pub(crate) success: bool,
    pub(crate) message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) order: Option<Order>,
}

impl ErrorReply {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            order: None,
        }
    }

    pub(crate) fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub(crate) fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AckReply {
    pub(crate) success: bool,
    pub(crate) message: String,
}
