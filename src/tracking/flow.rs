use chrono::{DateTime, Utc};
use serde_json::json;

use super::normalize::normalize_order_name;
use super::timeline::TimelineState;
use super::view::{Outcome, ViewState};
use crate::error::TrackError;
use crate::logging::LogSink;
use crate::wms::{Order, SessionCache, Wms, acquire_session};

/// One tracking lookup with its collaborators passed in explicitly
pub(crate) struct Tracker<'a> {
    wms: &'a dyn Wms,
    sessions: &'a mut SessionCache,
    log: &'a dyn LogSink,
}

impl<'a> Tracker<'a> {
    pub(crate) fn new(wms: &'a dyn Wms, sessions: &'a mut SessionCache, log: &'a dyn LogSink) -> Self {
        Self { wms, sessions, log }
    }

    /// Look up `raw_order_name` and reduce every outcome to a view state.
    ///
    /// Never fails: errors become a `Failed` view plus one error log entry,
    /// an empty result becomes `NotFound` plus one warning.
    pub(crate) fn track(&mut self, raw_order_name: &str, now: DateTime<Utc>) -> ViewState {
        let order_name = normalize_order_name(raw_order_name.trim());
        self.log.info(
            "Tracking order",
            Some(json!({
                "originalOrderName": raw_order_name,
                "formattedOrderName": order_name,
            })),
        );

        let outcome = match self.lookup(&order_name, now) {
            Ok(order) => {
                let state = TimelineState::from_status(&order.status);
                self.log.info(
                    "Order found",
                    Some(json!({
                        "documentNo": order.document_no,
                        "status": order.status,
                        "step": state.index(),
                    })),
                );
                Outcome::Found { order, state }
            }
            Err(TrackError::NotFound { order_name }) => {
                self.log.warn("Order not found", Some(json!({ "orderName": order_name })));
                Outcome::NotFound
            }
            Err(e) => {
                self.log.error(
                    "Error tracking order",
                    Some(json!({
                        "error": e.to_string(),
                        "orderName": raw_order_name,
                    })),
                );
                Outcome::Failed {
                    message: e.to_string(),
                }
            }
        };

        ViewState { order_name, outcome }
    }

    fn lookup(&mut self, order_name: &str, now: DateTime<Utc>) -> Result<Order, TrackError> {
        if order_name.trim().is_empty() {
            return Err(TrackError::Validation("Order number is required".to_string()));
        }
        let session = acquire_session(self.wms, self.sessions, self.log, now)?;
        self.log.debug("Session acquired", Some(json!({ "via": self.wms.name() })));
        self.log.info(
            "Querying order by Shopify name",
            Some(json!({ "orderName": order_name })),
        );
        self.wms.query_order(order_name, &session)
    }
}
