use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::consts::{ORDER_BY, QUERY_PAGE_LENGTH};

/// Date as the WMS sends it: epoch milliseconds (integral or not) or a
/// date-time string. Any other JSON value is kept and reads as unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum UpstreamDate {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
    Other(Value),
}

impl UpstreamDate {
    /// Interpret the value as a UTC instant, `None` when unparseable
    pub(crate) fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            UpstreamDate::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            UpstreamDate::FractionalMillis(ms) if ms.is_finite() => {
                Utc.timestamp_millis_opt(ms.trunc() as i64).single()
            }
            UpstreamDate::FractionalMillis(_) | UpstreamDate::Other(_) => None,
            UpstreamDate::Text(s) => parse_date_text(s.trim()),
        }
    }
}

/// `null` reads like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn parse_date_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // WMS exports without an offset are UTC
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    s.parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

/// Upstream order record. Only the fields the timeline needs are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Order {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) document_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) created_date: Option<UpstreamDate>,
    #[serde(default)]
    pub(crate) dispatched_date: Option<UpstreamDate>,
    #[serde(default)]
    pub(crate) delivered_date: Option<UpstreamDate>,
    #[serde(default)]
    pub(crate) tracking_code: Option<String>,
}

impl Order {
    /// Tracking code, treating an empty string as absent
    pub(crate) fn tracking_code(&self) -> Option<&str> {
        self.tracking_code.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub(crate) user_no: &'a str,
    pub(crate) user_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderQuery<'a> {
    courier_service_no: &'a str,
    tracking_code: &'a str,
    cust_order_no: &'a str,
    order_status: &'a str,
    order_origin: &'a str,
    document_no: &'a str,
    order_by: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageData {
    current_length: u32,
    current_offset: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderQueryRequest<'a> {
    order_query: OrderQuery<'a>,
    page_data: PageData,
}

impl<'a> OrderQueryRequest<'a> {
    /// First page of orders with `document_no` from the given origin
    pub(crate) fn first_page(order_origin: &'a str, document_no: &'a str) -> Self {
        Self {
            order_query: OrderQuery {
                courier_service_no: "",
                tracking_code: "",
                cust_order_no: "",
                order_status: "",
                order_origin,
                document_no,
                order_by: ORDER_BY,
            },
            page_data: PageData {
                current_length: QUERY_PAGE_LENGTH,
                current_offset: 0,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderPage {
    #[serde(default, deserialize_with = "null_as_default")]
    current_page_data: Vec<Order>,
}

/// Order query response. The WMS has been seen returning both a paginated
/// `returnObject.currentPageData` wrapper and a flat `orders` list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderQueryResponse {
    #[serde(default)]
    return_object: Option<OrderPage>,
    #[serde(default, deserialize_with = "null_as_default")]
    orders: Vec<Order>,
}

impl OrderQueryResponse {
    /// First matching order; further matches are ignored
    pub(crate) fn into_first_order(self) -> Option<Order> {
        let paged = self
            .return_object
            .map(|page| page.current_page_data)
            .unwrap_or_default();
        paged.into_iter().next().or_else(|| self.orders.into_iter().next())
    }
}
