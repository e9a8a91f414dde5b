//! Warehouse management system access
//!
//! The tracking flow talks to the WMS through the [`Wms`] trait so it can
//! go straight upstream ([`WmsClient`]) or through the proxy
//! ([`ProxyClient`]).

mod client;
mod proxy;
mod session;
mod types;

use crate::error::TrackError;

pub(crate) use client::{Credentials, WmsClient};
pub(crate) use proxy::ProxyClient;
pub(crate) use session::{CachedSession, SessionCache, acquire_session};
pub(crate) use types::{Order, UpstreamDate};

/// Operations the tracking flow needs from a WMS
pub(crate) trait Wms: Send + Sync {
    /// Short name for log output
    fn name(&self) -> &'static str;

    /// Base URL the session cookie is issued by and valid for
    fn origin(&self) -> &str;

    /// Exchange credentials for a session token
    fn login(&self) -> Result<String, TrackError>;

    /// First order whose document number matches `order_name`.
    /// Fails with [`TrackError::NotFound`] when nothing matches.
    fn query_order(&self, order_name: &str, session: &str) -> Result<Order, TrackError>;
}
