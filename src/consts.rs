/// Default WMS API root; login and order-query paths are appended to it
pub(crate) const DEFAULT_WMS_BASE_URL: &str = "https://botwebapi.istoreisend-wms.com/IsisWMS-War/Json";

/// Origin tag every order query is constrained to
pub(crate) const DEFAULT_ORDER_ORIGIN: &str = "SHOPIFY";

/// Sort key sent with order queries
pub(crate) const ORDER_BY: &str = "documentNo";

/// Page size requested from the order query; only the first row is used
pub(crate) const QUERY_PAGE_LENGTH: u32 = 10;

/// Default proxy listen port
pub(crate) const DEFAULT_PORT: u16 = 3000;
