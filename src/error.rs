use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Invalid log level \"{input}\" (expected debug, info, warn or error)")]
    InvalidLogLevel { input: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("Failed to clear session cache: {0}")]
    SessionCache(std::io::Error),
}

/// Failures of a single tracking lookup, from login through order query.
#[derive(Debug, Error)]
pub(crate) enum TrackError {
    #[error("{0}")]
    Auth(String),

    #[error("Order query failed with status: {status}")]
    Query { status: u16 },

    #[error("No orders found with that Shopify order name")]
    NotFound { order_name: String },

    #[error("{0}")]
    Validation(String),

    #[error("No response received from API server: {0}")]
    Network(String),

    #[error("Invalid response from API server: {0}")]
    InvalidResponse(String),

    #[error("Upstream task failed: {0}")]
    Internal(String),
}

impl From<ureq::Error> for TrackError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => TrackError::Query { status },
            ureq::Error::Json(e) => TrackError::InvalidResponse(e.to_string()),
            other => TrackError::Network(other.to_string()),
        }
    }
}
