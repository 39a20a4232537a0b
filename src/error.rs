use thiserror::Error;

pub const INVALID_CATEGORY_MESSAGE: &str = "Invalid category";
pub const TIMED_OUT_MESSAGE: &str = "Request timed out. Please try again later.";
pub const UNAVAILABLE_MESSAGE: &str =
    "Nearby places service is currently unavailable. Please try again later.";
pub const CANCELLED_MESSAGE: &str = "Request was cancelled.";

/// Why a single HTTP attempt did not produce a reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
}

#[derive(Debug, Error)]
pub enum NearbyError {
    #[error("unknown category `{0}`")]
    InvalidCategory(String),

    #[error("{endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("{endpoint} returned HTTP {status}")]
    Service { endpoint: String, status: u16 },

    #[error("{endpoint} could not be reached: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} sent an unreadable body: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("all {attempts} overpass endpoints failed (last attempt timed out: {timed_out})")]
    AllEndpointsUnavailable { attempts: usize, timed_out: bool },

    #[error("request cancelled")]
    Cancelled,
}

impl NearbyError {
    /// 429, 502, 503 and 504 mean "overloaded, ask another mirror".
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// The sentence shown to the person looking at the listing.
    pub fn user_message(&self) -> &'static str {
        match self {
            NearbyError::InvalidCategory(_) => INVALID_CATEGORY_MESSAGE,
            NearbyError::Timeout { .. } => TIMED_OUT_MESSAGE,
            NearbyError::AllEndpointsUnavailable { timed_out: true, .. } => TIMED_OUT_MESSAGE,
            NearbyError::Cancelled => CANCELLED_MESSAGE,
            _ => UNAVAILABLE_MESSAGE,
        }
    }
}
