mod client;
mod query;
mod response;
mod transport;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub use query::*;
pub use response::*;
pub use transport::*;

use crate::settings::Settings;

/// Public mirrors, tried in this order.
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://maps.mail.ru/osm/tools/overpass/api/interpreter",
];

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends Overpass QL to an ordered list of mirrors until one answers.
#[derive(Clone)]
pub struct OverpassClient {
    endpoints: Vec<String>,
    attempt_timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl Default for OverpassClient {
    fn default() -> Self {
        OverpassClient::new(
            DEFAULT_ENDPOINTS.iter().map(|url| url.to_string()).collect(),
            DEFAULT_ATTEMPT_TIMEOUT,
        )
    }
}

impl OverpassClient {
    pub fn new(endpoints: Vec<String>, attempt_timeout: Duration) -> Self {
        let transport = Arc::new(UreqTransport::default());
        OverpassClient::with_transport(endpoints, attempt_timeout, transport)
    }

    pub fn with_transport(
        endpoints: Vec<String>,
        attempt_timeout: Duration,
        transport: Arc<dyn Transport>,
    ) -> Self {
        OverpassClient {
            endpoints,
            attempt_timeout,
            transport,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        OverpassClient::new(settings.endpoints.clone(), settings.attempt_timeout())
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }
}

/// Shared flag a caller flips when it no longer wants the answer.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
