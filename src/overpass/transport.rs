use std::time::Duration;

use ureq::Agent;

use crate::error::TransportError;

const USER_AGENT: &str = concat!("estate-nearby/", env!("CARGO_PKG_VERSION"));

/// Status and body of one HTTP exchange. The body is only read for 2xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One form-encoded POST of an Overpass query to one mirror.
pub trait Transport: Send + Sync {
    fn post_form(
        &self,
        endpoint: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        // Statuses are classified by the failover client, not by ureq.
        let config = Agent::config_builder().http_status_as_error(false).build();
        let agent: Agent = config.into();
        UreqTransport { agent }
    }
}

impl Transport for UreqTransport {
    fn post_form(
        &self,
        endpoint: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let mut response = self
            .agent
            .post(endpoint)
            .header("User-Agent", USER_AGENT)
            .config()
            .timeout_global(Some(timeout))
            .build()
            .send_form([("data", query)])
            .map_err(classify)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Ok(HttpReply {
                status,
                body: String::new(),
            });
        }
        let body = response.body_mut().read_to_string().map_err(classify)?;
        Ok(HttpReply { status, body })
    }
}

fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Connection(other.to_string()),
    }
}
