use tracing::{debug, error, info, warn};

use super::{CancelFlag, OverpassClient, OverpassResponse};
use crate::error::{NearbyError, TransportError};

impl OverpassClient {
    /// Tries each endpoint in order and returns the first decoded answer.
    ///
    /// Overloaded mirrors (429/502/503/504), other non-2xx statuses, timeouts,
    /// connection failures and unreadable bodies all move on to the next
    /// endpoint. When none is left the error says whether the final attempt
    /// timed out.
    pub fn query(
        &self,
        query: &str,
        cancel: Option<&CancelFlag>,
    ) -> Result<OverpassResponse, NearbyError> {
        let total = self.endpoints.len();
        let mut timed_out = false;

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if cancel.is_some_and(CancelFlag::is_cancelled) {
                info!(endpoint = %endpoint, "overpass request cancelled");
                return Err(NearbyError::Cancelled);
            }

            debug!(endpoint = %endpoint, attempt = index + 1, total, "sending overpass query");
            match self.attempt(endpoint, query) {
                Ok(response) => {
                    info!(
                        endpoint = %endpoint,
                        elements = response.elements.len(),
                        "overpass answered"
                    );
                    return Ok(response);
                }
                Err(err) => {
                    timed_out = matches!(err, NearbyError::Timeout { .. });
                    match &err {
                        NearbyError::Service { status, .. }
                            if NearbyError::is_retryable_status(*status) =>
                        {
                            warn!(endpoint = %endpoint, status, "overpass mirror overloaded");
                        }
                        _ => warn!(endpoint = %endpoint, error = %err, "overpass mirror failed"),
                    }
                }
            }
        }

        error!(attempts = total, timed_out, "all overpass endpoints failed");
        Err(NearbyError::AllEndpointsUnavailable {
            attempts: total,
            timed_out,
        })
    }

    fn attempt(&self, endpoint: &str, query: &str) -> Result<OverpassResponse, NearbyError> {
        let reply = self
            .transport
            .post_form(endpoint, query, self.attempt_timeout)
            .map_err(|err| match err {
                TransportError::Timeout => NearbyError::Timeout {
                    endpoint: endpoint.to_string(),
                },
                TransportError::Connection(message) => NearbyError::Transport {
                    endpoint: endpoint.to_string(),
                    message,
                },
            })?;

        if !reply.is_success() {
            return Err(NearbyError::Service {
                endpoint: endpoint.to_string(),
                status: reply.status,
            });
        }

        serde_json::from_str(&reply.body).map_err(|source| NearbyError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}
