// Profile update dispatcher
//
// One PUT per call, classified into an `UpdateOutcome`. The dispatcher never
// retries on its own; a 401 refreshes the session token and reports `Retry`
// so the caller can decide whether to send again.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::token::{Session, TokenProvider};
use crate::transport::TransportConfig;

/// Upper bound (inclusive) of the per-request correlation id.
pub const MAX_CLIENT_ID: u16 = 65535;

const CLIENT_ID_HEADER: &str = "x-client-id";
const TOKEN_HEADER: &str = "x-authentication-token";

/// Classification of one update attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UpdateOutcome {
    /// Profile accepted (HTTP 200).
    Ok,
    /// Token rejected (HTTP 401); the session has been refreshed.
    Retry,
    /// Any other response, or no response at all.
    Fail,
}

/// Map an HTTP status code to an outcome. Status `0` stands for "no response".
pub fn classify(status: u16) -> UpdateOutcome {
    match status {
        200 => UpdateOutcome::Ok,
        401 => UpdateOutcome::Retry,
        _ => UpdateOutcome::Fail,
    }
}

/// Fresh correlation id in `1..=MAX_CLIENT_ID`.
///
/// Drawn from the non-cryptographic thread RNG. Not a security control.
pub fn client_id() -> u16 {
    rand::random_range(1..=MAX_CLIENT_ID)
}

/// Diagnostic body returned with 404/409/500.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Sends the configuration payload to one device at a time.
///
/// Holds a validated [`Endpoint`] and the payload bytes, both fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct UpdateDispatcher {
    http: reqwest::Client,
    endpoint: Endpoint,
    payload: Bytes,
}

impl UpdateDispatcher {
    /// Create a dispatcher with its own HTTP client built from `transport`.
    pub fn new(
        endpoint: Endpoint,
        payload: Bytes,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, endpoint, payload))
    }

    /// Create a dispatcher around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Endpoint, payload: Bytes) -> Self {
        Self {
            http,
            endpoint,
            payload,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Push the payload to `device` and classify the response.
    ///
    /// Returns the outcome together with the raw status code, which is `0`
    /// when the request never got a response (connection refused, timeout).
    /// A 401 refreshes `session` before returning [`UpdateOutcome::Retry`];
    /// if that refresh fails the attempt is reported as a failure instead.
    pub async fn send<P: TokenProvider + Send>(
        &self,
        session: &mut Session<P>,
        device: &str,
    ) -> (UpdateOutcome, u16) {
        let url = self.endpoint.profile_url(device);
        let client_id = client_id();

        debug!(%client_id, "PUT {}", url);

        let result = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(CLIENT_ID_HEADER, client_id.to_string())
            .header(TOKEN_HEADER, session.token().expose_secret())
            .body(self.payload.clone())
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                warn!(device, error = %e, "request failed without a response. Code: 0");
                return (UpdateOutcome::Fail, 0);
            }
        };

        let status = resp.status().as_u16();
        match classify(status) {
            UpdateOutcome::Ok => {
                debug!(device, status, "profile updated");
                (UpdateOutcome::Ok, status)
            }
            UpdateOutcome::Retry => {
                // Either the token is wrong or it expired.
                info!(device, "authentication rejected, refreshing token");
                match session.refresh().await {
                    Ok(()) => (UpdateOutcome::Retry, status),
                    Err(e) => {
                        warn!(device, error = %e, "token refresh failed");
                        (UpdateOutcome::Fail, status)
                    }
                }
            }
            UpdateOutcome::Fail if matches!(status, 404 | 409 | 500) => {
                let body = resp.text().await.unwrap_or_default();
                log_error_body(device, status, &body);
                (UpdateOutcome::Fail, status)
            }
            UpdateOutcome::Fail => {
                warn!(device, status, "request failed with an unknown error. Code: {status}");
                (UpdateOutcome::Fail, status)
            }
        }
    }
}

fn log_error_body(device: &str, status: u16, body: &str) {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error, message }) => {
            warn!(
                device,
                status,
                error = error.as_deref().unwrap_or_default(),
                "{}",
                message.as_deref().unwrap_or("request rejected")
            );
        }
        Err(e) => {
            let preview = body.get(..body.len().min(200)).unwrap_or(body);
            warn!(device, status, body = preview, "unparseable error body: {e}");
        }
    }
}
