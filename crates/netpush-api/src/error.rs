use thiserror::Error;

/// Top-level error type for the `netpush-api` crate.
///
/// Only construction and token provisioning can fail loudly. A PUT that
/// reaches the wire always resolves to an [`UpdateOutcome`](crate::UpdateOutcome)
/// instead of an error, so none of these variants describe a device response.
#[derive(Debug, Error)]
pub enum Error {
    // ── Endpoint ────────────────────────────────────────────────────
    /// Base URL rejected by [`is_valid_url`](crate::is_valid_url).
    #[error("Invalid destination address: {url}")]
    InvalidEndpoint { url: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The `reqwest::Client` could not be built from the transport settings.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Authentication ──────────────────────────────────────────────
    /// Token issuer answered, but not with a usable token.
    #[error("Unable to get authentication token: {message}")]
    AuthProvisioning { message: String },
}
