// ── Core error types ──
//
// Construction-time failures only. Device responses never become errors:
// they are folded into `DeviceReport`s by the orchestrator. The
// `From<netpush_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input files ──────────────────────────────────────────────────
    #[error("Cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No mac address found in the hosts file {}", path.display())]
    EmptyDeviceList { path: PathBuf },

    // ── Endpoint ─────────────────────────────────────────────────────
    #[error("Invalid destination address: {url}")]
    InvalidEndpoint { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Unable to get authentication token: {message}")]
    AuthProvisioning { message: String },

    // ── Transport ────────────────────────────────────────────────────
    #[error("Transport error: {message}")]
    Transport { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netpush_api::Error> for CoreError {
    fn from(err: netpush_api::Error) -> Self {
        match err {
            netpush_api::Error::InvalidEndpoint { url } => CoreError::InvalidEndpoint { url },
            netpush_api::Error::AuthProvisioning { message } => {
                CoreError::AuthProvisioning { message }
            }
            netpush_api::Error::Transport(e) => CoreError::Transport {
                message: e.to_string(),
            },
            netpush_api::Error::ClientBuild(message) => CoreError::Transport { message },
        }
    }
}
