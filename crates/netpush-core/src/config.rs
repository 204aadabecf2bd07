// ── Runtime update configuration ──
//
// These types describe *what* to push and *where*. They carry credential
// data and transport tuning, but never touch the config file. The binary
// builds an `UpdaterConfig` and hands it to `NetworkUpdater::build`.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use netpush_api::PLACEHOLDER_TOKEN;

/// Additional sends allowed after a `Retry` outcome.
pub const DEFAULT_RETRY_BUDGET: u32 = 3;

/// Where authentication tokens come from.
#[derive(Debug, Clone)]
pub enum TokenConfig {
    /// Fixed credential, re-issued on every refresh.
    Static { token: SecretString },
    /// Token-issuance endpoint queried with bearer auth on every refresh.
    Remote {
        issuer_url: Url,
        access_token: SecretString,
    },
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::Static {
            token: SecretString::from(PLACEHOLDER_TOKEN.to_owned()),
        }
    }
}

/// Configuration for a single update run.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Host file listing one device per line.
    pub hosts_file: PathBuf,
    /// Payload sent verbatim as every PUT body.
    pub payload_file: PathBuf,
    /// Destination base URL (e.g., `http://localhost`).
    pub base_url: String,
    /// Port appended to the base URL. `None` or `0` = no suffix.
    pub port: Option<u16>,
    pub token: TokenConfig,
    /// Additional sends after a `Retry` outcome.
    pub retry_budget: u32,
    /// Stop the run at the first device that fails.
    pub fail_fast: bool,
    pub connect_timeout: Duration,
    /// Total per-request timeout.
    pub timeout: Duration,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            hosts_file: PathBuf::from("resources/input.csv"),
            payload_file: PathBuf::from("resources/versions.json"),
            base_url: "http://localhost".into(),
            port: Some(8080),
            token: TokenConfig::default(),
            retry_budget: DEFAULT_RETRY_BUDGET,
            fail_fast: false,
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
        }
    }
}
