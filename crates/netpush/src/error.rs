//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use netpush_config::ConfigError;
use netpush_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INPUT: i32 = 3;
    pub const ENDPOINT: i32 = 4;
    pub const AUTH: i32 = 5;
    pub const ABORTED: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Inputs ───────────────────────────────────────────────────────
    #[error("Cannot read {path}")]
    #[diagnostic(
        code(netpush::file_access),
        help("Check the path passed with --mac-file / --json and its permissions.")
    )]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No mac address found in the hosts file {path}")]
    #[diagnostic(
        code(netpush::empty_device_list),
        help(
            "Every data line needs a MAC address as its first comma-separated field.\n\
             Lines containing \"mac\" are treated as headers and skipped."
        )
    )]
    EmptyDeviceList { path: String },

    // ── Endpoint ─────────────────────────────────────────────────────
    #[error("Invalid destination address: {url}")]
    #[diagnostic(
        code(netpush::invalid_endpoint),
        help(
            "The URI must look like http://host[:port][/path] with a lowercase host.\n\
             Pass the port separately with --port."
        )
    )]
    InvalidEndpoint { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Unable to get authentication token: {message}")]
    #[diagnostic(
        code(netpush::auth_provisioning),
        help("Check --token-url and --access-token, or use --token-mode static.")
    )]
    AuthProvisioning { message: String },

    // ── Run ──────────────────────────────────────────────────────────
    #[error("Unable to send request for the host with mac {mac}")]
    #[diagnostic(
        code(netpush::fail_fast),
        help("The run stopped at the first failure because --fail-fast is set.")
    )]
    FailFastAbort { mac: String },

    #[error("Transport error: {message}")]
    #[diagnostic(code(netpush::transport))]
    Transport { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netpush::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(netpush::config))]
    Config(Box<figment::Error>),

    // ── Rendering ────────────────────────────────────────────────────
    #[error("Failed to render report: {0}")]
    #[diagnostic(code(netpush::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileAccess { .. } | Self::EmptyDeviceList { .. } => exit_code::INPUT,
            Self::InvalidEndpoint { .. } => exit_code::ENDPOINT,
            Self::AuthProvisioning { .. } => exit_code::AUTH,
            Self::FailFastAbort { .. } => exit_code::ABORTED,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::FileAccess { path, source } => CliError::FileAccess {
                path: path.display().to_string(),
                source,
            },
            CoreError::EmptyDeviceList { path } => CliError::EmptyDeviceList {
                path: path.display().to_string(),
            },
            CoreError::InvalidEndpoint { url } => CliError::InvalidEndpoint { url },
            CoreError::AuthProvisioning { message } => CliError::AuthProvisioning { message },
            CoreError::Transport { message } => CliError::Transport { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::Config(e),
        }
    }
}
