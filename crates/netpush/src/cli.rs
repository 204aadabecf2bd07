//! Clap derive structures for the `netpush` CLI.
//!
//! Running without a subcommand performs an update run; every option can
//! also come from a `NETPUSH_*` environment variable or the config file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netpush -- push a configuration profile to network devices
#[derive(Debug, Parser)]
#[command(
    name = "netpush",
    version,
    about = "Push a JSON configuration profile to a fleet of network devices",
    long_about = "Reads device MAC addresses from a host file and sends the JSON\n\
        configuration payload to each of them with an HTTP PUT to\n\
        {uri}[:{port}]/profiles/clientId:{mac}. Devices answering 401 are\n\
        retried after a token refresh, up to the retry budget.",
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(flatten)]
    pub push: PushOpts,

    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Update run options ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PushOpts {
    /// Path of the host file containing the MAC addresses of the hosts
    #[arg(long = "mac-file", short = 'm', env = "NETPUSH_MAC_FILE")]
    pub mac_file: Option<PathBuf>,

    /// Path of the json config file to be added in the HTTP request
    #[arg(long, short = 'j', env = "NETPUSH_JSON")]
    pub json: Option<PathBuf>,

    /// HTTP destination address (must include the http:// or https:// prefix)
    #[arg(long, short = 'u', env = "NETPUSH_URI")]
    pub uri: Option<String>,

    /// HTTP server port number (0 = none)
    #[arg(long, short = 'p', env = "NETPUSH_PORT")]
    pub port: Option<u16>,

    /// Location of the log describing the host results
    #[arg(long = "log-file", short = 'l', env = "NETPUSH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Exit at the first failed request
    #[arg(long = "fail-fast", short = 'f', env = "NETPUSH_FAIL_FAST")]
    pub fail_fast: bool,

    /// Additional attempts after an authentication rejection
    #[arg(long, short = 'r', env = "NETPUSH_RETRIES")]
    pub retries: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, env = "NETPUSH_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Connect timeout in seconds
    #[arg(long = "connect-timeout", env = "NETPUSH_CONNECT_TIMEOUT")]
    pub connect_timeout: Option<u64>,

    /// Where authentication tokens come from
    #[arg(long = "token-mode", env = "NETPUSH_TOKEN_MODE")]
    pub token_mode: Option<TokenMode>,

    /// Token-issuance endpoint (remote token mode)
    #[arg(long = "token-url", env = "NETPUSH_TOKEN_URL")]
    pub token_url: Option<String>,

    /// Bearer credential for the token issuer
    #[arg(long = "access-token", env = "NETPUSH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "NETPUSH_CONFIG")]
    pub config: Option<PathBuf>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Report format
    #[arg(
        long,
        short = 'o',
        env = "NETPUSH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress the report and non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Enums ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Failed MAC addresses, one per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenMode {
    /// Fixed credential from configuration
    Static,
    /// Fetch tokens from --token-url
    Remote,
}

impl TokenMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Remote => "remote",
        }
    }
}

// ── Subcommands ──────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
