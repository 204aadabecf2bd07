//! Configuration file support for `netpush`.
//!
//! TOML settings layered over built-in defaults and `NETPUSH_` environment
//! variables, then translated into `netpush_core::UpdaterConfig`. The binary
//! applies its command-line overrides on top of the loaded [`Config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netpush_core::{DEFAULT_RETRY_BUDGET, TokenConfig, UpdaterConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub updater: UpdaterSettings,

    #[serde(default)]
    pub token: TokenSettings,
}

/// `[updater]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdaterSettings {
    #[serde(default = "default_hosts_file")]
    pub hosts_file: PathBuf,

    #[serde(default = "default_payload_file")]
    pub payload_file: PathBuf,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `0` disables the port suffix.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    #[serde(default)]
    pub fail_fast: bool,

    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,

    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for UpdaterSettings {
    fn default() -> Self {
        Self {
            hosts_file: default_hosts_file(),
            payload_file: default_payload_file(),
            base_url: default_base_url(),
            port: default_port(),
            log_file: default_log_file(),
            fail_fast: false,
            retry_budget: default_retry_budget(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_hosts_file() -> PathBuf {
    "resources/input.csv".into()
}
fn default_payload_file() -> PathBuf {
    "resources/versions.json".into()
}
fn default_base_url() -> String {
    "http://localhost".into()
}
fn default_port() -> u16 {
    8080
}
fn default_log_file() -> PathBuf {
    "logs/result.log".into()
}
fn default_retry_budget() -> u32 {
    DEFAULT_RETRY_BUDGET
}
fn default_timeout() -> u64 {
    30
}
fn default_connect_timeout() -> u64 {
    10
}

/// `[token]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenSettings {
    /// Token mode: "static" or "remote".
    #[serde(default = "default_token_mode")]
    pub mode: String,

    /// Credential for static mode (defaults to the built-in placeholder).
    pub static_token: Option<String>,

    /// Token-issuance endpoint for remote mode.
    pub issuer_url: Option<String>,

    /// Bearer credential for the issuer (plaintext; prefer `access_token_env`).
    pub access_token: Option<String>,

    /// Environment variable name containing the issuer bearer credential.
    pub access_token_env: Option<String>,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            mode: default_token_mode(),
            static_token: None,
            issuer_url: None,
            access_token: None,
            access_token_env: None,
        }
    }
}

fn default_token_mode() -> String {
    "static".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netpush", "netpush").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netpush");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETPUSH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve the token source from the `[token]` section.
pub fn resolve_token(settings: &TokenSettings) -> Result<TokenConfig, ConfigError> {
    match settings.mode.as_str() {
        "static" => Ok(match settings.static_token {
            Some(ref token) => TokenConfig::Static {
                token: SecretString::from(token.clone()),
            },
            None => TokenConfig::default(),
        }),
        "remote" => {
            let raw_url = settings
                .issuer_url
                .as_deref()
                .ok_or_else(|| ConfigError::Validation {
                    field: "token.issuer_url".into(),
                    reason: "required when token.mode is 'remote'".into(),
                })?;
            let issuer_url: url::Url = raw_url.parse().map_err(|_| ConfigError::Validation {
                field: "token.issuer_url".into(),
                reason: format!("invalid URL: {raw_url}"),
            })?;
            let access_token = resolve_access_token(settings)?;
            Ok(TokenConfig::Remote {
                issuer_url,
                access_token,
            })
        }
        other => Err(ConfigError::Validation {
            field: "token.mode".into(),
            reason: format!("expected 'static' or 'remote', got '{other}'"),
        }),
    }
}

/// Issuer credential: named env var first, then plaintext in config.
fn resolve_access_token(settings: &TokenSettings) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = settings.access_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Some(ref token) = settings.access_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::Validation {
        field: "token.access_token".into(),
        reason: "required when token.mode is 'remote'".into(),
    })
}

/// Largest accepted `retry_budget`.
pub const MAX_RETRY_BUDGET: u32 = 100;

/// Build an `UpdaterConfig` from loaded settings.
pub fn to_updater_config(config: &Config) -> Result<UpdaterConfig, ConfigError> {
    let updater = &config.updater;
    validate_updater(updater)?;
    Ok(UpdaterConfig {
        hosts_file: updater.hosts_file.clone(),
        payload_file: updater.payload_file.clone(),
        base_url: updater.base_url.clone(),
        port: Some(updater.port).filter(|p| *p != 0),
        token: resolve_token(&config.token)?,
        retry_budget: updater.retry_budget,
        fail_fast: updater.fail_fast,
        connect_timeout: Duration::from_secs(updater.connect_timeout),
        timeout: Duration::from_secs(updater.timeout),
    })
}

fn validate_updater(updater: &UpdaterSettings) -> Result<(), ConfigError> {
    if updater.retry_budget > MAX_RETRY_BUDGET {
        return Err(ConfigError::Validation {
            field: "updater.retry_budget".into(),
            reason: format!("must be at most {MAX_RETRY_BUDGET}, got {}", updater.retry_budget),
        });
    }
    for (field, secs) in [
        ("updater.timeout", updater.timeout),
        ("updater.connect_timeout", updater.connect_timeout),
    ] {
        if secs == 0 {
            return Err(ConfigError::Validation {
                field: field.into(),
                reason: "must be at least 1 second".into(),
            });
        }
    }
    Ok(())
}
