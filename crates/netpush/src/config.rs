//! CLI configuration, a thin wrapper around `netpush_config`.
//!
//! Loads the config file + environment, then layers the command-line
//! flags on top before translating into an `UpdaterConfig`.

use std::path::PathBuf;

use netpush_config::{Config, config_path, load_config_from, to_updater_config};
use netpush_core::UpdaterConfig;

use crate::cli::PushOpts;
use crate::error::CliError;

/// Everything an update run needs from configuration.
#[derive(Debug)]
pub struct RunConfig {
    pub updater: UpdaterConfig,
    pub log_file: PathBuf,
}

/// Resolve the run configuration. Flags > env > config file > defaults.
pub fn resolve(opts: &PushOpts) -> Result<RunConfig, CliError> {
    let path = opts.config.clone().unwrap_or_else(config_path);
    let mut cfg = load_config_from(&path)?;
    apply_overrides(&mut cfg, opts);

    Ok(RunConfig {
        updater: to_updater_config(&cfg)?,
        log_file: cfg.updater.log_file,
    })
}

fn apply_overrides(cfg: &mut Config, opts: &PushOpts) {
    let updater = &mut cfg.updater;
    if let Some(ref path) = opts.mac_file {
        updater.hosts_file.clone_from(path);
    }
    if let Some(ref path) = opts.json {
        updater.payload_file.clone_from(path);
    }
    if let Some(ref uri) = opts.uri {
        updater.base_url.clone_from(uri);
    }
    if let Some(port) = opts.port {
        updater.port = port;
    }
    if let Some(ref path) = opts.log_file {
        updater.log_file.clone_from(path);
    }
    if let Some(retries) = opts.retries {
        updater.retry_budget = retries;
    }
    if let Some(secs) = opts.timeout {
        updater.timeout = secs;
    }
    if let Some(secs) = opts.connect_timeout {
        updater.connect_timeout = secs;
    }
    updater.fail_fast |= opts.fail_fast;

    let token = &mut cfg.token;
    if let Some(mode) = opts.token_mode {
        token.mode = mode.as_str().into();
    }
    if opts.token_url.is_some() {
        token.issuer_url.clone_from(&opts.token_url);
    }
    if opts.access_token.is_some() {
        token.access_token.clone_from(&opts.access_token);
    }
}
