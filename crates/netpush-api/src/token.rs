// Authentication token providers and the per-run session
//
// A `Session` owns whichever provider the run was configured with and is
// handed to the dispatcher by `&mut`, so the token has exactly one writer.
// The static provider re-issues a configured credential; the remote provider
// fetches a fresh one from a token-issuance endpoint on every refresh.

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Credential issued by the static provider when none is configured.
pub const PLACEHOLDER_TOKEN: &str = "123456789abcdef123456789abcdef";

/// Source of the `x-authentication-token` header value.
pub trait TokenProvider {
    /// The token to attach to the next request.
    fn current_token(&self) -> &SecretString;

    /// Replace the cached token with a newly obtained one.
    fn refresh(&mut self) -> impl Future<Output = Result<(), Error>> + Send;
}

// ── Static ──────────────────────────────────────────────────────────

/// Hands out a fixed credential. Refreshing can never fail.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    issued: SecretString,
    current: SecretString,
}

impl StaticTokenProvider {
    pub fn new(token: SecretString) -> Self {
        Self {
            current: token.clone(),
            issued: token,
        }
    }
}

impl Default for StaticTokenProvider {
    fn default() -> Self {
        Self::new(SecretString::from(PLACEHOLDER_TOKEN.to_owned()))
    }
}

impl TokenProvider for StaticTokenProvider {
    fn current_token(&self) -> &SecretString {
        &self.current
    }

    async fn refresh(&mut self) -> Result<(), Error> {
        self.current = self.issued.clone();
        Ok(())
    }
}

// ── Remote ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IssuedToken {
    token: Option<String>,
}

/// Fetches tokens from an issuer with `GET` + bearer auth.
///
/// The issuer must answer with a JSON object carrying a non-empty `token`
/// string; anything else is an [`Error::AuthProvisioning`].
pub struct RemoteTokenProvider {
    http: reqwest::Client,
    issuer_url: Url,
    access_token: SecretString,
    current: SecretString,
}

impl RemoteTokenProvider {
    /// The cached token stays empty until the first [`refresh`](TokenProvider::refresh).
    pub fn new(http: reqwest::Client, issuer_url: Url, access_token: SecretString) -> Self {
        Self {
            http,
            issuer_url,
            access_token,
            current: SecretString::from(String::new()),
        }
    }
}

impl std::fmt::Debug for RemoteTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTokenProvider")
            .field("issuer_url", &self.issuer_url.as_str())
            .finish_non_exhaustive()
    }
}

impl TokenProvider for RemoteTokenProvider {
    fn current_token(&self) -> &SecretString {
        &self.current
    }

    async fn refresh(&mut self) -> Result<(), Error> {
        debug!("requesting token from {}", self.issuer_url);

        let resp = self
            .http
            .get(self.issuer_url.clone())
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::AuthProvisioning {
                message: format!("token issuer returned HTTP {status}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let issued: IssuedToken =
            serde_json::from_str(&body).map_err(|e| Error::AuthProvisioning {
                message: format!("malformed token response: {e}"),
            })?;

        match issued.token {
            Some(token) if !token.is_empty() => {
                self.current = SecretString::from(token);
                debug!("token refreshed");
                Ok(())
            }
            _ => Err(Error::AuthProvisioning {
                message: "token missing from issuer response".into(),
            }),
        }
    }
}

// ── Runtime selection ───────────────────────────────────────────────

/// Provider chosen by configuration at startup.
#[derive(Debug)]
pub enum TokenSource {
    Static(StaticTokenProvider),
    Remote(RemoteTokenProvider),
}

impl TokenProvider for TokenSource {
    fn current_token(&self) -> &SecretString {
        match self {
            Self::Static(p) => p.current_token(),
            Self::Remote(p) => p.current_token(),
        }
    }

    async fn refresh(&mut self) -> Result<(), Error> {
        match self {
            Self::Static(p) => p.refresh().await,
            Self::Remote(p) => p.refresh().await,
        }
    }
}

// ── Session ─────────────────────────────────────────────────────────

/// Token state for one run.
#[derive(Debug)]
pub struct Session<P = TokenSource> {
    provider: P,
    refreshes: u32,
}

impl<P: TokenProvider + Send> Session<P> {
    /// Wrap a provider without fetching a token.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            refreshes: 0,
        }
    }

    /// Wrap a provider and obtain the first token before any request goes out.
    pub async fn establish(provider: P) -> Result<Self, Error> {
        let mut session = Self::new(provider);
        session.refresh().await?;
        Ok(session)
    }

    pub fn token(&self) -> &SecretString {
        self.provider.current_token()
    }

    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.provider.refresh().await?;
        self.refreshes += 1;
        Ok(())
    }

    /// Number of successful refreshes since the session was created.
    pub fn refresh_count(&self) -> u32 {
        self.refreshes
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
