// Destination endpoint validation
//
// The base URL is checked once against a small HTTP(S) grammar and then
// frozen inside `Endpoint`. Profile URLs are composed by plain string
// concatenation so the path reaches the server exactly as written.

use crate::error::Error;

/// Path segment prepended to every device identifier.
const PROFILE_PATH: &str = "/profiles/clientId:";

/// Check a base URL against the accepted grammar.
///
/// `http` or `https`, then `://`, a non-empty host made of lowercase ASCII
/// letters, digits, `.` and `-`, an optional `:port` whose first digit is
/// 1-9, and an optional path starting with `/` that contains no whitespace.
pub fn is_valid_url(url: &str) -> bool {
    let Some(rest) = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    else {
        return false;
    };

    let (authority, path) = rest.find('/').map_or((rest, ""), |i| rest.split_at(i));
    if path.chars().any(char::is_whitespace) {
        return false;
    }

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    };

    is_valid_host(host) && port.is_none_or(is_valid_port)
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
}

fn is_valid_port(port: &str) -> bool {
    let mut chars = port.chars();
    matches!(chars.next(), Some('1'..='9')) && chars.all(|c| c.is_ascii_digit())
}

/// A validated destination: base URL plus optional port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    port: Option<u16>,
}

impl Endpoint {
    /// Validate `base` and pair it with `port`.
    ///
    /// A port of `0` means "no port suffix", matching how an unset port
    /// is passed around on the command line.
    pub fn new(base: impl Into<String>, port: Option<u16>) -> Result<Self, Error> {
        let base = base.into();
        if !is_valid_url(&base) {
            return Err(Error::InvalidEndpoint { url: base });
        }
        Ok(Self {
            base,
            port: port.filter(|p| *p != 0),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// `{base}[:{port}]/profiles/clientId:{device}`
    pub fn profile_url(&self, device: &str) -> String {
        match self.port {
            Some(port) => format!("{}:{port}{PROFILE_PATH}{device}", self.base),
            None => format!("{}{PROFILE_PATH}{device}", self.base),
        }
    }
}
