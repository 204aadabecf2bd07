// ── Input loaders ──
//
// Host file: CSV-like, the first comma-separated field of every data line
// is a MAC address once quote characters are stripped. Any line containing
// the marker `mac` is a header and is skipped.
// Payload: read whole, passed through untouched.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{ConfigDocument, MacAddress};

const HEADER_MARKER: &str = "mac";

/// Extract device addresses from host file contents, in file order.
pub fn parse_device_list(contents: &str) -> Vec<MacAddress> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.contains(HEADER_MARKER))
        .filter_map(|(idx, line)| {
            let field = line.split(',').next().unwrap_or_default();
            let mac: String = field.chars().filter(|c| *c != '"').collect();
            // Surrounding whitespace is dropped and an empty field is skipped
            // rather than sent as a blank address.
            let mac = mac.trim();
            if mac.is_empty() {
                warn!(line = idx + 1, "skipping host line with an empty address field");
                return None;
            }
            Some(MacAddress::new(mac))
        })
        .collect()
}

/// Read and parse the host file.
///
/// An empty result is an error: a run without devices is never a valid
/// configuration.
pub fn load_device_list(path: &Path) -> Result<Vec<MacAddress>, CoreError> {
    let raw = std::fs::read(path).map_err(|source| CoreError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let devices = parse_device_list(&String::from_utf8_lossy(&raw));

    if devices.is_empty() {
        return Err(CoreError::EmptyDeviceList {
            path: path.to_path_buf(),
        });
    }

    debug!(count = devices.len(), "loaded device list from {}", path.display());
    Ok(devices)
}

/// Read the payload file as-is.
pub fn load_config_document(path: &Path) -> Result<ConfigDocument, CoreError> {
    let raw = std::fs::read(path).map_err(|source| CoreError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = raw.len(), "loaded payload from {}", path.display());
    Ok(ConfigDocument::new(raw))
}
