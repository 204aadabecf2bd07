// ── Domain model ──
//
// Device identifiers, the opaque payload, and the per-device / per-run
// reports produced by the orchestrator.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use netpush_api::UpdateOutcome;

// ── MacAddress ──────────────────────────────────────────────────────

/// Device identifier as written in the host file.
///
/// Kept verbatim: it becomes part of the request path, so no case or
/// separator normalization is applied. Uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ── ConfigDocument ──────────────────────────────────────────────────

/// Configuration payload, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument(Bytes);

impl ConfigDocument {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

// ── Reports ─────────────────────────────────────────────────────────

/// Why a device ended up failed.
///
/// Every variant is surfaced to users the same way ("unable to update
/// device"); the distinction is kept for reports and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureReason {
    /// Server answered with a non-success, non-401 status.
    Rejected,
    /// No response (connection refused, timeout, DNS).
    Unreachable,
    /// Still 401 after the retry budget was spent.
    RetriesExhausted,
    /// A 401 arrived but a new token could not be obtained.
    AuthProvisioning,
}

/// Final result for one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReport {
    pub mac: MacAddress,
    /// `Ok` or `Fail`; `Retry` never survives the orchestrator.
    pub outcome: UpdateOutcome,
    /// Status code of the last attempt (`0` = no response).
    pub status: u16,
    /// Number of PUT requests sent for this device.
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl DeviceReport {
    pub fn is_ok(&self) -> bool {
        self.outcome == UpdateOutcome::Ok
    }
}

/// Ordered device reports for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub devices: Vec<DeviceReport>,
    /// Device at which a fail-fast run stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted_at: Option<MacAddress>,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &DeviceReport> {
        self.devices.iter().filter(|d| d.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &DeviceReport> {
        self.devices.iter().filter(|d| !d.is_ok())
    }

    /// `true` when every processed device was updated and nothing aborted.
    pub fn is_clean(&self) -> bool {
        self.aborted_at.is_none() && self.failed().next().is_none()
    }

    pub fn get(&self, mac: &str) -> Option<&DeviceReport> {
        self.devices.iter().find(|d| d.mac.as_str() == mac)
    }
}
