//! Update engine between `netpush-api` and the `netpush` binary.
//!
//! - **[`NetworkUpdater`]**: Built atomically from an [`UpdaterConfig`]:
//!   the device list, the payload and the endpoint must all load before a
//!   dispatcher exists. [`run()`](NetworkUpdater::run) then walks the
//!   devices in file order.
//!
//! - **[`RetryOrchestrator`]**: Per-device loop that re-sends after a
//!   token refresh until the retry budget is spent, and optionally stops
//!   the whole run at the first failure.
//!
//! - **Loaders** ([`loader`]): Host file parsing and opaque payload reads.
//!
//! - **Reports** ([`model`]): [`DeviceReport`] per device, collected into
//!   a [`RunReport`]. Failed devices are also logged on the
//!   [`RESULT_TARGET`] tracing target.

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod orchestrator;
pub mod updater;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_RETRY_BUDGET, TokenConfig, UpdaterConfig};
pub use error::CoreError;
pub use loader::{load_config_document, load_device_list, parse_device_list};
pub use model::{ConfigDocument, DeviceReport, FailureReason, MacAddress, RunReport};
pub use orchestrator::{RESULT_TARGET, RetryOrchestrator};
pub use updater::NetworkUpdater;

pub use netpush_api::UpdateOutcome;
