// ── Retry orchestration ──
//
// Drives each device from Pending to Done. A `Retry` outcome means the
// dispatcher already refreshed the session token, so the orchestrator only
// has to decide whether the budget allows another send.

use tracing::{debug, info, warn};

use netpush_api::{Session, TokenProvider, UpdateDispatcher, UpdateOutcome};

use crate::config::DEFAULT_RETRY_BUDGET;
use crate::model::{DeviceReport, FailureReason, MacAddress, RunReport};

/// Tracing target for the per-run result log (retries and failed devices).
pub const RESULT_TARGET: &str = "netpush::result";

/// Per-device retry policy plus the run-level fail-fast switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOrchestrator {
    retry_budget: u32,
    fail_fast: bool,
}

impl Default for RetryOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_BUDGET, false)
    }
}

impl RetryOrchestrator {
    pub fn new(retry_budget: u32, fail_fast: bool) -> Self {
        Self {
            retry_budget,
            fail_fast,
        }
    }

    pub fn retry_budget(&self) -> u32 {
        self.retry_budget
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Update one device, re-sending after each `Retry` while budget remains.
    ///
    /// A device that keeps answering 401 is sent `1 + retry_budget` requests
    /// and then reported as failed with [`FailureReason::RetriesExhausted`].
    pub async fn update_device<P: TokenProvider + Send>(
        &self,
        dispatcher: &UpdateDispatcher,
        session: &mut Session<P>,
        mac: &MacAddress,
    ) -> DeviceReport {
        let (mut outcome, mut status) = dispatcher.send(session, mac.as_str()).await;
        let mut retries: u32 = 0;

        // `retries` never exceeds `retry_budget`, so the loop ends for any budget.
        while outcome == UpdateOutcome::Retry && retries < self.retry_budget {
            retries += 1;
            info!(
                target: RESULT_TARGET,
                mac = %mac,
                attempt = retries.saturating_add(1),
                "Retrying to send request after getting token for host mac: {mac}"
            );
            (outcome, status) = dispatcher.send(session, mac.as_str()).await;
        }
        let attempts = retries.saturating_add(1);

        let failure = match outcome {
            UpdateOutcome::Ok => None,
            UpdateOutcome::Retry => Some(FailureReason::RetriesExhausted),
            UpdateOutcome::Fail if status == 0 => Some(FailureReason::Unreachable),
            UpdateOutcome::Fail if status == 401 => Some(FailureReason::AuthProvisioning),
            UpdateOutcome::Fail => Some(FailureReason::Rejected),
        };

        let outcome = if failure.is_some() {
            UpdateOutcome::Fail
        } else {
            UpdateOutcome::Ok
        };

        DeviceReport {
            mac: mac.clone(),
            outcome,
            status,
            attempts,
            failure,
        }
    }

    /// Update every device in order and collect the reports.
    ///
    /// With fail-fast enabled the run stops at the first failed device and
    /// [`RunReport::aborted_at`] names it.
    pub async fn run<P: TokenProvider + Send>(
        &self,
        dispatcher: &UpdateDispatcher,
        session: &mut Session<P>,
        devices: &[MacAddress],
    ) -> RunReport {
        let mut report = RunReport::default();

        for mac in devices {
            let device = self.update_device(dispatcher, session, mac).await;

            if device.is_ok() {
                debug!(mac = %mac, attempts = device.attempts, "device updated");
                report.devices.push(device);
                continue;
            }

            warn!(
                target: RESULT_TARGET,
                mac = %mac,
                status = device.status,
                reason = ?device.failure,
                "Unable to send request for the host with mac {mac}"
            );
            report.devices.push(device);

            if self.fail_fast {
                report.aborted_at = Some(mac.clone());
                break;
            }
        }

        report
    }
}
