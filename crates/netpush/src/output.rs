//! Report formatting: table, JSON, YAML, plain.
//!
//! Renders the run report in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, plain emits the failed MACs.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use netpush_core::{DeviceReport, RunReport};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "OUTCOME")]
    outcome: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "ATTEMPTS")]
    attempts: u32,
    #[tabled(rename = "REASON")]
    reason: String,
}

impl From<&DeviceReport> for DeviceRow {
    fn from(d: &DeviceReport) -> Self {
        Self {
            mac: d.mac.to_string(),
            outcome: d.outcome.to_string(),
            status: match d.status {
                0 => "-".into(),
                code => code.to_string(),
            },
            attempts: d.attempts,
            reason: d.failure.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

// ── Render dispatcher ────────────────────────────────────────────────

/// Render the run report in the chosen format.
pub fn render_report(format: &OutputFormat, report: &RunReport) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(report).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Plain => Ok(report
            .failed()
            .map(|d| d.mac.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table(report: &RunReport) -> String {
    let rows: Vec<DeviceRow> = report.devices.iter().map(DeviceRow::from).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    format!("{table}\n{}", summary(report))
}

fn summary(report: &RunReport) -> String {
    let ok = report.succeeded().count();
    let failed = report.failed().count();
    match report.aborted_at {
        Some(ref mac) => format!("{ok} updated, {failed} failed (aborted at {mac})"),
        None => format!("{ok} updated, {failed} failed"),
    }
}
