//! Report encoders: structured JSON, flat CSV, and SARIF 2.1.0.
//!
//! Every encoder is a pure function of a [`ComplianceReport`]; none of them reorder findings.

#![forbid(unsafe_code)]

mod csv;
mod format;
mod json;
mod sarif;

#[cfg(test)]
mod test_support;

pub use csv::{CSV_COLUMNS, render_csv};
pub use format::{ReportFormat, UnknownFormat, formats_from_names};
pub use json::render_json;
pub use sarif::{SARIF_SCHEMA, SARIF_VERSION, render_sarif, sarif_level};

use modelgate_types::ComplianceReport;

/// Encode a report in one format.
pub fn render(report: &ComplianceReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => render_json(report),
        ReportFormat::Csv => Ok(render_csv(report)),
        ReportFormat::Sarif => render_sarif(report),
    }
}
