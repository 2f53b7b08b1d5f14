//! Artifact writing and re-rendering of saved reports.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use modelgate_render::ReportFormat;
use modelgate_types::ComplianceReport;
use tracing::info;

/// `<out_dir>/<stem>.<ext>`
pub fn artifact_path(out_dir: &Utf8Path, stem: &str, format: ReportFormat) -> Utf8PathBuf {
    out_dir.join(format!("{stem}.{}", format.extension()))
}

pub fn render_report(report: &ComplianceReport, format: ReportFormat) -> anyhow::Result<String> {
    modelgate_render::render(report, format).with_context(|| format!("render {format}"))
}

/// Write one artifact per format and return their paths, in format order.
pub fn write_artifacts(
    report: &ComplianceReport,
    formats: &[ReportFormat],
    out_dir: &Utf8Path,
    stem: &str,
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = artifact_path(out_dir, stem, format);
        let text = render_report(report, format)?;
        write_text(&path, &text)?;
        info!(format = format.as_str(), path = %path, "artifact written");
        written.push(path);
    }
    Ok(written)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write: {path}"))?;
    Ok(())
}

/// Parse a JSON report previously written by `check`.
pub fn parse_report_json(text: &str) -> anyhow::Result<ComplianceReport> {
    serde_json::from_str(text).context("parse compliance report json")
}

/// One-line run summary for terminal output.
pub fn summary_line(report: &ComplianceReport) -> String {
    let s = &report.summary;
    let e = &report.enforcement;
    format!(
        "modelgate: {} checked, {} passed, {} failed ({} active, {} suppressed); mode={} block={} exit={}",
        s.total_checked,
        s.pass_count,
        s.fail_count,
        s.active_violations,
        s.suppressed_violations,
        e.mode.as_str(),
        e.should_block,
        e.exit_code
    )
}
