use modelgate_types::ComplianceReport;

/// Pretty-printed report with a trailing newline.
pub fn render_json(report: &ComplianceReport) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}
