use modelgate_types::ids::CODE_NO_VIOLATIONS;
use modelgate_types::{ComplianceReport, Finding};
use serde_json::Value;

pub const CSV_COLUMNS: &[&str] = &[
    "status",
    "severity",
    "rule_id",
    "code",
    "rule_path",
    "model",
    "source",
    "registry",
    "model_version",
    "digest",
    "license",
    "quantization",
    "message",
    "expected",
    "actual",
    "recommendation",
];

const NO_VIOLATIONS_MESSAGE: &str = "No policy violations found";

/// One row per finding, or a single synthetic `pass` row when there are none.
pub fn render_csv(report: &ComplianceReport) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_COLUMNS.iter().map(|c| (*c).to_string()));

    if report.findings.is_empty() {
        let mut row = vec![String::new(); CSV_COLUMNS.len()];
        row[0] = "pass".to_string();
        row[3] = CODE_NO_VIOLATIONS.to_string();
        row[12] = NO_VIOLATIONS_MESSAGE.to_string();
        push_row(&mut out, row);
        return out;
    }

    for f in &report.findings {
        push_row(&mut out, finding_row(f));
    }
    out
}

fn finding_row(f: &Finding) -> Vec<String> {
    vec![
        f.status.as_str().to_string(),
        f.severity.as_str().to_string(),
        f.rule_id.clone(),
        f.code.clone(),
        f.rule_path.clone(),
        f.model.clone(),
        f.source.clone(),
        f.registry.clone(),
        f.model_version.clone(),
        f.digest.clone(),
        f.license.clone(),
        f.quantization.clone(),
        f.message.clone(),
        cell_value(&f.expected),
        cell_value(&f.actual),
        f.recommendation.clone(),
    ]
}

/// Null is empty, strings are raw, anything else is compact JSON.
fn cell_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_row(out: &mut String, cells: impl IntoIterator<Item = String>) {
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(&cell));
    }
    out.push('\n');
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
