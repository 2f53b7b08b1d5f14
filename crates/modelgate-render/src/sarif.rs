//! SARIF 2.1.0 encoder for code-scanning tools.
//!
//! One rule per distinct `rule_id`, in first-seen order. Suppressed findings stay in the output
//! at `note` level with a marker on their message.

use modelgate_types::{ComplianceReport, Finding, FindingStatus, Severity, lookup_explanation};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use time::format_description::well_known::Rfc3339;

pub const SARIF_VERSION: &str = "2.1.0";
pub const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";
pub const SUPPRESSED_PREFIX: &str = "[SUPPRESSED] ";

pub fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low => "note",
    }
}

pub fn render_sarif(report: &ComplianceReport) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(&sarif_value(report))?;
    out.push('\n');
    Ok(out)
}

fn sarif_value(report: &ComplianceReport) -> Value {
    let mut rule_index: HashMap<&str, usize> = HashMap::new();
    let mut rules = Vec::new();
    let mut results = Vec::with_capacity(report.findings.len());

    for f in &report.findings {
        let index = *rule_index.entry(f.rule_id.as_str()).or_insert_with(|| {
            rules.push(rule(f));
            rules.len() - 1
        });
        results.push(result(f, index));
    }

    json!({
        "$schema": SARIF_SCHEMA,
        "version": SARIF_VERSION,
        "runs": [{
            "tool": {
                "driver": {
                    "name": report.tool.name,
                    "version": report.tool.version,
                    "rules": rules
                }
            },
            "invocations": [{
                "executionSuccessful": true,
                "exitCode": report.enforcement.exit_code,
                "endTimeUtc": generated_at(report)
            }],
            "properties": {
                "schema": report.schema,
                "org": report.policy.org,
                "policyVersion": report.policy.version,
                "mode": report.policy.mode.as_str(),
                "shouldBlock": report.enforcement.should_block
            },
            "results": results
        }]
    })
}

fn generated_at(report: &ComplianceReport) -> Value {
    report
        .generated_at
        .format(&Rfc3339)
        .map(Value::String)
        .unwrap_or(Value::Null)
}

fn rule(f: &Finding) -> Value {
    let short = lookup_explanation(&f.code)
        .map(|e| e.title.to_string())
        .unwrap_or_else(|| f.code.clone());
    json!({
        "id": f.rule_id,
        "name": f.code,
        "shortDescription": { "text": short },
        "help": { "text": f.recommendation },
        "defaultConfiguration": { "level": sarif_level(f.severity) },
        "properties": {
            "severity": f.severity.as_str(),
            "rulePath": f.rule_path
        }
    })
}

fn result(f: &Finding, rule_index: usize) -> Value {
    let (level, text) = match f.status {
        FindingStatus::Active => (sarif_level(f.severity), f.message.clone()),
        FindingStatus::Suppressed => ("note", format!("{SUPPRESSED_PREFIX}{}", f.message)),
    };

    let mut properties = Map::new();
    properties.insert("status".to_string(), json!(f.status.as_str()));
    properties.insert("severity".to_string(), json!(f.severity.as_str()));
    properties.insert("code".to_string(), json!(f.code));
    properties.insert("expected".to_string(), f.expected.clone());
    properties.insert("actual".to_string(), f.actual.clone());
    for (key, value) in [
        ("source", &f.source),
        ("registry", &f.registry),
        ("modelVersion", &f.model_version),
        ("digest", &f.digest),
        ("license", &f.license),
        ("quantization", &f.quantization),
    ] {
        properties.insert(key.to_string(), json!(value));
    }

    json!({
        "ruleId": f.rule_id,
        "ruleIndex": rule_index,
        "level": level,
        "message": { "text": text },
        "locations": [{
            "logicalLocations": [{
                "name": f.model,
                "kind": "resource"
            }]
        }],
        "partialFingerprints": {
            "modelgateRule/v1": format!("{}|{}", f.rule_id, f.model)
        },
        "properties": properties
    })
}
