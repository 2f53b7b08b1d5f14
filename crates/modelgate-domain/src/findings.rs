//! Flattening of per-candidate results into report findings.

use crate::fingerprint::rule_id;
use crate::model::{EvaluatedCandidate, ModelRecord, Violation};
use modelgate_types::{Finding, FindingStatus, ids, recommendation_for_code, severity_for_code};

/// One finding per active violation, then one per suppressed violation, candidate by candidate.
pub fn expand_findings(results: &[EvaluatedCandidate]) -> Vec<Finding> {
    let mut out = Vec::new();
    for evaluated in results {
        let result = &evaluated.result;
        for v in &result.violations {
            out.push(finding(&evaluated.record, v, FindingStatus::Active));
        }
        for v in &result.suppressed_violations {
            out.push(finding(&evaluated.record, v, FindingStatus::Suppressed));
        }
    }
    out
}

fn finding(record: &ModelRecord, v: &Violation, status: FindingStatus) -> Finding {
    Finding {
        status,
        severity: severity_for_code(&v.code),
        rule_id: rule_id(&v.code, &v.path),
        code: v.code.clone(),
        rule_path: v.path.clone(),
        message: v.message.clone(),
        expected: v.expected.clone(),
        actual: v.actual.clone(),
        recommendation: recommendation_for_code(&v.code).to_string(),
        model: or_unknown(record.id.as_deref()),
        source: or_unknown(record.source.as_deref()),
        registry: or_unknown(record.registry.as_deref()),
        model_version: or_unknown(record.version.as_deref()),
        digest: or_unknown(record.digest.as_deref()),
        license: or_unknown(record.license.as_deref()),
        quantization: or_unknown(record.quantization.as_deref()),
    }
}

fn or_unknown(value: Option<&str>) -> String {
    value.unwrap_or(ids::UNKNOWN).to_string()
}
