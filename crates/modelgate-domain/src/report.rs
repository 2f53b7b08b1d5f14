use crate::engine::BatchEvaluation;
use crate::findings::expand_findings;
use crate::policy::Policy;
use modelgate_types::{
    ComplianceReport, Finding, FindingStatus, PolicySummary, ReportSummary,
    SCHEMA_COMPLIANCE_V1, ToolMeta, ViolationCount,
};
use serde_json::Value;
use std::collections::BTreeMap;
use time::OffsetDateTime;

pub const TOOL_NAME: &str = "modelgate";
pub const TOP_VIOLATIONS_LIMIT: usize = 5;

/// Everything the report builder needs besides the evaluation itself.
#[derive(Clone, Debug)]
pub struct ReportInput<'a> {
    pub policy: &'a Policy,
    pub policy_path: Option<String>,
    pub command: String,
    pub tool_version: String,
    pub generated_at: OffsetDateTime,
    /// Runtime/hardware snapshot copied verbatim into the report.
    pub runtime: Value,
    pub evaluation: &'a BatchEvaluation,
}

pub fn build_report(input: ReportInput<'_>) -> ComplianceReport {
    let ReportInput {
        policy,
        policy_path,
        command,
        tool_version,
        generated_at,
        runtime,
        evaluation,
    } = input;

    let findings = expand_findings(&evaluation.results);
    let active = findings
        .iter()
        .filter(|f| f.status == FindingStatus::Active)
        .count();

    let summary = ReportSummary {
        total_checked: evaluation.aggregate.total_checked as u32,
        pass_count: evaluation.aggregate.pass_count() as u32,
        fail_count: evaluation.aggregate.fail_count as u32,
        active_violations: active as u32,
        suppressed_violations: (findings.len() - active) as u32,
        exceptions_applied: evaluation.exceptions_applied as u32,
        top_violations: top_violations(&findings),
    };

    ComplianceReport {
        schema: SCHEMA_COMPLIANCE_V1.to_string(),
        tool: ToolMeta {
            name: TOOL_NAME.to_string(),
            version: tool_version,
        },
        generated_at,
        command,
        policy: PolicySummary {
            path: policy_path,
            version: policy.version.clone(),
            org: policy.org.clone(),
            mode: policy.mode,
            on_violation: policy.enforcement.on_violation,
            allow_exceptions: policy.enforcement.allow_exceptions,
            report_formats: policy.reporting.formats.clone(),
        },
        enforcement: evaluation.decision.clone(),
        runtime,
        summary,
        findings,
    }
}

/// Most frequent active codes, descending by count, ties by code.
pub fn top_violations(findings: &[Finding]) -> Vec<ViolationCount> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for f in findings.iter().filter(|f| f.status == FindingStatus::Active) {
        *counts.entry(f.code.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<ViolationCount> = counts
        .into_iter()
        .map(|(code, count)| ViolationCount {
            code: code.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
    ranked.truncate(TOP_VIOLATIONS_LIMIT);
    ranked
}
