use modelgate_types::{
    ComplianceReport, EnforcementDecision, Finding, FindingStatus, OnViolation, PolicyMode,
    PolicySummary, ReportSummary, SCHEMA_COMPLIANCE_V1, Severity, ToolMeta, ViolationCount,
};
use serde_json::json;
use time::macros::datetime;

fn finding(status: FindingStatus, severity: Severity, rule_id: &str, code: &str) -> Finding {
    Finding {
        status,
        severity,
        rule_id: rule_id.to_string(),
        code: code.to_string(),
        rule_path: "rules.models.deny".to_string(),
        message: format!("{code} for model"),
        expected: json!(["*uncensored*"]),
        actual: json!("dolphin:7b-uncensored"),
        recommendation: "Select a different model.".to_string(),
        model: "dolphin:7b-uncensored".to_string(),
        source: "ollama".to_string(),
        registry: "unknown".to_string(),
        model_version: "unknown".to_string(),
        digest: "unknown".to_string(),
        license: "apache-2.0".to_string(),
        quantization: "Q4_K_M".to_string(),
    }
}

/// Two active denials sharing a rule id, with a suppressed finding between them.
pub fn sample_report() -> ComplianceReport {
    ComplianceReport {
        schema: SCHEMA_COMPLIANCE_V1.to_string(),
        tool: ToolMeta {
            name: "modelgate".to_string(),
            version: "0.1.0".to_string(),
        },
        generated_at: datetime!(2025-03-01 12:00 UTC),
        command: "check".to_string(),
        policy: PolicySummary {
            path: Some("policy.yaml".to_string()),
            version: "1".to_string(),
            org: "acme".to_string(),
            mode: PolicyMode::Enforce,
            on_violation: OnViolation::Error,
            allow_exceptions: true,
            report_formats: vec!["all".to_string()],
        },
        enforcement: EnforcementDecision {
            mode: PolicyMode::Enforce,
            on_violation: OnViolation::Error,
            has_failures: true,
            should_block: true,
            exit_code: 1,
        },
        runtime: json!({"backend": "cuda", "ram_gb": 32}),
        summary: ReportSummary {
            total_checked: 3,
            pass_count: 1,
            fail_count: 2,
            active_violations: 2,
            suppressed_violations: 1,
            exceptions_applied: 1,
            top_violations: vec![ViolationCount {
                code: "MODEL_DENIED".to_string(),
                count: 2,
            }],
        },
        findings: vec![
            finding(FindingStatus::Active, Severity::Critical, "MGP-aaaaaaaaaaaa", "MODEL_DENIED"),
            finding(
                FindingStatus::Suppressed,
                Severity::Medium,
                "MGP-bbbbbbbbbbbb",
                "MODEL_SIZE_UNKNOWN",
            ),
            finding(FindingStatus::Active, Severity::Critical, "MGP-aaaaaaaaaaaa", "MODEL_DENIED"),
        ],
    }
}
