use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for compliance reports.
pub const SCHEMA_COMPLIANCE_V1: &str = "modelgate.compliance.v1";

/// Finding severity. Mapped onto three-level scales (e.g. SARIF) by renderers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Whether a finding still counts against the candidate or was suppressed by an exception.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FindingStatus {
    Active,
    Suppressed,
}

impl FindingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingStatus::Active => "active",
            FindingStatus::Suppressed => "suppressed",
        }
    }
}

/// Policy mode. `audit` never blocks; `enforce` may block on unsuppressed failures.
///
/// Deserialization is lenient: an absent or unrecognized value is `audit`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    #[default]
    Audit,
    Enforce,
}

impl PolicyMode {
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("enforce") {
            PolicyMode::Enforce
        } else {
            PolicyMode::Audit
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyMode::Audit => "audit",
            PolicyMode::Enforce => "enforce",
        }
    }
}

impl<'de> Deserialize<'de> for PolicyMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(PolicyMode::parse_lenient).unwrap_or_default())
    }
}

/// What a violation means under `enforce`. Anything other than `warn` is `error`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OnViolation {
    #[default]
    Error,
    Warn,
}

impl OnViolation {
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("warn") {
            OnViolation::Warn
        } else {
            OnViolation::Error
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OnViolation::Error => "error",
            OnViolation::Warn => "warn",
        }
    }
}

impl<'de> Deserialize<'de> for OnViolation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(OnViolation::parse_lenient).unwrap_or_default())
    }
}

/// Block/allow outcome of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnforcementDecision {
    pub mode: PolicyMode,
    pub on_violation: OnViolation,
    pub has_failures: bool,
    pub should_block: bool,
    pub exit_code: i32,
}

/// One report row per violation, after exception resolution.
///
/// Identity fields are never absent: unresolved values are the string `"unknown"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub status: FindingStatus,
    pub severity: Severity,
    /// Stable identifier derived from `code` and `rule_path`, intended for dedup across runs.
    pub rule_id: String,
    pub code: String,
    pub rule_path: String,
    pub message: String,
    #[serde(default)]
    pub expected: JsonValue,
    #[serde(default)]
    pub actual: JsonValue,
    pub recommendation: String,

    pub model: String,
    pub source: String,
    pub registry: String,
    pub model_version: String,
    pub digest: String,
    pub license: String,
    pub quantization: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicySummary {
    pub path: Option<String>,
    pub version: String,
    pub org: String,
    pub mode: PolicyMode,
    pub on_violation: OnViolation,
    pub allow_exceptions: bool,
    pub report_formats: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViolationCount {
    pub code: String,
    pub count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub total_checked: u32,
    pub pass_count: u32,
    pub fail_count: u32,
    pub active_violations: u32,
    pub suppressed_violations: u32,
    pub exceptions_applied: u32,
    pub top_violations: Vec<ViolationCount>,
}

/// The assembled compliance report. Built once per run; read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceReport {
    /// Versioned schema identifier for the report shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// Name of the invoking command (e.g. `check`).
    pub command: String,
    pub policy: PolicySummary,
    pub enforcement: EnforcementDecision,
    /// Runtime/hardware snapshot supplied by the caller; passed through untouched.
    #[serde(default)]
    pub runtime: JsonValue,
    pub summary: ReportSummary,
    pub findings: Vec<Finding>,
}
