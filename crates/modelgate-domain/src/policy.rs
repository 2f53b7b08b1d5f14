use modelgate_types::{OnViolation, PolicyMode};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Policy document, already validated by the loader.
///
/// Immutable for the duration of a run. Every section is optional at this level so a policy
/// can be built in code without going through `modelgate-settings`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Policy {
    #[schemars(with = "String")]
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub mode: PolicyMode,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub enforcement: EnforcementSettings,
    #[serde(default)]
    pub exceptions: Vec<ExceptionRule>,
    #[serde(default)]
    pub reporting: ReportingSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rules {
    #[serde(default)]
    pub models: ModelRules,
    #[serde(default)]
    pub runtime: RuntimeRules,
    #[serde(default)]
    pub compliance: ComplianceRules,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelRules {
    /// If non-empty, a candidate must match at least one pattern.
    #[serde(default)]
    pub allow: Vec<String>,
    /// A candidate matching any pattern is denied.
    #[serde(default)]
    pub deny: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_params_b: Option<f64>,
    #[serde(default, alias = "quantizations")]
    pub allowed_quantizations: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuntimeRules {
    /// If non-empty, the resolved backend must be one of these (case-insensitive).
    #[serde(default, alias = "required_backends", alias = "allowed_backends")]
    pub backends: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ram_gb: Option<f64>,
    #[serde(default, alias = "local_only")]
    pub require_local: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceRules {
    #[serde(default, alias = "licenses")]
    pub approved_licenses: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnforcementSettings {
    #[serde(default)]
    pub on_violation: OnViolation,
    /// Exit code when blocking. Values outside `[1,255]` fall back to `1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i64>,
    #[serde(default)]
    pub allow_exceptions: bool,
}

/// Time-bound, pattern-matched override. Scoped to a candidate, not to a single violation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExceptionRule {
    /// Pattern matched against the candidate's identifiers.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver: Option<String>,
    /// `YYYY-MM-DD` (end of that day, UTC) or RFC 3339. Absent means never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportingSettings {
    #[serde(default)]
    pub formats: Vec<String>,
}

impl Policy {
    /// Patterns in every rule that takes them, paired with their rule path.
    pub fn patterns(&self) -> impl Iterator<Item = (&'static str, &str)> {
        use modelgate_types::ids;
        let models = &self.rules.models;
        models
            .deny
            .iter()
            .map(|p| (ids::PATH_MODELS_DENY, p.as_str()))
            .chain(models.allow.iter().map(|p| (ids::PATH_MODELS_ALLOW, p.as_str())))
            .chain(
                models
                    .allowed_quantizations
                    .iter()
                    .map(|p| (ids::PATH_MODELS_ALLOWED_QUANTIZATIONS, p.as_str())),
            )
            .chain(
                self.rules
                    .compliance
                    .approved_licenses
                    .iter()
                    .map(|p| (ids::PATH_COMPLIANCE_APPROVED_LICENSES, p.as_str())),
            )
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(i)) => i.to_string(),
        Some(Raw::Float(f)) => f.to_string(),
        None => String::new(),
    })
}
