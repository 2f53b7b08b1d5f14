use modelgate_types::PolicyMode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A candidate model as supplied by the selection collaborator.
///
/// Loosely typed on purpose: every logical field has several accepted spellings, resolved once
/// into a [`ModelRecord`] by [`crate::resolve::resolve_candidate`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate(pub Map<String, Value>);

impl Candidate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and adapters.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Wrap a JSON value; only objects are candidates.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Look up a field. Dotted keys (`details.parameter_size`) walk nested objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(v) = self.0.get(key) {
            return Some(v);
        }
        let mut parts = key.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

/// Canonical candidate record. Every rule reads from this, never from the raw [`Candidate`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ModelRecord {
    /// Highest-priority identifier.
    pub id: Option<String>,
    /// Every distinct identifier found, in alias priority order. Patterns match against these.
    pub aliases: Vec<String>,

    pub size_gb: Option<f64>,
    /// `size_gb` was derived from parameters and quantization.
    pub size_derived: bool,
    pub params_b: Option<f64>,
    /// `params_b` was derived from size and quantization.
    pub params_derived: bool,
    pub quantization: Option<String>,

    pub license: Option<String>,
    pub source: Option<String>,
    pub registry: Option<String>,
    pub version: Option<String>,
    pub digest: Option<String>,

    /// Explicit locality flag carried by the candidate itself.
    pub is_local: Option<bool>,
    /// Deployment type (`type`/`kind`), used for locality heuristics.
    pub deployment: Option<String>,
    /// Backend named by the candidate; the context's backend wins when both exist.
    pub backend: Option<String>,
}

impl ModelRecord {
    pub fn display_name(&self) -> &str {
        self.id.as_deref().unwrap_or(modelgate_types::ids::UNKNOWN)
    }
}

/// Run-time facts that are not intrinsic to a candidate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(
        default,
        alias = "ramGB",
        alias = "ramGb",
        skip_serializing_if = "Option::is_none"
    )]
    pub ram_gb: Option<f64>,
    #[serde(default, alias = "isLocal", skip_serializing_if = "Option::is_none")]
    pub is_local: Option<bool>,
    /// Opaque hardware snapshot; the engine never inspects it.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub hardware: Value,
}

/// One failed check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    /// Policy rule that produced the violation (e.g. `rules.models.deny`).
    pub path: String,
    pub message: String,
    #[serde(default)]
    pub expected: Value,
    #[serde(default)]
    pub actual: Value,
}

/// Exception that suppressed a candidate's violations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedException {
    pub pattern: String,
    pub reason: Option<String>,
    pub approver: Option<String>,
    pub expires_at: Option<String>,
}

/// Outcome of evaluating one candidate.
///
/// `pass` is always `violations.is_empty()`; use the constructors rather than building by hand.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyResult {
    pub pass: bool,
    pub mode: PolicyMode,
    pub violation_count: u32,
    pub violations: Vec<Violation>,
    /// Violations moved aside by an exception. Empty unless `exception` is set.
    pub suppressed_violations: Vec<Violation>,
    pub rationale: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<AppliedException>,
}

pub const RATIONALE_PASSED: &str = "Passed all policy rules with zero violations.";

impl PolicyResult {
    pub fn from_violations(mode: PolicyMode, violations: Vec<Violation>) -> Self {
        let rationale = if violations.is_empty() {
            vec![RATIONALE_PASSED.to_string()]
        } else {
            violations
                .iter()
                .map(|v| format!("{}: {}", v.code, v.message))
                .collect()
        };
        Self {
            pass: violations.is_empty(),
            mode,
            violation_count: violations.len() as u32,
            violations,
            suppressed_violations: Vec::new(),
            rationale,
            exception: None,
        }
    }

    /// Move every active violation into the suppressed bucket.
    pub fn suppress(&mut self, exception: AppliedException) {
        let reason = exception.reason.as_deref().unwrap_or("no reason given");
        self.rationale.push(format!(
            "{}: {} ({})",
            modelgate_types::ids::RATIONALE_EXCEPTION_APPLIED,
            exception.pattern,
            reason
        ));
        self.suppressed_violations.append(&mut self.violations);
        self.violation_count = 0;
        self.pass = true;
        self.exception = Some(exception);
    }
}

/// A resolved candidate paired with its evaluation result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluatedCandidate {
    pub record: ModelRecord,
    pub result: PolicyResult,
}
