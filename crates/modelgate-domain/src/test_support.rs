use crate::model::{Candidate, EvaluationContext};
use crate::policy::Policy;
use serde_json::Value;

pub fn policy_from(value: Value) -> Policy {
    serde_json::from_value(value).expect("test policy")
}

pub fn candidate(value: Value) -> Candidate {
    Candidate::from_value(value).expect("test candidate must be an object")
}

pub fn context(backend: Option<&str>, ram_gb: Option<f64>, is_local: Option<bool>) -> EvaluationContext {
    EvaluationContext {
        backend: backend.map(str::to_string),
        ram_gb,
        is_local,
        ..EvaluationContext::default()
    }
}

pub fn codes(result: &crate::model::PolicyResult) -> Vec<&str> {
    result.violations.iter().map(|v| v.code.as_str()).collect()
}
