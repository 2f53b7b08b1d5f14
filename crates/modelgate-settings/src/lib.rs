//! Policy parsing and validation.
//!
//! This crate is intentionally IO-free: it parses documents provided as strings and hands the
//! domain crate an already-validated policy.

#![forbid(unsafe_code)]

mod error;
mod format;
mod inputs;
mod validate;

pub use error::{InputError, PolicyError};
pub use format::PolicyFormat;
pub use inputs::{parse_candidates_json, parse_context_json};

use modelgate_domain::policy::Policy;
use serde_json::Value;

/// Report formats a policy may request under `reporting.formats`.
pub const KNOWN_REPORT_FORMATS: &[&str] = &["json", "csv", "sarif", "all"];

/// Parse and validate a policy document.
pub fn parse_policy(input: &str, format: PolicyFormat) -> Result<Policy, PolicyError> {
    let raw = parse_document(input, format)?;
    validate::validate_raw(&raw)?;
    let policy: Policy = serde_json::from_value(raw).map_err(PolicyError::Shape)?;
    validate::validate_policy(&policy)?;
    Ok(policy)
}

/// JSON Schema for the policy document.
pub fn policy_schema() -> schemars::Schema {
    schemars::schema_for!(Policy)
}

fn parse_document(input: &str, format: PolicyFormat) -> Result<Value, PolicyError> {
    let value: Value = match format {
        PolicyFormat::Yaml => serde_yaml::from_str(input)?,
        PolicyFormat::Json => serde_json::from_str(input)?,
        PolicyFormat::Toml => toml::from_str(input)?,
    };
    Ok(value)
}
