//! Checks the lenient domain model cannot express on its own.

use crate::KNOWN_REPORT_FORMATS;
use crate::error::PolicyError;
use modelgate_domain::exceptions::parse_expiry;
use modelgate_domain::policy::Policy;
use serde_json::Value;

const REQUIRED_KEYS: &[&str] = &["version", "org", "mode", "rules"];

/// Checks on the raw document, before the lenient deserialization discards detail.
pub(crate) fn validate_raw(raw: &Value) -> Result<(), PolicyError> {
    let doc = raw.as_object().ok_or(PolicyError::NotAMapping)?;

    for key in REQUIRED_KEYS {
        if doc.get(*key).is_none_or(Value::is_null) {
            return Err(PolicyError::MissingKey(key));
        }
    }

    let mode = &doc["mode"];
    match mode.as_str().map(|m| m.trim().to_ascii_lowercase()) {
        Some(m) if m == "audit" || m == "enforce" => {}
        _ => return Err(PolicyError::InvalidMode(display(mode))),
    }

    let Some(enforcement) = doc.get("enforcement") else {
        return Ok(());
    };
    if let Some(on_violation) = enforcement.get("on_violation").filter(|v| !v.is_null()) {
        match on_violation.as_str().map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "error" || v == "warn" => {}
            _ => return Err(PolicyError::InvalidOnViolation(display(on_violation))),
        }
    }
    if let Some(exit_code) = enforcement.get("exit_code").filter(|v| !v.is_null()) {
        match exit_code.as_i64() {
            Some(code) if (1..=255).contains(&code) => {}
            _ => return Err(PolicyError::InvalidExitCode(display(exit_code))),
        }
    }
    Ok(())
}

/// Checks on the typed policy.
pub(crate) fn validate_policy(policy: &Policy) -> Result<(), PolicyError> {
    let mut seen: Vec<&'static str> = Vec::new();
    let mut index = 0;
    for (path, pattern) in policy.patterns() {
        if seen.last() != Some(&path) {
            seen.push(path);
            index = 0;
        }
        if pattern.trim().is_empty() {
            return Err(PolicyError::EmptyPattern { path, index });
        }
        index += 1;
    }

    for (index, exception) in policy.exceptions.iter().enumerate() {
        if exception.model.trim().is_empty() {
            return Err(PolicyError::MissingExceptionModel { index });
        }
        if let Some(raw) = exception.expires_at.as_deref()
            && parse_expiry(raw).is_none()
        {
            return Err(PolicyError::InvalidExpiry {
                index,
                value: raw.to_string(),
            });
        }
    }

    for format in &policy.reporting.formats {
        let normalized = format.trim().to_ascii_lowercase();
        if !KNOWN_REPORT_FORMATS.contains(&normalized.as_str()) {
            return Err(PolicyError::UnknownReportFormat(format.clone()));
        }
    }
    Ok(())
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
