//! Shared test utilities for the modelgate workspace.
//!
//! Lives in its own crate so the CLI integration tests and `xtask` can both use it outside
//! `#[cfg(test)]`.

use serde_json::Value;

pub const VERSION_PLACEHOLDER: &str = "__VERSION__";
pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";

/// Normalize non-deterministic fields of a compliance report or SARIF log.
///
/// 1. **Root-only**: for a compliance report (root has `schema`, `tool`, `generated_at`,
///    `summary`, `findings`), `generated_at` and `tool.version` are replaced.
/// 2. **SARIF**: every run's `tool.driver.version` and `invocations[].endTimeUtc` are replaced.
///
/// Nested objects that merely look like a report (e.g. an `expected` payload) are untouched.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(root) = value.as_object_mut() else {
        return value;
    };

    let is_report = ["schema", "tool", "generated_at", "summary", "findings"]
        .iter()
        .all(|key| root.contains_key(*key));
    if is_report {
        root.insert(
            "generated_at".to_string(),
            Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
        );
        if let Some(tool) = root.get_mut("tool").and_then(Value::as_object_mut)
            && tool.contains_key("version")
        {
            tool.insert(
                "version".to_string(),
                Value::String(VERSION_PLACEHOLDER.to_string()),
            );
        }
    }

    if let Some(runs) = root.get_mut("runs").and_then(Value::as_array_mut) {
        for run in runs {
            if let Some(driver) = run.pointer_mut("/tool/driver").and_then(Value::as_object_mut)
                && driver.contains_key("version")
            {
                driver.insert(
                    "version".to_string(),
                    Value::String(VERSION_PLACEHOLDER.to_string()),
                );
            }
            if let Some(invocations) = run.get_mut("invocations").and_then(Value::as_array_mut) {
                for inv in invocations.iter_mut().filter_map(Value::as_object_mut) {
                    if inv.contains_key("endTimeUtc") {
                        inv.insert(
                            "endTimeUtc".to_string(),
                            Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
                        );
                    }
                }
            }
        }
    }

    value
}
