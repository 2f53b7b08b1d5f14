use crate::checks::utils::{falls_short, fmt_quantity, measured, violation};
use crate::model::{EvaluationContext, ModelRecord, Violation};
use crate::policy::RuntimeRules;
use modelgate_types::ids;
use serde_json::{Value, json};

const REMOTE_MARKERS: &[&str] = &[
    "api",
    "remote",
    "cloud",
    "hosted",
    "openai",
    "anthropic",
    "openrouter",
    "azure",
    "bedrock",
    "vertex",
];
const LOCAL_MARKERS: &[&str] = &[
    "local", "ollama", "llama.cpp", "llamacpp", "lmstudio", "gguf", "file", "mlx",
];

pub fn run(
    record: &ModelRecord,
    context: &EvaluationContext,
    rules: &RuntimeRules,
    out: &mut Vec<Violation>,
) {
    check_backend(record, context, rules, out);
    check_ram(context, rules, out);
    check_locality(record, context, rules, out);
}

fn check_backend(
    record: &ModelRecord,
    context: &EvaluationContext,
    rules: &RuntimeRules,
    out: &mut Vec<Violation>,
) {
    if rules.backends.is_empty() {
        return;
    }
    let backend = context
        .backend
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .or(record.backend.as_deref());
    let Some(backend) = backend else {
        out.push(violation(
            ids::CODE_BACKEND_UNKNOWN,
            ids::PATH_RUNTIME_BACKENDS,
            "inference backend is unknown".to_string(),
            json!(rules.backends),
            Value::Null,
        ));
        return;
    };
    let allowed = rules
        .backends
        .iter()
        .any(|b| b.trim().eq_ignore_ascii_case(backend));
    if !allowed {
        out.push(violation(
            ids::CODE_BACKEND_NOT_ALLOWED,
            ids::PATH_RUNTIME_BACKENDS,
            format!(
                "backend '{backend}' is not one of: {}",
                rules.backends.join(", ")
            ),
            json!(rules.backends),
            json!(backend),
        ));
    }
}

fn check_ram(context: &EvaluationContext, rules: &RuntimeRules, out: &mut Vec<Violation>) {
    let Some(min) = rules.min_ram_gb else {
        return;
    };
    match measured(context.ram_gb) {
        None => out.push(violation(
            ids::CODE_RAM_UNKNOWN,
            ids::PATH_RUNTIME_MIN_RAM_GB,
            format!(
                "available RAM is unknown; cannot verify the {} GB minimum",
                fmt_quantity(min)
            ),
            json!(min),
            Value::Null,
        )),
        Some(ram) if falls_short(ram, min) => out.push(violation(
            ids::CODE_INSUFFICIENT_RAM,
            ids::PATH_RUNTIME_MIN_RAM_GB,
            format!(
                "available RAM {} GB is below the {} GB minimum",
                fmt_quantity(ram),
                fmt_quantity(min)
            ),
            json!(min),
            json!(ram),
        )),
        Some(_) => {}
    }
}

fn check_locality(
    record: &ModelRecord,
    context: &EvaluationContext,
    rules: &RuntimeRules,
    out: &mut Vec<Violation>,
) {
    if !rules.require_local {
        return;
    }
    let locality = infer_locality(record, context);
    if !locality.is_local {
        out.push(violation(
            ids::CODE_MODEL_NOT_LOCAL,
            ids::PATH_RUNTIME_REQUIRE_LOCAL,
            format!(
                "model '{}' is not served locally ({})",
                record.display_name(),
                locality.basis
            ),
            json!(true),
            json!(false),
        ));
    }
}

/// Where a candidate runs, and what the conclusion was based on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locality {
    pub is_local: bool,
    pub basis: String,
}

/// Explicit candidate flag, then the context flag, then source/type heuristics, then local.
pub fn infer_locality(record: &ModelRecord, context: &EvaluationContext) -> Locality {
    if let Some(is_local) = record.is_local {
        return Locality {
            is_local,
            basis: "candidate flag".to_string(),
        };
    }
    if let Some(is_local) = context.is_local {
        return Locality {
            is_local,
            basis: "context flag".to_string(),
        };
    }
    for (label, value) in [
        ("source", record.source.as_deref()),
        ("type", record.deployment.as_deref()),
    ] {
        let Some(value) = value else { continue };
        if let Some(is_local) = classify_origin(value) {
            return Locality {
                is_local,
                basis: format!("{label} '{value}'"),
            };
        }
    }
    Locality {
        is_local: true,
        basis: "default".to_string(),
    }
}

fn classify_origin(value: &str) -> Option<bool> {
    let lower = value.trim().to_ascii_lowercase();
    if let Some(rest) = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
    {
        let host = rest.split(['/', ':']).next().unwrap_or_default();
        return Some(matches!(host, "localhost" | "127.0.0.1"));
    }
    let tokens: Vec<&str> = lower
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '.'))
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.iter().any(|t| REMOTE_MARKERS.contains(t)) {
        return Some(false);
    }
    if tokens.iter().any(|t| LOCAL_MARKERS.contains(t)) {
        return Some(true);
    }
    None
}
