use crate::checks::utils::{exceeds, fmt_quantity, measured, violation};
use crate::model::{ModelRecord, Violation};
use crate::pattern::PatternCache;
use crate::policy::ModelRules;
use modelgate_types::ids;
use serde_json::{Value, json};

pub fn run(
    record: &ModelRecord,
    rules: &ModelRules,
    patterns: &PatternCache,
    out: &mut Vec<Violation>,
) {
    check_deny(record, rules, patterns, out);
    check_allow(record, rules, patterns, out);
    check_size(record, rules, out);
    check_params(record, rules, out);
    check_quantization(record, rules, patterns, out);
}

fn check_deny(
    record: &ModelRecord,
    rules: &ModelRules,
    patterns: &PatternCache,
    out: &mut Vec<Violation>,
) {
    let Some((pattern, alias)) = patterns.first_match(&rules.deny, &record.aliases) else {
        return;
    };
    out.push(violation(
        ids::CODE_MODEL_DENIED,
        ids::PATH_MODELS_DENY,
        format!("model '{alias}' matches deny pattern '{pattern}'"),
        json!(rules.deny),
        json!(alias),
    ));
}

fn check_allow(
    record: &ModelRecord,
    rules: &ModelRules,
    patterns: &PatternCache,
    out: &mut Vec<Violation>,
) {
    if rules.allow.is_empty() || patterns.first_match(&rules.allow, &record.aliases).is_some() {
        return;
    }
    out.push(violation(
        ids::CODE_MODEL_NOT_ALLOWED,
        ids::PATH_MODELS_ALLOW,
        format!(
            "model '{}' does not match any allow pattern",
            record.display_name()
        ),
        json!(rules.allow),
        json!(record.aliases),
    ));
}

fn check_size(record: &ModelRecord, rules: &ModelRules, out: &mut Vec<Violation>) {
    let Some(max) = rules.max_size_gb else {
        return;
    };
    match measured(record.size_gb) {
        None => out.push(violation(
            ids::CODE_MODEL_SIZE_UNKNOWN,
            ids::PATH_MODELS_MAX_SIZE_GB,
            format!(
                "size of model '{}' is unknown; cannot verify it is within {} GB",
                record.display_name(),
                fmt_quantity(max)
            ),
            json!(max),
            Value::Null,
        )),
        Some(size) if exceeds(size, max) => {
            let derived = if record.size_derived {
                " (estimated from parameters)"
            } else {
                ""
            };
            out.push(violation(
                ids::CODE_MODEL_TOO_LARGE,
                ids::PATH_MODELS_MAX_SIZE_GB,
                format!(
                    "model '{}' is {} GB{derived}, above the {} GB limit",
                    record.display_name(),
                    fmt_quantity(size),
                    fmt_quantity(max)
                ),
                json!(max),
                json!(size),
            ));
        }
        Some(_) => {}
    }
}

fn check_params(record: &ModelRecord, rules: &ModelRules, out: &mut Vec<Violation>) {
    let Some(max) = rules.max_params_b else {
        return;
    };
    match measured(record.params_b) {
        None => out.push(violation(
            ids::CODE_MODEL_PARAMS_UNKNOWN,
            ids::PATH_MODELS_MAX_PARAMS_B,
            format!(
                "parameter count of model '{}' is unknown; cannot verify it is within {}B",
                record.display_name(),
                fmt_quantity(max)
            ),
            json!(max),
            Value::Null,
        )),
        Some(params) if exceeds(params, max) => {
            let derived = if record.params_derived {
                " (estimated from size)"
            } else {
                ""
            };
            out.push(violation(
                ids::CODE_MODEL_TOO_MANY_PARAMS,
                ids::PATH_MODELS_MAX_PARAMS_B,
                format!(
                    "model '{}' has {}B parameters{derived}, above the {}B limit",
                    record.display_name(),
                    fmt_quantity(params),
                    fmt_quantity(max)
                ),
                json!(max),
                json!(params),
            ));
        }
        Some(_) => {}
    }
}

fn check_quantization(
    record: &ModelRecord,
    rules: &ModelRules,
    patterns: &PatternCache,
    out: &mut Vec<Violation>,
) {
    if rules.allowed_quantizations.is_empty() {
        return;
    }
    let Some(quant) = record.quantization.as_deref() else {
        out.push(violation(
            ids::CODE_QUANTIZATION_UNKNOWN,
            ids::PATH_MODELS_ALLOWED_QUANTIZATIONS,
            format!(
                "quantization of model '{}' is unknown",
                record.display_name()
            ),
            json!(rules.allowed_quantizations),
            Value::Null,
        ));
        return;
    };
    let allowed = rules
        .allowed_quantizations
        .iter()
        .any(|p| patterns.matches(p, quant));
    if !allowed {
        out.push(violation(
            ids::CODE_QUANTIZATION_NOT_ALLOWED,
            ids::PATH_MODELS_ALLOWED_QUANTIZATIONS,
            format!(
                "model '{}' uses quantization '{quant}', which is not allowed",
                record.display_name()
            ),
            json!(rules.allowed_quantizations),
            json!(quant),
        ));
    }
}
