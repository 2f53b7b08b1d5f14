//! Candidate alias resolution.
//!
//! Each logical field has a fixed, ordered list of accepted keys. The first present, non-empty
//! value wins. Resolution happens once per candidate, before any rule runs.

use crate::model::{Candidate, ModelRecord};
use serde_json::Value;

pub const ID_ALIASES: &[&str] = &[
    "model",
    "name",
    "tag",
    "id",
    "model_id",
    "modelId",
    "ollama_tag",
    "hf_repo",
    "repo",
];
pub const SIZE_GB_ALIASES: &[&str] = &[
    "size_gb",
    "sizeGb",
    "sizeGB",
    "file_size_gb",
    "disk_size_gb",
    "model_size_gb",
];
pub const SIZE_BYTES_ALIASES: &[&str] = &["size_bytes", "sizeBytes", "file_size", "size"];
pub const PARAMS_B_ALIASES: &[&str] = &[
    "params_b",
    "paramsB",
    "parameters_b",
    "param_count_b",
    "parameter_size",
    "details.parameter_size",
];
pub const PARAMS_RAW_ALIASES: &[&str] = &["params", "parameters", "parameter_count", "num_params"];
pub const QUANTIZATION_ALIASES: &[&str] = &[
    "quantization",
    "quant",
    "quantization_level",
    "details.quantization_level",
];
pub const LICENSE_ALIASES: &[&str] = &["license", "licence", "license_id", "details.license"];
pub const SOURCE_ALIASES: &[&str] = &["source", "provider", "origin"];
pub const REGISTRY_ALIASES: &[&str] = &["registry"];
pub const VERSION_ALIASES: &[&str] = &["version", "revision"];
pub const DIGEST_ALIASES: &[&str] = &["digest", "sha256"];
pub const LOCAL_FLAG_ALIASES: &[&str] = &["is_local", "isLocal", "local"];
pub const DEPLOYMENT_ALIASES: &[&str] = &["type", "kind", "deployment"];
pub const BACKEND_ALIASES: &[&str] = &["backend", "runtime"];

const BYTES_PER_GB: f64 = 1_000_000_000.0;

/// Quantization families with distinct storage cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantFamily {
    F32,
    F16,
    Q8,
    Q6,
    Q5,
    Q4,
    Q3,
    Q2,
}

impl QuantFamily {
    /// Classify a quantization label (`Q4_K_M`, `iq3_xs`, `bf16`, `int8`, ...).
    pub fn classify(label: &str) -> Option<Self> {
        let upper = label.trim().to_ascii_uppercase();
        let upper = match upper.strip_prefix('I') {
            Some(rest) if rest.starts_with('Q') => rest.to_string(),
            _ => upper,
        };
        let family = if upper.starts_with("F32") || upper.starts_with("FP32") {
            QuantFamily::F32
        } else if upper.starts_with("F16") || upper.starts_with("FP16") || upper.starts_with("BF16")
        {
            QuantFamily::F16
        } else if upper.starts_with("Q8") || upper.starts_with("INT8") {
            QuantFamily::Q8
        } else if upper.starts_with("Q6") {
            QuantFamily::Q6
        } else if upper.starts_with("Q5") {
            QuantFamily::Q5
        } else if upper.starts_with("Q4") || upper.starts_with("INT4") {
            QuantFamily::Q4
        } else if upper.starts_with("Q3") {
            QuantFamily::Q3
        } else if upper.starts_with("Q2") {
            QuantFamily::Q2
        } else {
            return None;
        };
        Some(family)
    }

    pub fn bytes_per_param(self) -> f64 {
        match self {
            QuantFamily::F32 => 4.0,
            QuantFamily::F16 => 2.0,
            QuantFamily::Q8 => 1.0,
            QuantFamily::Q6 => 0.75,
            QuantFamily::Q5 => 0.625,
            QuantFamily::Q4 => 0.5,
            QuantFamily::Q3 => 0.375,
            QuantFamily::Q2 => 0.25,
        }
    }
}

/// Bytes per parameter for a quantization; unknown or unrecognized labels use Q4.
pub fn bytes_per_param(quantization: Option<&str>) -> f64 {
    quantization
        .and_then(QuantFamily::classify)
        .unwrap_or(QuantFamily::Q4)
        .bytes_per_param()
}

pub fn resolve_candidate(candidate: &Candidate) -> ModelRecord {
    let mut aliases: Vec<String> = Vec::new();
    for key in ID_ALIASES {
        if let Some(value) = string_value(candidate.get(key))
            && !aliases.contains(&value)
        {
            aliases.push(value);
        }
    }

    let quantization = first_string(candidate, QUANTIZATION_ALIASES);
    let explicit_size = first_number(candidate, SIZE_GB_ALIASES)
        .or_else(|| first_number(candidate, SIZE_BYTES_ALIASES).map(|b| b / BYTES_PER_GB));
    let explicit_params = first_params(candidate);

    let bpp = bytes_per_param(quantization.as_deref());
    let (size_gb, size_derived) = match (explicit_size, explicit_params) {
        (Some(size), _) => (Some(size), false),
        (None, Some(params)) => (Some(params * bpp), true),
        (None, None) => (None, false),
    };
    let (params_b, params_derived) = match (explicit_params, explicit_size) {
        (Some(params), _) => (Some(params), false),
        (None, Some(size)) => (Some(size / bpp), true),
        (None, None) => (None, false),
    };

    ModelRecord {
        id: aliases.first().cloned(),
        aliases,
        size_gb,
        size_derived,
        params_b,
        params_derived,
        quantization,
        license: first_string(candidate, LICENSE_ALIASES),
        source: first_string(candidate, SOURCE_ALIASES),
        registry: first_string(candidate, REGISTRY_ALIASES),
        version: first_string(candidate, VERSION_ALIASES),
        digest: first_string(candidate, DIGEST_ALIASES),
        is_local: first_bool(candidate, LOCAL_FLAG_ALIASES),
        deployment: first_string(candidate, DEPLOYMENT_ALIASES),
        backend: first_string(candidate, BACKEND_ALIASES),
    }
}

fn first_string(candidate: &Candidate, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|key| string_value(candidate.get(key)))
}

fn string_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_number(candidate: &Candidate, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .find_map(|key| number_value(candidate.get(key)))
}

fn number_value(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

/// Parameter count in billions from either alias family.
fn first_params(candidate: &Candidate) -> Option<f64> {
    let billions = PARAMS_B_ALIASES.iter().find_map(|key| match candidate.get(key)? {
        Value::String(s) => parse_scaled(s, 1.0),
        other => number_value(Some(other)),
    });
    billions.or_else(|| {
        PARAMS_RAW_ALIASES
            .iter()
            .find_map(|key| match candidate.get(key)? {
                Value::String(s) => parse_scaled(s, 1.0 / BYTES_PER_GB),
                other => number_value(Some(other)).map(|n| n / BYTES_PER_GB),
            })
    })
}

/// Parse `"7B"`, `"500M"`, `"1.5T"`, `"8k"` into billions. A bare number is multiplied by
/// `bare_scale`.
pub fn parse_scaled(raw: &str, bare_scale: f64) -> Option<f64> {
    let s = raw.trim();
    let (digits, scale) = match s.chars().last()? {
        'T' | 't' => (&s[..s.len() - 1], 1_000.0),
        'B' | 'b' => (&s[..s.len() - 1], 1.0),
        'M' | 'm' => (&s[..s.len() - 1], 0.001),
        'K' | 'k' => (&s[..s.len() - 1], 0.000_001),
        _ => (s, bare_scale),
    };
    let n = digits.trim().parse::<f64>().ok()?;
    (n.is_finite() && n >= 0.0).then_some(n * scale)
}

fn first_bool(candidate: &Candidate, aliases: &[&str]) -> Option<bool> {
    aliases.iter().find_map(|key| match candidate.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}
