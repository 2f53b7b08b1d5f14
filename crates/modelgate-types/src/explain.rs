//! Explain registry for violation codes.
//!
//! Maps codes to severities, one-line recommendations, and longer explanations with
//! before/after policy examples.

use crate::ids;
use crate::report::Severity;

/// Explanation entry for a violation code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the code.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to resolve the violation.
    pub remediation: &'static str,
    /// Before/after examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Candidate or policy that triggers the violation.
    pub before: &'static str,
    /// Candidate or policy that passes.
    pub after: &'static str,
}

/// Severity assigned to findings with the given code. Unmapped codes are `medium`.
pub fn severity_for_code(code: &str) -> Severity {
    match code {
        ids::CODE_MODEL_DENIED => Severity::Critical,

        ids::CODE_MODEL_NOT_ALLOWED
        | ids::CODE_MODEL_NOT_LOCAL
        | ids::CODE_LICENSE_NOT_APPROVED
        | ids::CODE_LICENSE_MISSING => Severity::High,

        ids::CODE_QUANTIZATION_NOT_ALLOWED
        | ids::CODE_QUANTIZATION_UNKNOWN
        | ids::CODE_BACKEND_UNKNOWN
        | ids::CODE_RAM_UNKNOWN => Severity::Low,

        _ => Severity::Medium,
    }
}

/// Fixed remediation string attached to every finding with the given code.
pub fn recommendation_for_code(code: &str) -> &'static str {
    match code {
        ids::CODE_MODEL_DENIED => {
            "Select a different model; this one matches an organization deny pattern."
        }
        ids::CODE_MODEL_NOT_ALLOWED => {
            "Select a model from the allow list or ask a policy owner to extend it."
        }
        ids::CODE_MODEL_TOO_LARGE => {
            "Choose a smaller model or a more aggressive quantization within the size ceiling."
        }
        ids::CODE_MODEL_SIZE_UNKNOWN => {
            "Provide size_gb (or params_b with quantization) for the candidate so size can be verified."
        }
        ids::CODE_MODEL_TOO_MANY_PARAMS => {
            "Choose a model with fewer parameters than the policy ceiling."
        }
        ids::CODE_MODEL_PARAMS_UNKNOWN => {
            "Provide params_b (or size_gb with quantization) for the candidate so parameter count can be verified."
        }
        ids::CODE_QUANTIZATION_NOT_ALLOWED => {
            "Use one of the quantizations approved by the policy."
        }
        ids::CODE_QUANTIZATION_UNKNOWN => {
            "Record the candidate's quantization so it can be checked against the allow list."
        }
        ids::CODE_BACKEND_NOT_ALLOWED => "Run the model on one of the backends required by policy.",
        ids::CODE_BACKEND_UNKNOWN => {
            "Supply the resolved inference backend in the evaluation context."
        }
        ids::CODE_INSUFFICIENT_RAM => {
            "Run on a host with more memory or lower the model footprint."
        }
        ids::CODE_RAM_UNKNOWN => "Supply available RAM in the evaluation context.",
        ids::CODE_MODEL_NOT_LOCAL => {
            "Use a locally hosted model; remote inference is not permitted by policy."
        }
        ids::CODE_LICENSE_NOT_APPROVED => {
            "Select a model whose license is on the approved list or request legal review."
        }
        ids::CODE_LICENSE_MISSING => {
            "Record the candidate's license so it can be checked against the approved list."
        }
        _ => "Review the policy rule that produced this finding.",
    }
}

/// Look up an explanation by code. Lookup is case-insensitive.
///
/// Returns `None` if the code is not recognized.
pub fn lookup_explanation(code: &str) -> Option<Explanation> {
    let upper = code.trim().to_ascii_uppercase();
    match upper.as_str() {
        ids::CODE_MODEL_DENIED => Some(explain_model_denied()),
        ids::CODE_MODEL_NOT_ALLOWED => Some(explain_model_not_allowed()),
        ids::CODE_MODEL_TOO_LARGE => Some(explain_model_too_large()),
        ids::CODE_MODEL_SIZE_UNKNOWN => Some(explain_model_size_unknown()),
        ids::CODE_MODEL_TOO_MANY_PARAMS => Some(explain_model_too_many_params()),
        ids::CODE_MODEL_PARAMS_UNKNOWN => Some(explain_model_params_unknown()),
        ids::CODE_QUANTIZATION_NOT_ALLOWED => Some(explain_quantization_not_allowed()),
        ids::CODE_QUANTIZATION_UNKNOWN => Some(explain_quantization_unknown()),
        ids::CODE_BACKEND_NOT_ALLOWED => Some(explain_backend_not_allowed()),
        ids::CODE_BACKEND_UNKNOWN => Some(explain_backend_unknown()),
        ids::CODE_INSUFFICIENT_RAM => Some(explain_insufficient_ram()),
        ids::CODE_RAM_UNKNOWN => Some(explain_ram_unknown()),
        ids::CODE_MODEL_NOT_LOCAL => Some(explain_model_not_local()),
        ids::CODE_LICENSE_NOT_APPROVED => Some(explain_license_not_approved()),
        ids::CODE_LICENSE_MISSING => Some(explain_license_missing()),
        _ => None,
    }
}

/// List all known codes, in rule evaluation order.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MODEL_DENIED,
        ids::CODE_MODEL_NOT_ALLOWED,
        ids::CODE_MODEL_TOO_LARGE,
        ids::CODE_MODEL_SIZE_UNKNOWN,
        ids::CODE_MODEL_TOO_MANY_PARAMS,
        ids::CODE_MODEL_PARAMS_UNKNOWN,
        ids::CODE_QUANTIZATION_NOT_ALLOWED,
        ids::CODE_QUANTIZATION_UNKNOWN,
        ids::CODE_BACKEND_NOT_ALLOWED,
        ids::CODE_BACKEND_UNKNOWN,
        ids::CODE_INSUFFICIENT_RAM,
        ids::CODE_RAM_UNKNOWN,
        ids::CODE_MODEL_NOT_LOCAL,
        ids::CODE_LICENSE_NOT_APPROVED,
        ids::CODE_LICENSE_MISSING,
    ]
}

// --- Model rules ---

fn explain_model_denied() -> Explanation {
    Explanation {
        title: "Model Denied",
        description: "\
One of the candidate's identifiers (model, name, tag, id, ...) matches a pattern in
`rules.models.deny`.

Deny patterns take precedence over everything else in the model rule group. A candidate
that matches any deny pattern is reported even if it also matches the allow list.",
        remediation: "\
Pick a model that does not match any deny pattern. If the match is a false positive,
narrow the pattern, or add a time-bound exception with an approver:

    exceptions:
      - model: \"llama3:8b-uncensored\"
        reason: \"red-team evaluation\"
        approver: \"security@example.com\"
        expires_at: \"2026-12-31\"",
        examples: ExamplePair {
            before: r#"rules:
  models:
    deny: ["*uncensored*"]
# candidate: { "tag": "model:7b-uncensored" }"#,
            after: r#"rules:
  models:
    deny: ["*uncensored*"]
# candidate: { "tag": "model:7b-instruct" }"#,
        },
    }
}

fn explain_model_not_allowed() -> Explanation {
    Explanation {
        title: "Model Not On Allow List",
        description: "\
`rules.models.allow` is configured and none of the candidate's identifiers match any of its
patterns.

An empty or absent allow list disables this rule; a configured list turns model selection
into an explicit opt-in.",
        remediation: "\
Choose a model covered by the allow list, or extend the list:

    rules:
      models:
        allow: [\"llama3*\", \"mistral*\", \"qwen2.5*\"]",
        examples: ExamplePair {
            before: r#"rules:
  models:
    allow: ["llama3*"]
# candidate: { "model": "phi3:mini" }"#,
            after: r#"rules:
  models:
    allow: ["llama3*", "phi3*"]
# candidate: { "model": "phi3:mini" }"#,
        },
    }
}

fn explain_model_too_large() -> Explanation {
    Explanation {
        title: "Model Too Large",
        description: "\
The candidate's on-disk size exceeds `rules.models.max_size_gb`.

When the candidate has no explicit size, it is derived from the parameter count and the
bytes-per-parameter of its quantization family (Q4 when quantization is unknown).",
        remediation: "\
Select a smaller model or a lower-precision quantization of the same model, or raise the
ceiling if the deployment hardware allows it.",
        examples: ExamplePair {
            before: r#"rules:
  models:
    max_size_gb: 4
# candidate: { "model": "llama3:70b", "size_gb": 39.9 }"#,
            after: r#"rules:
  models:
    max_size_gb: 4
# candidate: { "model": "llama3:8b", "size_gb": 3.8 }"#,
        },
    }
}

fn explain_model_size_unknown() -> Explanation {
    Explanation {
        title: "Model Size Unknown",
        description: "\
`rules.models.max_size_gb` is configured but the candidate's size could not be determined:
no size field is present and no parameter count is available to derive it from.

Missing data is treated as a failure, not a pass. A candidate that cannot prove it fits
under the ceiling does not satisfy the rule.",
        remediation: "\
Supply `size_gb` (or `size_bytes`) on the candidate, or `params_b` together with its
quantization so the size can be derived.",
        examples: ExamplePair {
            before: r#"# candidate
{ "model": "mystery-model" }"#,
            after: r#"# candidate
{ "model": "mystery-model", "size_gb": 3.2 }"#,
        },
    }
}

fn explain_model_too_many_params() -> Explanation {
    Explanation {
        title: "Too Many Parameters",
        description: "\
The candidate's parameter count (in billions) exceeds `rules.models.max_params_b`.",
        remediation: "\
Select a model with fewer parameters, or raise the ceiling if the deployment can support
larger models.",
        examples: ExamplePair {
            before: r#"rules:
  models:
    max_params_b: 6
# candidate: { "model": "mistral:7b", "params_b": 7 }"#,
            after: r#"rules:
  models:
    max_params_b: 6
# candidate: { "model": "phi3:mini", "params_b": 3.8 }"#,
        },
    }
}

fn explain_model_params_unknown() -> Explanation {
    Explanation {
        title: "Parameter Count Unknown",
        description: "\
`rules.models.max_params_b` is configured but the candidate's parameter count could not be
determined: no parameter field is present and no size is available to derive it from.

As with size, missing data fails the rule.",
        remediation: "\
Supply `params_b` (or a raw `parameters` count, or a `\"7B\"`-style `parameter_size`) on the
candidate.",
        examples: ExamplePair {
            before: r#"# candidate
{ "model": "mystery-model" }"#,
            after: r#"# candidate
{ "model": "mystery-model", "params_b": 3 }"#,
        },
    }
}

fn explain_quantization_not_allowed() -> Explanation {
    Explanation {
        title: "Quantization Not Allowed",
        description: "\
The candidate's quantization does not match any pattern in
`rules.models.allowed_quantizations`. Matching is case-insensitive and supports `*`.",
        remediation: "\
Pull a variant of the model with an approved quantization, or add the quantization to the
allow list.",
        examples: ExamplePair {
            before: r#"rules:
  models:
    allowed_quantizations: ["Q4_*", "Q5_*"]
# candidate: { "model": "llama3:8b", "quantization": "F16" }"#,
            after: r#"rules:
  models:
    allowed_quantizations: ["Q4_*", "Q5_*"]
# candidate: { "model": "llama3:8b", "quantization": "Q4_K_M" }"#,
        },
    }
}

fn explain_quantization_unknown() -> Explanation {
    Explanation {
        title: "Quantization Unknown",
        description: "\
`rules.models.allowed_quantizations` is configured but the candidate has no quantization
field, so the rule cannot be satisfied.",
        remediation: "\
Record the quantization on the candidate (`quantization`, `quant`, or
`details.quantization_level`).",
        examples: ExamplePair {
            before: r#"# candidate
{ "model": "llama3:8b" }"#,
            after: r#"# candidate
{ "model": "llama3:8b", "quantization": "Q4_K_M" }"#,
        },
    }
}

// --- Runtime rules ---

fn explain_backend_not_allowed() -> Explanation {
    Explanation {
        title: "Backend Not Allowed",
        description: "\
The inference backend resolved for this run is not one of `rules.runtime.backends`.
Comparison is case-insensitive.",
        remediation: "\
Run on a permitted backend, or extend the backend list if the new backend has been
approved.",
        examples: ExamplePair {
            before: r#"rules:
  runtime:
    backends: ["cuda", "metal"]
# context: { "backend": "cpu" }"#,
            after: r#"rules:
  runtime:
    backends: ["cuda", "metal"]
# context: { "backend": "cuda" }"#,
        },
    }
}

fn explain_backend_unknown() -> Explanation {
    Explanation {
        title: "Backend Unknown",
        description: "\
`rules.runtime.backends` is configured but neither the evaluation context nor the candidate
names a backend.",
        remediation: "\
Pass the resolved backend in the evaluation context (`--backend` or the context file).",
        examples: ExamplePair {
            before: r#"# context
{ "ram_gb": 32 }"#,
            after: r#"# context
{ "ram_gb": 32, "backend": "cuda" }"#,
        },
    }
}

fn explain_insufficient_ram() -> Explanation {
    Explanation {
        title: "Insufficient RAM",
        description: "\
The host's available RAM reported in the evaluation context is below
`rules.runtime.min_ram_gb`.",
        remediation: "\
Run on a host that meets the memory floor, or lower the floor if the selected models are
small enough.",
        examples: ExamplePair {
            before: r#"rules:
  runtime:
    min_ram_gb: 16
# context: { "ram_gb": 8 }"#,
            after: r#"rules:
  runtime:
    min_ram_gb: 16
# context: { "ram_gb": 32 }"#,
        },
    }
}

fn explain_ram_unknown() -> Explanation {
    Explanation {
        title: "RAM Unknown",
        description: "\
`rules.runtime.min_ram_gb` is configured but the evaluation context does not report
available RAM.",
        remediation: "\
Pass available RAM in the evaluation context (`--ram-gb` or the context file).",
        examples: ExamplePair {
            before: r#"# context
{ "backend": "cuda" }"#,
            after: r#"# context
{ "backend": "cuda", "ram_gb": 32 }"#,
        },
    }
}

fn explain_model_not_local() -> Explanation {
    Explanation {
        title: "Model Not Local",
        description: "\
`rules.runtime.require_local` is true and the candidate is not served locally.

Locality comes from an explicit `is_local` flag on the candidate, then the context's
`is_local`, then the candidate's source/type (for example `openai` or an `https://` endpoint
is remote, `ollama` is local). When nothing indicates otherwise the candidate is local.",
        remediation: "\
Use a locally hosted model, or relax `require_local` for this environment.",
        examples: ExamplePair {
            before: r#"rules:
  runtime:
    require_local: true
# candidate: { "model": "gpt-4o", "source": "openai" }"#,
            after: r#"rules:
  runtime:
    require_local: true
# candidate: { "model": "llama3:8b", "source": "ollama" }"#,
        },
    }
}

// --- Compliance rules ---

fn explain_license_not_approved() -> Explanation {
    Explanation {
        title: "License Not Approved",
        description: "\
The candidate's license is not in `rules.compliance.approved_licenses`. License values are
compared case-insensitively and approved entries may use `*`.",
        remediation: "\
Select a model with an approved license, or get the license reviewed and added to the
approved list.",
        examples: ExamplePair {
            before: r#"rules:
  compliance:
    approved_licenses: ["apache-2.0", "mit"]
# candidate: { "model": "some-model", "license": "cc-by-nc-4.0" }"#,
            after: r#"rules:
  compliance:
    approved_licenses: ["apache-2.0", "mit"]
# candidate: { "model": "some-model", "license": "Apache-2.0" }"#,
        },
    }
}

fn explain_license_missing() -> Explanation {
    Explanation {
        title: "License Missing",
        description: "\
`rules.compliance.approved_licenses` is configured but the candidate carries no license
metadata. A model with unknown licensing terms cannot be approved.",
        remediation: "\
Record the license on the candidate (`license`, `licence`, or `license_id`).",
        examples: ExamplePair {
            before: r#"# candidate
{ "model": "some-model" }"#,
            after: r#"# candidate
{ "model": "some-model", "license": "mit" }"#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_code() {
        assert!(lookup_explanation(ids::CODE_MODEL_DENIED).is_some());
        assert!(lookup_explanation(ids::CODE_MODEL_SIZE_UNKNOWN).is_some());
        assert!(lookup_explanation(ids::CODE_LICENSE_MISSING).is_some());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(lookup_explanation("model_denied").is_some());
        assert!(lookup_explanation("  Ram_Unknown ").is_some());
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("NOT_A_CODE").is_none());
    }

    #[test]
    fn all_codes_are_valid() {
        for code in all_codes() {
            assert!(
                lookup_explanation(code).is_some(),
                "code {} should be in registry",
                code
            );
        }
    }

    #[test]
    fn severity_table() {
        assert_eq!(severity_for_code(ids::CODE_MODEL_DENIED), Severity::Critical);
        assert_eq!(severity_for_code(ids::CODE_LICENSE_MISSING), Severity::High);
        assert_eq!(severity_for_code(ids::CODE_MODEL_TOO_LARGE), Severity::Medium);
        assert_eq!(severity_for_code(ids::CODE_RAM_UNKNOWN), Severity::Low);
        assert_eq!(severity_for_code("SOMETHING_NEW"), Severity::Medium);
    }

    #[test]
    fn every_code_has_a_specific_recommendation() {
        let fallback = recommendation_for_code("SOMETHING_NEW");
        for code in all_codes() {
            assert_ne!(recommendation_for_code(code), fallback, "{code}");
        }
    }
}
