//! Stable identifiers for violation codes and the policy rule paths that produce them.
//!
//! `code` is a SCREAMING_SNAKE discriminator. `path` is the dotted location of the rule in the
//! policy document.

// Codes: rules.models
pub const CODE_MODEL_DENIED: &str = "MODEL_DENIED";
pub const CODE_MODEL_NOT_ALLOWED: &str = "MODEL_NOT_ALLOWED";
pub const CODE_MODEL_TOO_LARGE: &str = "MODEL_TOO_LARGE";
pub const CODE_MODEL_SIZE_UNKNOWN: &str = "MODEL_SIZE_UNKNOWN";
pub const CODE_MODEL_TOO_MANY_PARAMS: &str = "MODEL_TOO_MANY_PARAMS";
pub const CODE_MODEL_PARAMS_UNKNOWN: &str = "MODEL_PARAMS_UNKNOWN";
pub const CODE_QUANTIZATION_NOT_ALLOWED: &str = "QUANTIZATION_NOT_ALLOWED";
pub const CODE_QUANTIZATION_UNKNOWN: &str = "QUANTIZATION_UNKNOWN";

// Codes: rules.runtime
pub const CODE_BACKEND_NOT_ALLOWED: &str = "BACKEND_NOT_ALLOWED";
pub const CODE_BACKEND_UNKNOWN: &str = "BACKEND_UNKNOWN";
pub const CODE_INSUFFICIENT_RAM: &str = "INSUFFICIENT_RAM";
pub const CODE_RAM_UNKNOWN: &str = "RAM_UNKNOWN";
pub const CODE_MODEL_NOT_LOCAL: &str = "MODEL_NOT_LOCAL";

// Codes: rules.compliance
pub const CODE_LICENSE_NOT_APPROVED: &str = "LICENSE_NOT_APPROVED";
pub const CODE_LICENSE_MISSING: &str = "LICENSE_MISSING";

// Rule paths
pub const PATH_MODELS_DENY: &str = "rules.models.deny";
pub const PATH_MODELS_ALLOW: &str = "rules.models.allow";
pub const PATH_MODELS_MAX_SIZE_GB: &str = "rules.models.max_size_gb";
pub const PATH_MODELS_MAX_PARAMS_B: &str = "rules.models.max_params_b";
pub const PATH_MODELS_ALLOWED_QUANTIZATIONS: &str = "rules.models.allowed_quantizations";
pub const PATH_RUNTIME_BACKENDS: &str = "rules.runtime.backends";
pub const PATH_RUNTIME_MIN_RAM_GB: &str = "rules.runtime.min_ram_gb";
pub const PATH_RUNTIME_REQUIRE_LOCAL: &str = "rules.runtime.require_local";
pub const PATH_COMPLIANCE_APPROVED_LICENSES: &str = "rules.compliance.approved_licenses";

// Rationale / report markers
pub const RATIONALE_EXCEPTION_APPLIED: &str = "EXCEPTION_APPLIED";
pub const CODE_NO_VIOLATIONS: &str = "NO_VIOLATIONS";

/// Placeholder for identity fields that could not be resolved from a candidate.
pub const UNKNOWN: &str = "unknown";
