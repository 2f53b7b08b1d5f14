use thiserror::Error;

/// Reasons a policy document is refused.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("policy document must be a mapping at the top level")]
    NotAMapping,

    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("invalid mode `{0}` (expected audit|enforce)")]
    InvalidMode(String),

    #[error("invalid enforcement.on_violation `{0}` (expected error|warn)")]
    InvalidOnViolation(String),

    #[error("invalid enforcement.exit_code `{0}` (expected an integer in 1..=255)")]
    InvalidExitCode(String),

    #[error("empty pattern at {path}[{index}]")]
    EmptyPattern { path: &'static str, index: usize },

    #[error("exceptions[{index}] has no model pattern")]
    MissingExceptionModel { index: usize },

    #[error("exceptions[{index}].expires_at `{value}` is not YYYY-MM-DD or RFC 3339")]
    InvalidExpiry { index: usize, value: String },

    #[error("unknown report format `{0}` (expected json|csv|sarif|all)")]
    UnknownReportFormat(String),

    #[error("policy document has the wrong shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Reasons a candidate list or evaluation context is refused.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of candidates, or an object with a `candidates` or `models` array")]
    NotACandidateList,

    #[error("candidate #{index} is not an object")]
    CandidateNotObject { index: usize },
}
