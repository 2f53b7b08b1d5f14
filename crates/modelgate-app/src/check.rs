//! The `check` use case: parse inputs, evaluate candidates, and build the compliance report.

use anyhow::Context;
use modelgate_domain::model::EvaluationContext;
use modelgate_domain::policy::Policy;
use modelgate_domain::report::{ReportInput, build_report};
use modelgate_domain::PolicyEngine;
use modelgate_render::{ReportFormat, formats_from_names};
use modelgate_settings::PolicyFormat;
use modelgate_types::ComplianceReport;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

pub const COMMAND_CHECK: &str = "check";

/// Context values supplied on the command line. Each one wins over the context file.
#[derive(Clone, Debug, Default)]
pub struct ContextOverrides {
    pub backend: Option<String>,
    pub ram_gb: Option<f64>,
    pub is_local: Option<bool>,
}

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Policy document contents.
    pub policy_text: &'a str,
    pub policy_format: PolicyFormat,
    /// Where the policy came from, recorded in the report.
    pub policy_path: Option<&'a str>,
    /// Candidate list (JSON).
    pub candidates_text: &'a str,
    /// Evaluation context (JSON), if a file was given.
    pub context_text: Option<&'a str>,
    pub overrides: ContextOverrides,
    /// Evaluation instant, used for exception expiry and as `generated_at`.
    pub now: OffsetDateTime,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ComplianceReport,
    /// The validated policy used.
    pub policy: Policy,
}

impl CheckOutput {
    pub fn exit_code(&self) -> i32 {
        self.report.enforcement.exit_code
    }
}

/// Run the check use case: parse policy and inputs, evaluate, resolve enforcement, build report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let policy = modelgate_settings::parse_policy(input.policy_text, input.policy_format)
        .with_context(|| format!("parse policy ({})", input.policy_format))?;
    info!(
        org = %policy.org,
        version = %policy.version,
        mode = policy.mode.as_str(),
        exceptions = policy.exceptions.len(),
        "policy loaded"
    );

    let candidates = modelgate_settings::parse_candidates_json(input.candidates_text)
        .context("parse candidates")?;
    if candidates.is_empty() {
        warn!("candidate list is empty");
    }

    let mut context = match input.context_text {
        Some(text) => modelgate_settings::parse_context_json(text).context("parse context")?,
        None => EvaluationContext::default(),
    };
    apply_overrides(&mut context, input.overrides);
    debug!(
        backend = context.backend.as_deref().unwrap_or("-"),
        ram_gb = context.ram_gb,
        is_local = context.is_local,
        "evaluation context"
    );

    let engine = PolicyEngine::new(&policy);
    let evaluation = engine.run(&candidates, &context, input.now);
    info!(
        total = evaluation.aggregate.total_checked,
        failed = evaluation.aggregate.fail_count,
        patterns = engine.patterns().len(),
        "candidates evaluated"
    );
    if evaluation.exceptions_applied > 0 {
        info!(
            candidates = evaluation.exceptions_applied,
            violations = evaluation.suppressed_violations,
            "exceptions applied"
        );
    }
    info!(
        should_block = evaluation.decision.should_block,
        exit_code = evaluation.decision.exit_code,
        "enforcement decision"
    );

    let runtime = serde_json::to_value(&context).context("serialize evaluation context")?;
    let report = build_report(ReportInput {
        policy: &policy,
        policy_path: input.policy_path.map(str::to_string),
        command: COMMAND_CHECK.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: input.now,
        runtime,
        evaluation: &evaluation,
    });

    Ok(CheckOutput { report, policy })
}

fn apply_overrides(context: &mut EvaluationContext, overrides: ContextOverrides) {
    if overrides.backend.is_some() {
        context.backend = overrides.backend;
    }
    if overrides.ram_gb.is_some() {
        context.ram_gb = overrides.ram_gb;
    }
    if overrides.is_local.is_some() {
        context.is_local = overrides.is_local;
    }
}

/// Formats to write: the explicit request, else the policy's `reporting.formats`, else JSON.
pub fn requested_formats(
    explicit: Option<&str>,
    policy: &Policy,
) -> anyhow::Result<Vec<ReportFormat>> {
    let formats = match explicit {
        Some(name) => formats_from_names(&[name])?,
        None if !policy.reporting.formats.is_empty() => {
            formats_from_names(&policy.reporting.formats)?
        }
        None => vec![ReportFormat::Json],
    };
    Ok(formats)
}
