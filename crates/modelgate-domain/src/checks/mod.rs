use crate::model::{EvaluationContext, ModelRecord, Violation};
use crate::pattern::PatternCache;
use crate::policy::Policy;

mod compliance;
mod models;
mod runtime;
mod utils;

#[cfg(test)]
mod tests;

pub use runtime::{Locality, infer_locality};

/// Run every rule group in fixed order: models, runtime, compliance.
///
/// Groups never short-circuit, so one call surfaces every violation.
pub fn run_all(
    record: &ModelRecord,
    context: &EvaluationContext,
    policy: &Policy,
    patterns: &PatternCache,
    out: &mut Vec<Violation>,
) {
    models::run(record, &policy.rules.models, patterns, out);
    runtime::run(record, context, &policy.rules.runtime, out);
    compliance::run(record, &policy.rules.compliance, patterns, out);
}
