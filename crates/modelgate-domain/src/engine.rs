use crate::checks;
use crate::enforcement::{self, AggregateEvaluation};
use crate::exceptions::{self, ExceptionOutcome};
use crate::model::{Candidate, EvaluatedCandidate, EvaluationContext, ModelRecord, PolicyResult};
use crate::pattern::PatternCache;
use crate::policy::Policy;
use crate::resolve::resolve_candidate;
use modelgate_types::EnforcementDecision;
use rayon::prelude::*;
use time::OffsetDateTime;

/// Policy bound to its own pattern cache.
///
/// Cheap to build; one per policy. Cache state never crosses engines, so several policies can be
/// evaluated side by side in one process.
#[derive(Debug)]
pub struct PolicyEngine<'p> {
    policy: &'p Policy,
    patterns: PatternCache,
}

/// Outcome of a full run, after exceptions and enforcement.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchEvaluation {
    pub results: Vec<EvaluatedCandidate>,
    pub exceptions_applied: usize,
    pub suppressed_violations: usize,
    pub aggregate: AggregateEvaluation,
    pub decision: EnforcementDecision,
}

impl<'p> PolicyEngine<'p> {
    pub fn new(policy: &'p Policy) -> Self {
        Self {
            policy,
            patterns: PatternCache::new(),
        }
    }

    pub fn policy(&self) -> &'p Policy {
        self.policy
    }

    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    pub fn evaluate(&self, candidate: &Candidate, context: &EvaluationContext) -> PolicyResult {
        self.evaluate_record(&resolve_candidate(candidate), context)
    }

    pub fn evaluate_record(&self, record: &ModelRecord, context: &EvaluationContext) -> PolicyResult {
        let mut violations = Vec::new();
        checks::run_all(record, context, self.policy, &self.patterns, &mut violations);
        PolicyResult::from_violations(self.policy.mode, violations)
    }

    /// Evaluate every candidate. Runs in parallel; output keeps input order.
    pub fn evaluate_batch(
        &self,
        candidates: &[Candidate],
        context: &EvaluationContext,
    ) -> Vec<EvaluatedCandidate> {
        candidates
            .par_iter()
            .map(|candidate| {
                let record = resolve_candidate(candidate);
                let result = self.evaluate_record(&record, context);
                EvaluatedCandidate { record, result }
            })
            .collect()
    }

    pub fn apply_exceptions(
        &self,
        results: Vec<EvaluatedCandidate>,
        now: OffsetDateTime,
    ) -> ExceptionOutcome {
        exceptions::apply_exceptions(self.policy, &self.patterns, results, now)
    }

    /// Evaluate, apply exceptions, then resolve enforcement on the final fail count.
    pub fn run(
        &self,
        candidates: &[Candidate],
        context: &EvaluationContext,
        now: OffsetDateTime,
    ) -> BatchEvaluation {
        let evaluated = self.evaluate_batch(candidates, context);
        let ExceptionOutcome {
            results,
            exceptions_applied,
            suppressed_violations,
        } = self.apply_exceptions(evaluated, now);

        let aggregate = AggregateEvaluation::from_results(&results);
        let decision = enforcement::resolve(self.policy, &aggregate);

        BatchEvaluation {
            results,
            exceptions_applied,
            suppressed_violations,
            aggregate,
            decision,
        }
    }
}

/// One-shot evaluation of a single candidate with a fresh cache.
pub fn evaluate(candidate: &Candidate, context: &EvaluationContext, policy: &Policy) -> PolicyResult {
    PolicyEngine::new(policy).evaluate(candidate, context)
}
