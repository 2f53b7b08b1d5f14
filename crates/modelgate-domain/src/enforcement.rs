//! Block/allow resolution from policy settings and the final fail count.

use crate::model::EvaluatedCandidate;
use crate::policy::Policy;
use modelgate_types::{EnforcementDecision, OnViolation, PolicyMode};

pub const DEFAULT_BLOCK_EXIT_CODE: i32 = 1;

/// Counts across every candidate, taken after exception suppression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregateEvaluation {
    pub total_checked: usize,
    pub fail_count: usize,
}

impl AggregateEvaluation {
    pub fn from_results(results: &[EvaluatedCandidate]) -> Self {
        Self {
            total_checked: results.len(),
            fail_count: results.iter().filter(|r| !r.result.pass).count(),
        }
    }

    pub fn pass_count(&self) -> usize {
        self.total_checked - self.fail_count
    }
}

/// Decide whether the run blocks and with which exit code.
///
/// Blocks only under `enforce` with `on_violation != warn` and at least one failure. Audit
/// mode never blocks.
pub fn resolve(policy: &Policy, aggregate: &AggregateEvaluation) -> EnforcementDecision {
    let mode = policy.mode;
    let on_violation = policy.enforcement.on_violation;
    let has_failures = aggregate.fail_count > 0;
    let should_block =
        mode == PolicyMode::Enforce && on_violation != OnViolation::Warn && has_failures;

    let exit_code = if should_block {
        configured_exit_code(policy.enforcement.exit_code)
    } else {
        0
    };

    EnforcementDecision {
        mode,
        on_violation,
        has_failures,
        should_block,
        exit_code,
    }
}

fn configured_exit_code(raw: Option<i64>) -> i32 {
    raw.filter(|code| (1..=255).contains(code))
        .map(|code| code as i32)
        .unwrap_or(DEFAULT_BLOCK_EXIT_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(mode: PolicyMode, on_violation: OnViolation, exit_code: Option<i64>) -> Policy {
        let mut policy = Policy {
            mode,
            ..Policy::default()
        };
        policy.enforcement.on_violation = on_violation;
        policy.enforcement.exit_code = exit_code;
        policy
    }

    fn failing(n: usize) -> AggregateEvaluation {
        AggregateEvaluation {
            total_checked: n + 1,
            fail_count: n,
        }
    }

    #[test]
    fn audit_never_blocks() {
        let decision = resolve(&policy(PolicyMode::Audit, OnViolation::Error, Some(9)), &failing(5));
        assert!(decision.has_failures);
        assert!(!decision.should_block);
        assert_eq!(decision.exit_code, 0);
    }

    #[test]
    fn enforce_blocks_with_default_exit_code() {
        let decision = resolve(&policy(PolicyMode::Enforce, OnViolation::Error, None), &failing(1));
        assert!(decision.should_block);
        assert_eq!(decision.exit_code, 1);
    }

    #[test]
    fn enforce_uses_configured_exit_code() {
        let decision =
            resolve(&policy(PolicyMode::Enforce, OnViolation::Error, Some(42)), &failing(1));
        assert_eq!(decision.exit_code, 42);
    }

    #[test]
    fn out_of_range_exit_code_falls_back() {
        for raw in [0, 256, -3] {
            let decision =
                resolve(&policy(PolicyMode::Enforce, OnViolation::Error, Some(raw)), &failing(1));
            assert_eq!(decision.exit_code, DEFAULT_BLOCK_EXIT_CODE, "raw={raw}");
        }
    }

    #[test]
    fn warn_never_blocks() {
        let decision = resolve(&policy(PolicyMode::Enforce, OnViolation::Warn, Some(3)), &failing(2));
        assert!(!decision.should_block);
        assert_eq!(decision.exit_code, 0);
    }

    #[test]
    fn no_failures_no_block() {
        let decision = resolve(&policy(PolicyMode::Enforce, OnViolation::Error, None), &failing(0));
        assert!(!decision.has_failures);
        assert!(!decision.should_block);
        assert_eq!(decision.exit_code, 0);
    }

    #[test]
    fn pass_count_is_total_minus_failures() {
        assert_eq!(failing(2).pass_count(), 1);
    }
}
