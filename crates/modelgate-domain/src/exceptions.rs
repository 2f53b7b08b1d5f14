//! Time-bound exception resolution.
//!
//! Exceptions are candidate-scoped: the first unexpired exception whose pattern matches any of a
//! failing candidate's aliases suppresses every active violation of that candidate.

use crate::model::{AppliedException, EvaluatedCandidate};
use crate::pattern::PatternCache;
use crate::policy::{ExceptionRule, Policy};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

#[derive(Clone, Debug, PartialEq)]
pub struct ExceptionOutcome {
    pub results: Vec<EvaluatedCandidate>,
    /// Candidates excepted.
    pub exceptions_applied: usize,
    /// Violations moved into suppressed buckets.
    pub suppressed_violations: usize,
}

/// Apply the policy's exceptions to per-candidate results.
///
/// A no-op unless `enforcement.allow_exceptions` is set. `now` is supplied by the caller; the
/// resolver never reads the system clock.
pub fn apply_exceptions(
    policy: &Policy,
    patterns: &PatternCache,
    mut results: Vec<EvaluatedCandidate>,
    now: OffsetDateTime,
) -> ExceptionOutcome {
    let mut exceptions_applied = 0;
    let mut suppressed_violations = 0;

    if policy.enforcement.allow_exceptions && !policy.exceptions.is_empty() {
        for evaluated in &mut results {
            if evaluated.result.violations.is_empty() {
                continue;
            }
            let Some(rule) = policy.exceptions.iter().find(|rule| {
                !is_expired(rule.expires_at.as_deref(), now)
                    && evaluated
                        .record
                        .aliases
                        .iter()
                        .any(|alias| patterns.matches(&rule.model, alias))
            }) else {
                continue;
            };

            suppressed_violations += evaluated.result.violations.len();
            exceptions_applied += 1;
            evaluated.result.suppress(applied(rule));
        }
    }

    ExceptionOutcome {
        results,
        exceptions_applied,
        suppressed_violations,
    }
}

fn applied(rule: &ExceptionRule) -> AppliedException {
    AppliedException {
        pattern: rule.model.clone(),
        reason: rule.reason.clone(),
        approver: rule.approver.clone(),
        expires_at: rule.expires_at.clone(),
    }
}

/// Parse an expiry. A bare `YYYY-MM-DD` expires at the last millisecond of that day, UTC.
pub fn parse_expiry(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(instant);
    }
    let date = Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()?;
    date.with_hms_milli(23, 59, 59, 999)
        .ok()
        .map(|dt| dt.assume_utc())
}

/// Absent means never. An unparseable expiry counts as already expired.
pub fn is_expired(expires_at: Option<&str>, now: OffsetDateTime) -> bool {
    match expires_at.map(str::trim).filter(|s| !s.is_empty()) {
        None => false,
        Some(raw) => match parse_expiry(raw) {
            Some(expiry) => now > expiry,
            None => true,
        },
    }
}
