//! Pure policy evaluation (no IO).
//!
//! Input: a policy, candidate records and an evaluation context constructed elsewhere.
//! Output: per-candidate results, an enforcement decision and a compliance report.

#![forbid(unsafe_code)]

pub mod checks;
pub mod enforcement;
pub mod exceptions;
pub mod findings;
pub mod fingerprint;
pub mod model;
pub mod pattern;
pub mod policy;
pub mod report;
pub mod resolve;

mod engine;

pub use engine::{BatchEvaluation, PolicyEngine, evaluate};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;
