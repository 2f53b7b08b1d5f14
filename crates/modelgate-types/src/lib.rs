//! Stable DTOs and IDs used across the modelgate workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted compliance report
//! - stable violation codes and rule paths
//! - the code → severity / remediation tables
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod report;

pub use explain::{
    ExamplePair, Explanation, lookup_explanation, recommendation_for_code, severity_for_code,
};
pub use report::{
    ComplianceReport, EnforcementDecision, Finding, FindingStatus, OnViolation, PolicyMode,
    PolicySummary, ReportSummary, SCHEMA_COMPLIANCE_V1, Severity, ToolMeta, ViolationCount,
};
