//! Use case orchestration for modelgate.
//!
//! This crate provides the application layer: use cases that coordinate the settings, domain,
//! and render layers. It is intentionally thin and delegates heavy lifting to those layers.
//!
//! The CLI crate depends on this; it only handles argument parsing, file reads, and exit codes.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;

pub use check::{CheckInput, CheckOutput, ContextOverrides, requested_formats, run_check};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{
    artifact_path, parse_report_json, render_report, summary_line, write_artifacts, write_text,
};
