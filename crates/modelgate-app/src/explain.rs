//! The `explain` use case: look up violation code documentation.

use modelgate_types::explain::{self, Explanation};
use modelgate_types::{recommendation_for_code, severity_for_code};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the code.
    Found { code: String, explanation: Explanation },
    /// Unknown code; includes the known codes.
    NotFound {
        identifier: String,
        available_codes: &'static [&'static str],
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(explanation) => ExplainOutput::Found {
            code: identifier.trim().to_ascii_uppercase(),
            explanation,
        },
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(code: &str, exp: &Explanation) -> String {
    let mut out = String::new();

    let heading = format!("{code}: {}", exp.title);
    out.push_str(&heading);
    out.push('\n');
    out.push_str(&"=".repeat(heading.len()));
    out.push_str("\n\n");
    out.push_str(&format!("Severity: {}\n\n", severity_for_code(code).as_str()));
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push('\n');
    out.push_str(recommendation_for_code(code));
    out.push_str("\n\n");
    out.push_str("Examples\n");
    out.push_str("--------\n\n");
    out.push_str("Before (violation):\n");
    out.push_str("```yaml\n");
    out.push_str(exp.examples.before);
    out.push('\n');
    out.push_str("```\n\n");
    out.push_str("After (passes):\n");
    out.push_str("```yaml\n");
    out.push_str(exp.examples.after);
    out.push('\n');
    out.push_str("```\n");

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, codes: &[&'static str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown violation code: {identifier}\n\n"));
    out.push_str("Available codes:\n");
    for code in codes {
        out.push_str(&format!("  - {code}\n"));
    }

    out
}
