use crate::checks::utils::violation;
use crate::model::{ModelRecord, Violation};
use crate::pattern::PatternCache;
use crate::policy::ComplianceRules;
use modelgate_types::ids;
use serde_json::{Value, json};

pub fn run(
    record: &ModelRecord,
    rules: &ComplianceRules,
    patterns: &PatternCache,
    out: &mut Vec<Violation>,
) {
    if rules.approved_licenses.is_empty() {
        return;
    }

    let Some(license) = record.license.as_deref() else {
        out.push(violation(
            ids::CODE_LICENSE_MISSING,
            ids::PATH_COMPLIANCE_APPROVED_LICENSES,
            format!("model '{}' has no license metadata", record.display_name()),
            json!(rules.approved_licenses),
            Value::Null,
        ));
        return;
    };

    let normalized = license.trim().to_lowercase();
    let approved = rules
        .approved_licenses
        .iter()
        .any(|p| patterns.matches(&p.trim().to_lowercase(), &normalized));
    if !approved {
        out.push(violation(
            ids::CODE_LICENSE_NOT_APPROVED,
            ids::PATH_COMPLIANCE_APPROVED_LICENSES,
            format!(
                "model '{}' is licensed '{license}', which is not approved",
                record.display_name()
            ),
            json!(rules.approved_licenses),
            json!(normalized),
        ));
    }
}
