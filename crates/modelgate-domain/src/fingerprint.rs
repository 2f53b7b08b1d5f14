use sha2::{Digest, Sha256};

pub const RULE_ID_PREFIX: &str = "MGP-";
/// Hex characters kept from the digest.
pub const RULE_ID_HEX_LEN: usize = 12;

/// Compute the stable rule identifier for a violation.
///
/// Identity fields:
/// - code
/// - rule path
///
/// The same pair yields the same id on every machine and every run, so external trackers can
/// deduplicate findings.
pub fn rule_id(code: &str, rule_path: &str) -> String {
    let canonical = format!("{code}|{rule_path}");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{RULE_ID_PREFIX}{}", &digest[..RULE_ID_HEX_LEN])
}
