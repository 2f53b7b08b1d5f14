use super::{compliance, infer_locality, models, run_all, runtime};
use crate::PolicyEngine;
use crate::model::{EvaluationContext, PolicyResult};
use crate::pattern::PatternCache;
use crate::resolve::resolve_candidate;
use crate::test_support::{candidate, codes, context, policy_from};
use modelgate_types::ids;
use serde_json::{Value, json};
use time::macros::datetime;

fn evaluate(policy: Value, cand: Value, ctx: &EvaluationContext) -> PolicyResult {
    let policy = policy_from(policy);
    PolicyEngine::new(&policy).evaluate(&candidate(cand), ctx)
}

#[test]
fn deny_pattern_blocks_in_enforce_mode() {
    let policy = policy_from(json!({
        "mode": "enforce",
        "rules": {"models": {"deny": ["*uncensored*"]}}
    }));
    let batch = PolicyEngine::new(&policy).run(
        &[candidate(json!({"tag": "model:7b-uncensored"}))],
        &EvaluationContext::default(),
        datetime!(2025-01-01 0:00 UTC),
    );

    let result = &batch.results[0].result;
    assert_eq!(codes(result), vec![ids::CODE_MODEL_DENIED]);
    assert!(!result.pass);
    assert_eq!(result.violations[0].path, ids::PATH_MODELS_DENY);
    assert_eq!(result.violations[0].actual, json!("model:7b-uncensored"));
    assert!(batch.decision.should_block);
    assert_eq!(batch.decision.exit_code, 1);
}

#[test]
fn unexpired_exception_suppresses_denied_model() {
    let policy = policy_from(json!({
        "mode": "enforce",
        "rules": {"models": {"deny": ["*uncensored*"]}},
        "enforcement": {"allow_exceptions": true},
        "exceptions": [{"model": "*", "reason": "red-team study", "expires_at": "2030-12-31"}]
    }));
    let batch = PolicyEngine::new(&policy).run(
        &[candidate(json!({"tag": "model:7b-uncensored"}))],
        &EvaluationContext::default(),
        datetime!(2025-01-01 0:00 UTC),
    );

    let result = &batch.results[0].result;
    assert!(result.pass);
    assert_eq!(result.violation_count, 0);
    assert!(result.violations.is_empty());
    assert_eq!(result.suppressed_violations.len(), 1);
    assert_eq!(
        result.rationale.last().map(String::as_str),
        Some("EXCEPTION_APPLIED: * (red-team study)")
    );
    assert_eq!(batch.exceptions_applied, 1);
    assert!(!batch.decision.should_block);
    assert_eq!(batch.decision.exit_code, 0);
}

#[test]
fn missing_size_is_a_violation() {
    let result = evaluate(
        json!({"rules": {"models": {"max_size_gb": 4}}}),
        json!({"tag": "mystery"}),
        &EvaluationContext::default(),
    );
    assert_eq!(codes(&result), vec![ids::CODE_MODEL_SIZE_UNKNOWN]);
    assert!(!result.pass);
}

#[test]
fn audit_mode_fails_without_blocking() {
    let policy = policy_from(json!({"mode": "audit", "rules": {"models": {"max_params_b": 6}}}));
    let batch = PolicyEngine::new(&policy).run(
        &[candidate(json!({"tag": "llama3:7b", "params_b": 7}))],
        &EvaluationContext::default(),
        datetime!(2025-01-01 0:00 UTC),
    );
    assert_eq!(codes(&batch.results[0].result), vec![ids::CODE_MODEL_TOO_MANY_PARAMS]);
    assert!(!batch.results[0].result.pass);
    assert!(!batch.decision.should_block);
    assert_eq!(batch.decision.exit_code, 0);
}

#[test]
fn expired_exception_never_suppresses() {
    let policy = policy_from(json!({
        "mode": "enforce",
        "rules": {"models": {"deny": ["*uncensored*"]}},
        "enforcement": {"allow_exceptions": true},
        "exceptions": [{"model": "*uncensored*", "expires_at": "2024-12-31"}]
    }));
    let batch = PolicyEngine::new(&policy).run(
        &[candidate(json!({"tag": "model:7b-uncensored"}))],
        &EvaluationContext::default(),
        datetime!(2025-01-01 0:00 UTC),
    );
    assert!(!batch.results[0].result.pass);
    assert_eq!(batch.exceptions_applied, 0);
    assert!(batch.decision.should_block);
}

#[test]
fn exceptions_ignored_unless_allowed() {
    let policy = policy_from(json!({
        "mode": "enforce",
        "rules": {"models": {"deny": ["*"]}},
        "exceptions": [{"model": "*"}]
    }));
    let batch = PolicyEngine::new(&policy).run(
        &[candidate(json!({"tag": "anything"}))],
        &EvaluationContext::default(),
        datetime!(2025-01-01 0:00 UTC),
    );
    assert!(!batch.results[0].result.pass);
    assert_eq!(batch.exceptions_applied, 0);
}

#[test]
fn first_matching_exception_in_document_order_wins() {
    let policy = policy_from(json!({
        "rules": {"models": {"deny": ["*"]}},
        "enforcement": {"allow_exceptions": true},
        "exceptions": [
            {"model": "other*", "reason": "not me"},
            {"model": "qwen*", "reason": "expired", "expires_at": "2020-01-01"},
            {"model": "qwen*", "reason": "pilot"},
            {"model": "*", "reason": "catch-all"}
        ]
    }));
    let batch = PolicyEngine::new(&policy).run(
        &[candidate(json!({"tag": "qwen2:7b"}))],
        &EvaluationContext::default(),
        datetime!(2025-01-01 0:00 UTC),
    );
    let applied = batch.results[0].result.exception.as_ref().expect("excepted");
    assert_eq!(applied.reason.as_deref(), Some("pilot"));
}

#[test]
fn every_rule_group_reports_without_short_circuit() {
    let result = evaluate(
        json!({
            "rules": {
                "models": {
                    "deny": ["*evil*"],
                    "allow": ["llama*"],
                    "max_size_gb": 4,
                    "max_params_b": 8,
                    "allowed_quantizations": ["Q4*"]
                },
                "runtime": {"backends": ["cuda"], "min_ram_gb": 16, "require_local": true},
                "compliance": {"approved_licenses": ["mit", "apache-2.0"]}
            }
        }),
        json!({
            "tag": "evil-model:70b",
            "size_gb": 40,
            "params_b": 70,
            "quantization": "Q8_0",
            "license": "Proprietary",
            "source": "openai"
        }),
        &context(Some("rocm"), Some(8.0), None),
    );

    assert_eq!(
        codes(&result),
        vec![
            ids::CODE_MODEL_DENIED,
            ids::CODE_MODEL_NOT_ALLOWED,
            ids::CODE_MODEL_TOO_LARGE,
            ids::CODE_MODEL_TOO_MANY_PARAMS,
            ids::CODE_QUANTIZATION_NOT_ALLOWED,
            ids::CODE_BACKEND_NOT_ALLOWED,
            ids::CODE_INSUFFICIENT_RAM,
            ids::CODE_MODEL_NOT_LOCAL,
            ids::CODE_LICENSE_NOT_APPROVED,
        ]
    );
    assert_eq!(result.rationale.len(), 9);
    assert!(result.rationale[0].starts_with("MODEL_DENIED: "));
}

#[test]
fn clean_candidate_passes_with_single_rationale() {
    let result = evaluate(
        json!({"rules": {"models": {"allow": ["llama*"], "max_size_gb": 8}}}),
        json!({"name": "llama3:8b", "size_gb": 4.7}),
        &EvaluationContext::default(),
    );
    assert!(result.pass);
    assert_eq!(result.violation_count, 0);
    assert_eq!(result.rationale, vec![crate::model::RATIONALE_PASSED]);
}

#[test]
fn allow_list_matches_any_alias() {
    let policy = policy_from(json!({"rules": {"models": {"allow": ["meta-llama/*"]}}}));
    let record = resolve_candidate(&candidate(json!({"name": "Llama 3", "hf_repo": "meta-llama/Llama-3-8B"})));
    let mut out = Vec::new();
    models::run(&record, &policy.rules.models, &PatternCache::new(), &mut out);
    assert!(out.is_empty());

    let record = resolve_candidate(&candidate(json!({})));
    models::run(&record, &policy.rules.models, &PatternCache::new(), &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, ids::CODE_MODEL_NOT_ALLOWED);
    assert_eq!(out[0].actual, json!([]));
}

#[test]
fn size_is_derived_from_params_and_quantization() {
    let policy = policy_from(json!({"rules": {"models": {"max_size_gb": 4}}}));
    let record = resolve_candidate(&candidate(json!({"tag": "m", "params_b": 14, "quantization": "Q4_K_M"})));
    let mut out = Vec::new();
    models::run(&record, &policy.rules.models, &PatternCache::new(), &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, ids::CODE_MODEL_TOO_LARGE);
    assert_eq!(out[0].actual, json!(7.0));
    assert!(out[0].message.contains("estimated from parameters"));
}

#[test]
fn params_derived_from_size_satisfy_ceiling() {
    let result = evaluate(
        json!({"rules": {"models": {"max_params_b": 8}}}),
        json!({"tag": "m", "size_gb": 3.5, "quantization": "q4_0"}),
        &EvaluationContext::default(),
    );
    assert!(result.pass, "{:?}", result.violations);
}

#[test]
fn missing_quantization_is_unknown() {
    let result = evaluate(
        json!({"rules": {"models": {"allowed_quantizations": ["Q4*"]}}}),
        json!({"tag": "m"}),
        &EvaluationContext::default(),
    );
    assert_eq!(codes(&result), vec![ids::CODE_QUANTIZATION_UNKNOWN]);
}

#[test]
fn runtime_unknowns_fail_closed() {
    let policy = policy_from(json!({"rules": {"runtime": {"backends": ["cuda"], "min_ram_gb": 16}}}));
    let record = resolve_candidate(&candidate(json!({"tag": "m"})));
    let mut out = Vec::new();
    runtime::run(&record, &EvaluationContext::default(), &policy.rules.runtime, &mut out);
    let got: Vec<&str> = out.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(got, vec![ids::CODE_BACKEND_UNKNOWN, ids::CODE_RAM_UNKNOWN]);
}

#[test]
fn backend_match_is_case_insensitive_and_context_wins() {
    let policy = policy_from(json!({"rules": {"runtime": {"backends": ["CUDA", "metal"]}}}));
    let record = resolve_candidate(&candidate(json!({"tag": "m", "backend": "cpu"})));

    let mut out = Vec::new();
    runtime::run(&record, &context(Some("cuda"), None, None), &policy.rules.runtime, &mut out);
    assert!(out.is_empty());

    runtime::run(&record, &EvaluationContext::default(), &policy.rules.runtime, &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, ids::CODE_BACKEND_NOT_ALLOWED);
    assert_eq!(out[0].actual, json!("cpu"));
}

#[test]
fn ram_at_minimum_passes() {
    let result = evaluate(
        json!({"rules": {"runtime": {"min_ram_gb": 16}}}),
        json!({"tag": "m"}),
        &context(None, Some(16.0), None),
    );
    assert!(result.pass);
}

#[test]
fn non_finite_ram_is_unknown() {
    for ram in [f64::NAN, f64::INFINITY, -4.0] {
        let result = evaluate(
            json!({"rules": {"runtime": {"min_ram_gb": 16}}}),
            json!({"tag": "m"}),
            &context(Some("cuda"), Some(ram), None),
        );
        assert_eq!(codes(&result), vec![ids::CODE_RAM_UNKNOWN], "ram {ram}");
        assert!(!result.pass);
    }
}

#[test]
fn non_finite_limits_fail_closed() {
    let mut policy = policy_from(json!({}));
    policy.rules.models.max_size_gb = Some(f64::NAN);
    policy.rules.models.max_params_b = Some(f64::NAN);
    policy.rules.runtime.min_ram_gb = Some(f64::NAN);

    let result = PolicyEngine::new(&policy).evaluate(
        &candidate(json!({"tag": "m", "size_gb": 4, "params_b": 7})),
        &context(None, Some(64.0), None),
    );
    assert_eq!(
        codes(&result),
        vec![
            ids::CODE_MODEL_TOO_LARGE,
            ids::CODE_MODEL_TOO_MANY_PARAMS,
            ids::CODE_INSUFFICIENT_RAM
        ]
    );
}

#[test]
fn locality_inference_order() {
    let remote = resolve_candidate(&candidate(json!({"tag": "m", "source": "openrouter"})));
    let flagged = resolve_candidate(&candidate(json!({"tag": "m", "source": "openrouter", "is_local": true})));
    let bare = resolve_candidate(&candidate(json!({"tag": "m"})));

    assert!(infer_locality(&flagged, &context(None, None, Some(false))).is_local);
    assert!(infer_locality(&remote, &context(None, None, Some(true))).is_local);
    assert!(!infer_locality(&remote, &EvaluationContext::default()).is_local);
    assert!(!infer_locality(&bare, &context(None, None, Some(false))).is_local);

    let fallback = infer_locality(&bare, &EvaluationContext::default());
    assert!(fallback.is_local);
    assert_eq!(fallback.basis, "default");
}

#[test]
fn require_local_flags_remote_source() {
    let result = evaluate(
        json!({"rules": {"runtime": {"local_only": true}}}),
        json!({"tag": "gpt-4o", "source": "https://api.openai.com/v1"}),
        &EvaluationContext::default(),
    );
    assert_eq!(codes(&result), vec![ids::CODE_MODEL_NOT_LOCAL]);
    assert_eq!(result.violations[0].expected, json!(true));
}

#[test]
fn license_is_case_normalized() {
    let policy = policy_from(json!({"rules": {"compliance": {"approved_licenses": ["MIT", "apache-*"]}}}));
    let cache = PatternCache::new();
    let mut out = Vec::new();

    for license in [" mit ", "Apache-2.0"] {
        let record = resolve_candidate(&candidate(json!({"tag": "m", "license": license})));
        compliance::run(&record, &policy.rules.compliance, &cache, &mut out);
    }
    assert!(out.is_empty());

    let record = resolve_candidate(&candidate(json!({"tag": "m", "license": "Llama-3-Community"})));
    compliance::run(&record, &policy.rules.compliance, &cache, &mut out);
    let record = resolve_candidate(&candidate(json!({"tag": "m"})));
    compliance::run(&record, &policy.rules.compliance, &cache, &mut out);

    let got: Vec<&str> = out.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(got, vec![ids::CODE_LICENSE_NOT_APPROVED, ids::CODE_LICENSE_MISSING]);
    assert_eq!(out[0].actual, json!("llama-3-community"));
}

#[test]
fn empty_policy_passes_everything() {
    let policy = policy_from(json!({}));
    let record = resolve_candidate(&candidate(json!({})));
    let mut out = Vec::new();
    run_all(&record, &EvaluationContext::default(), &policy, &PatternCache::new(), &mut out);
    assert!(out.is_empty());
}
