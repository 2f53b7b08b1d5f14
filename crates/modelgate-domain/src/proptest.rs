//! Property-based tests for the domain crate.
//!
//! Invariants covered:
//! - `pass` is exactly `violations.is_empty()`
//! - audit mode never blocks
//! - exceptions are inert unless allowed
//! - `rule_id` depends only on code and path
//! - the whole pipeline is deterministic for a fixed instant

use crate::PolicyEngine;
use crate::enforcement::{AggregateEvaluation, resolve};
use crate::exceptions::apply_exceptions;
use crate::fingerprint::rule_id;
use crate::model::{Candidate, EvaluationContext};
use crate::pattern::PatternCache;
use crate::policy::Policy;
use crate::report::{ReportInput, build_report};
use crate::test_support::policy_from;
use modelgate_types::{OnViolation, PolicyMode};
use proptest::prelude::*;
use serde_json::{Value, json};
use time::macros::datetime;

fn arb_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z][a-z0-9]{0,8}(:[0-9]{1,2}b)?(-uncensored)?").unwrap(),
        Just("llama3:8b".to_string()),
        Just("qwen2:72b-instruct".to_string()),
    ]
}

fn arb_quant() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("Q4_K_M".to_string()),
        Just("Q8_0".to_string()),
        Just("F16".to_string()),
        Just("IQ2_XS".to_string()),
        Just("weird".to_string()),
    ])
}

fn arb_candidate() -> impl Strategy<Value = Candidate> {
    (
        arb_tag(),
        prop::option::of(0.0f64..80.0),
        prop::option::of(0.0f64..120.0),
        arb_quant(),
        prop::option::of(prop_oneof![Just("MIT"), Just("apache-2.0"), Just("Llama")]),
        prop::option::of(prop_oneof![Just("ollama"), Just("openai"), Just("hf")]),
    )
        .prop_map(|(tag, size, params, quant, license, source)| {
            let mut c = Candidate::new().with("tag", tag);
            if let Some(size) = size {
                c = c.with("size_gb", size);
            }
            if let Some(params) = params {
                c = c.with("params_b", params);
            }
            if let Some(quant) = quant {
                c = c.with("quantization", quant);
            }
            if let Some(license) = license {
                c = c.with("license", license);
            }
            if let Some(source) = source {
                c = c.with("source", source);
            }
            c
        })
}

fn arb_context() -> impl Strategy<Value = EvaluationContext> {
    (
        prop::option::of(prop_oneof![Just("cuda"), Just("metal"), Just("cpu")]),
        prop::option::of(0.0f64..128.0),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(backend, ram_gb, is_local)| EvaluationContext {
            backend: backend.map(str::to_string),
            ram_gb,
            is_local,
            hardware: Value::Null,
        })
}

fn arb_policy() -> impl Strategy<Value = Policy> {
    (
        prop_oneof![Just("audit"), Just("enforce"), Just("bogus")],
        prop_oneof![Just("error"), Just("warn")],
        any::<bool>(),
        prop::option::of(1.0f64..40.0),
        prop::option::of(1.0f64..80.0),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(mode, on_violation, allow_exceptions, max_size, max_params, local, licenses)| {
                let mut rules = json!({
                    "models": {"deny": ["*uncensored*"], "allowed_quantizations": ["Q4*", "Q8*"]},
                    "runtime": {"backends": ["cuda", "metal"], "min_ram_gb": 16, "require_local": local}
                });
                if let Some(max) = max_size {
                    rules["models"]["max_size_gb"] = json!(max);
                }
                if let Some(max) = max_params {
                    rules["models"]["max_params_b"] = json!(max);
                }
                if licenses {
                    rules["compliance"] = json!({"approved_licenses": ["mit", "apache-*"]});
                }
                policy_from(json!({
                    "version": 1,
                    "org": "acme",
                    "mode": mode,
                    "rules": rules,
                    "enforcement": {"on_violation": on_violation, "allow_exceptions": allow_exceptions},
                    "exceptions": [
                        {"model": "qwen*", "expires_at": "2030-01-01"},
                        {"model": "*", "expires_at": "2020-01-01"}
                    ]
                }))
            },
        )
}

proptest! {
    #[test]
    fn pass_iff_no_violations(policy in arb_policy(), c in arb_candidate(), ctx in arb_context()) {
        let result = PolicyEngine::new(&policy).evaluate(&c, &ctx);
        prop_assert_eq!(result.pass, result.violations.is_empty());
        prop_assert_eq!(result.violation_count as usize, result.violations.len());
        prop_assert!(!result.rationale.is_empty());
    }

    #[test]
    fn audit_never_blocks(mut policy in arb_policy(), total in 0usize..50, failing in 0usize..50) {
        policy.mode = PolicyMode::Audit;
        policy.enforcement.on_violation = OnViolation::Error;
        let aggregate = AggregateEvaluation { total_checked: total.max(failing), fail_count: failing };
        let decision = resolve(&policy, &aggregate);
        prop_assert!(!decision.should_block);
        prop_assert_eq!(decision.exit_code, 0);
    }

    #[test]
    fn exceptions_inert_when_disabled(
        mut policy in arb_policy(),
        candidates in prop::collection::vec(arb_candidate(), 0..6),
        ctx in arb_context(),
    ) {
        policy.enforcement.allow_exceptions = false;
        let engine = PolicyEngine::new(&policy);
        let evaluated = engine.evaluate_batch(&candidates, &ctx);
        let outcome = apply_exceptions(
            &policy,
            &PatternCache::new(),
            evaluated.clone(),
            datetime!(2025-01-01 0:00 UTC),
        );
        prop_assert_eq!(outcome.results, evaluated);
        prop_assert_eq!(outcome.exceptions_applied, 0);
        prop_assert_eq!(outcome.suppressed_violations, 0);
    }

    #[test]
    fn suppression_only_removes(
        policy in arb_policy(),
        candidates in prop::collection::vec(arb_candidate(), 0..6),
        ctx in arb_context(),
    ) {
        let engine = PolicyEngine::new(&policy);
        let before = engine.evaluate_batch(&candidates, &ctx);
        let after = engine.apply_exceptions(before.clone(), datetime!(2025-01-01 0:00 UTC));
        for (b, a) in before.iter().zip(&after.results) {
            prop_assert!(a.result.violations.len() <= b.result.violations.len());
            let total = a.result.violations.len() + a.result.suppressed_violations.len();
            prop_assert_eq!(total, b.result.violations.len());
        }
    }

    #[test]
    fn rule_id_is_pure(code in "[A-Z_]{1,24}", path in "[a-z_.]{1,32}") {
        prop_assert_eq!(rule_id(&code, &path), rule_id(&code, &path));
        prop_assert_eq!(rule_id(&code, &path).len(), 16);
    }

    #[test]
    fn pipeline_is_deterministic(
        policy in arb_policy(),
        candidates in prop::collection::vec(arb_candidate(), 0..8),
        ctx in arb_context(),
    ) {
        let now = datetime!(2025-01-01 0:00 UTC);
        let render = || {
            let batch = PolicyEngine::new(&policy).run(&candidates, &ctx, now);
            let report = build_report(ReportInput {
                policy: &policy,
                policy_path: Some("policy.yaml".to_string()),
                command: "check".to_string(),
                tool_version: "0.0.0".to_string(),
                generated_at: now,
                runtime: json!({"backend": ctx.backend}),
                evaluation: &batch,
            });
            serde_json::to_string(&report).expect("serialize")
        };
        prop_assert_eq!(render(), render());
    }

    #[test]
    fn findings_count_matches_violations(
        policy in arb_policy(),
        candidates in prop::collection::vec(arb_candidate(), 0..8),
        ctx in arb_context(),
    ) {
        let batch = PolicyEngine::new(&policy).run(&candidates, &ctx, datetime!(2025-01-01 0:00 UTC));
        let expected: usize = batch
            .results
            .iter()
            .map(|r| r.result.violations.len() + r.result.suppressed_violations.len())
            .sum();
        prop_assert_eq!(crate::findings::expand_findings(&batch.results).len(), expected);
    }
}
