//! Serde roundtrip and JsonSchema validation tests for all entity types.

use std::collections::BTreeMap;

use chrono::Utc;
use schemars::schema_for;
use hq_core::entities::*;
use hq_core::enums::*;
use hq_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            pretty_assertions::assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    requirement_roundtrip,
    Requirement,
    Requirement {
        id: "req-a3f8b2c1".into(),
        title: "Patient lookup must be fast and secure".into(),
        description: "Patient lookup must be fast and secure".into(),
        language: Language::En,
        tags: vec!["HIPAA".into()],
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    code_symbol_roundtrip,
    CodeSymbol,
    CodeSymbol {
        id: "sym-0b1c2d3e".into(),
        name: "list_patients".into(),
        kind: SymbolKind::Function,
        file_path: Some("app/main.py".into()),
        start_line: 12,
        end_line: 18,
        code_snippet: "def list_patients():\n    return patients".into(),
    }
);

roundtrip_and_validate!(
    bug_item_roundtrip,
    BugItem,
    BugItem {
        id: "bug-7f6e5d4c".into(),
        external_id: Some("HQA-42".into()),
        title: "Lookup returns stale record".into(),
        description: "Seen for [REDACTED_EMAIL] on [REDACTED_DATE]".into(),
        status: BugStatus::Open,
        related_requirements: vec!["req-a3f8b2c1".into()],
        created_at: Utc::now(),
        resolved_at: None,
    }
);

roundtrip_and_validate!(
    test_intent_roundtrip,
    TestIntent,
    TestIntent {
        id: "int-11223344".into(),
        requirement_id: Some("req-a3f8b2c1".into()),
        description: "Verify list_patients".into(),
        priority: Priority::High,
        parameters: BTreeMap::from([
            ("target".to_string(), serde_json::json!("list_patients")),
            ("origin".to_string(), serde_json::json!("symbol")),
        ]),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    generated_test_roundtrip,
    GeneratedTest,
    GeneratedTest {
        id: "gen-99887766".into(),
        intent_id: "int-11223344".into(),
        code: "def test_list_patients():\n    assert True\n".into(),
        language: "python".into(),
        metadata: BTreeMap::from([(
            METADATA_PATH.to_string(),
            "tests/generated/test_list_patients_0.py".to_string(),
        )]),
        created_at: Utc::now(),
        passed: Some(true),
        last_run_at: Some(Utc::now()),
    }
);

roundtrip_and_validate!(
    run_summary_roundtrip,
    RunSummary,
    RunSummary {
        run_id: "run-deadbeef".into(),
        tests_generated: 2,
        test_paths: vec!["tests/generated/test_a_0.py".into()],
        validation: ValidationSummary {
            passed: 1,
            total: 2,
            coverage: 0.5,
            failures: vec![TestFailure {
                test_id: "gen-1".into(),
                message: "exit status 1".into(),
            }],
        },
        traceability_path: "traceability.csv".into(),
        counts: StageCounts {
            requirements: 2,
            symbols: 2,
            bugs: 3,
            intents: 5,
            tests: 5,
            rejected: 0,
        },
        degraded: vec!["bug tracker returned no data".into()],
    }
);

roundtrip_and_validate!(
    coverage_metrics_roundtrip,
    CoverageMetrics,
    CoverageMetrics {
        coverage: 0.82,
        risk_score: 0.1,
    }
);

#[test]
fn generated_test_path_reads_metadata() {
    let test = GeneratedTest {
        id: "gen-1".into(),
        intent_id: "int-1".into(),
        code: String::new(),
        language: "python".into(),
        metadata: BTreeMap::from([(METADATA_PATH.to_string(), "out/test_x.py".to_string())]),
        created_at: Utc::now(),
        passed: None,
        last_run_at: None,
    };
    assert_eq!(test.path(), Some("out/test_x.py"));
}
