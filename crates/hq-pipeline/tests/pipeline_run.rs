//! End-to-end runs against fixture collaborators.

use std::collections::HashSet;
use std::path::Path;

use hq_config::{HqConfig, TrackerProvider};
use hq_pipeline::code_store::InMemoryCodeStore;
use hq_pipeline::{CodeUnit, Collaborators, Coordinator, RunInput};
use pretty_assertions::assert_eq;

const APP: &str = r#"def lookup_patient(patient_id):
    """Return the patient record for patient_id."""
    return {"id": patient_id, "contact": "jane.doe@example.com"}


def export_fhir_bundle(records):
    return [r for r in records if r]
"#;

const BUGS: &str = r#"{
    "bugs": [
        {"title": "lookup_patient returns stale record", "description": "seen on 2024-02-01 for MRN: 00123456"},
        {"title": "FHIR export drops empty bundles", "description": "reported by ops@example.com"},
        {"title": "Login page flickers", "description": "no steps"}
    ]
}"#;

fn config_in(dir: &Path) -> HqConfig {
    let bugs_path = dir.join("bugs.json");
    std::fs::write(&bugs_path, BUGS).unwrap();

    let mut config = HqConfig::default();
    config.general.output_dir = dir.join("generated").to_string_lossy().into_owned();
    config.general.traceability_path = dir.join("traceability.csv").to_string_lossy().into_owned();
    config.tracker.provider = TrackerProvider::Fixture;
    config.tracker.fixture_path = bugs_path.to_string_lossy().into_owned();
    config
}

fn input() -> RunInput {
    RunInput {
        requirements: vec![
            "Clinicians must look up a patient record by id; contact dr.smith@example.com".into(),
            "Export FHIR bundles for all records nightly".into(),
        ],
        code_units: vec![CodeUnit::Path("app.py".into())],
    }
}

fn coordinator(config: HqConfig) -> Coordinator {
    let collaborators = Collaborators::from_config(&config)
        .with_code_store(Box::new(InMemoryCodeStore::new().with_source("app.py", APP)));
    Coordinator::new(config, collaborators)
}

#[tokio::test]
async fn full_run_generates_traceable_clean_tests() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let output = coordinator(config).run(input()).await.unwrap();

    assert_eq!(output.requirements.len(), 2);
    assert_eq!(output.symbols.len(), 2);
    assert_eq!(output.bugs.len(), 3);
    assert!(output.tests.len() >= 2);
    assert!(output.validation.coverage > 0.0);
    assert_eq!(output.validation.total as usize, output.tests.len());
    assert!(output.summary.degraded.is_empty(), "{:?}", output.summary.degraded);

    for test in &output.tests {
        assert!(hq_redact::assert_clean(&test.code).is_ok());
        let path = test.path().expect("test written");
        assert_eq!(std::fs::read_to_string(path).unwrap(), test.code);
    }
    for text in output
        .requirements
        .iter()
        .map(|r| r.description.as_str())
        .chain(output.bugs.iter().map(|b| b.description.as_str()))
        .chain(output.symbols.iter().map(|s| s.code_snippet.as_str()))
    {
        assert!(hq_redact::assert_clean(text).is_ok(), "unredacted text: {text}");
    }

    let csv = std::fs::read_to_string(dir.path().join("traceability.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("test_id,requirement_id,requirement_title"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), output.tests.len());
    let row_ids: HashSet<&str> = rows.iter().filter_map(|r| r.split(',').next()).collect();
    for test in &output.tests {
        assert!(row_ids.contains(test.id.as_str()));
    }
}

#[tokio::test]
async fn bug_intents_are_high_priority_and_links_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let output = coordinator(config_in(dir.path())).run(input()).await.unwrap();

    let requirement_ids: HashSet<&str> = output.requirements.iter().map(|r| r.id.as_str()).collect();
    let bug_intents: Vec<_> = output
        .intents
        .iter()
        .filter(|i| i.parameters.get("origin").and_then(|v| v.as_str()) == Some("bug"))
        .collect();

    assert_eq!(bug_intents.len(), 3);
    assert!(bug_intents.iter().all(|i| i.priority == hq_core::enums::Priority::High));
    for intent in &output.intents {
        if let Some(id) = &intent.requirement_id {
            assert!(requirement_ids.contains(id.as_str()));
        }
    }
}

#[tokio::test]
async fn rerun_overwrites_traceability() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator(config_in(dir.path()));

    let first = coordinator.run(input()).await.unwrap();
    let second = coordinator.run(input()).await.unwrap();

    let csv = std::fs::read_to_string(dir.path().join("traceability.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1 + second.tests.len());
    assert_eq!(first.tests.len(), second.tests.len());
    assert!(!csv.contains(&first.tests[0].id));
}

#[tokio::test]
async fn missing_code_unit_degrades_but_completes() {
    let dir = tempfile::tempdir().unwrap();
    let mut run_input = input();
    run_input.code_units.push(CodeUnit::Path("gone.py".into()));

    let output = coordinator(config_in(dir.path())).run(run_input).await.unwrap();

    assert_eq!(output.symbols.len(), 2);
    assert!(output.summary.degraded.iter().any(|d| d.contains("gone.py")));
}
