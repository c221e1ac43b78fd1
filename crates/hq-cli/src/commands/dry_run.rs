//! `hqa dry-run`: the whole pipeline against built-in fixtures.
//!
//! Uses default configuration with every collaborator offline (fixture bug
//! file, in-memory code, template model, in-memory metrics, simulated
//! validation) so the result depends only on this binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use hq_config::{HqConfig, TrackerProvider};
use hq_core::responses::RunSummary;
use hq_pipeline::code_store::InMemoryCodeStore;
use hq_pipeline::{CodeUnit, Collaborators, Coordinator, RunInput};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DryRunArgs;
use crate::output::output;
use crate::progress::Progress;
use crate::ui;

const MIN_TESTS: u32 = 2;
const MIN_COVERAGE: f64 = 0.5;

const SAMPLE_REQUIREMENTS: [&str; 2] = [
    "The system shall let clinicians look up a patient record by MRN: 00482913 and email results to care.team@example.org",
    "Export FHIR observation bundles nightly",
];

const SAMPLE_PATH: &str = "sample_app.py";

const SAMPLE_SOURCE: &str = r#"def lookup_patient(mrn):
    """Find a patient record by medical record number."""
    return {"mrn": mrn}


def export_fhir_bundle(observations):
    return {"resourceType": "Bundle", "entry": list(observations)}
"#;

const SAMPLE_BUGS: &str = r#"{
  "bugs": [
    {"title": "lookup_patient returns stale record", "description": "Reported 03/14/2024 by nurse.j@example.org"},
    {"title": "FHIR bundle missing entries", "description": "Call +1 (555) 010-4477 for the repro"},
    {"title": "Slow dashboard", "description": "Cold start takes 9s"}
  ]
}"#;

#[derive(Debug, Serialize)]
struct Check {
    name: &'static str,
    passed: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DryRunReport {
    passed: bool,
    checks: Vec<Check>,
    summary: RunSummary,
}

/// Handle `hqa dry-run`.
pub async fn handle(args: &DryRunArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tempdir;
    let workdir = match &args.workdir {
        Some(dir) => dir.clone(),
        None => {
            tempdir = tempfile::tempdir().context("failed to create dry-run directory")?;
            tempdir.path().to_path_buf()
        }
    };

    let progress = Progress::spinner("running self-test");
    let report = match self_test(&workdir).await {
        Ok(report) => report,
        Err(error) => {
            progress.finish_err("self-test aborted");
            return Err(error);
        }
    };
    progress.finish_clear();

    output(&report, flags.format)?;
    if ui::prefs().status {
        eprintln!(
            "{}",
            if report.passed {
                "SELF-TEST PASSED"
            } else {
                "SELF-TEST FAILED"
            }
        );
    }

    if !report.passed {
        let failed = report
            .checks
            .iter()
            .filter(|check| !check.passed)
            .map(|check| check.name)
            .collect::<Vec<_>>();
        bail!("self-test failed: {}", failed.join(", "));
    }
    Ok(())
}

async fn self_test(workdir: &Path) -> anyhow::Result<DryRunReport> {
    let config = offline_config(workdir)?;
    let collaborators = Collaborators::from_config(&config).with_code_store(Box::new(
        InMemoryCodeStore::new().with_source(SAMPLE_PATH, SAMPLE_SOURCE),
    ));

    let run = Coordinator::new(config, collaborators)
        .run(RunInput {
            requirements: SAMPLE_REQUIREMENTS.iter().map(|s| (*s).to_string()).collect(),
            code_units: vec![CodeUnit::Path(SAMPLE_PATH.to_string())],
        })
        .await
        .context("dry-run pipeline failed")?;

    let traceability_lines = std::fs::read_to_string(&run.summary.traceability_path)
        .map(|text| text.lines().count())
        .unwrap_or(0);
    let unclean_files = run
        .summary
        .test_paths
        .iter()
        .filter(|path| {
            std::fs::read_to_string(path).map_or(true, |code| hq_redact::contains_phi(&code))
        })
        .count();

    let checks = evaluate(&run.summary, traceability_lines, unclean_files);
    Ok(DryRunReport {
        passed: checks.iter().all(|check| check.passed),
        checks,
        summary: run.summary,
    })
}

fn offline_config(workdir: &Path) -> anyhow::Result<HqConfig> {
    std::fs::create_dir_all(workdir)
        .with_context(|| format!("failed to create {}", workdir.display()))?;
    let bugs_path = workdir.join("bugs.json");
    std::fs::write(&bugs_path, SAMPLE_BUGS)
        .with_context(|| format!("failed to write {}", bugs_path.display()))?;

    let mut config = HqConfig::default();
    config.general.output_dir = path_string(workdir.join("generated"));
    config.general.traceability_path = path_string(workdir.join("traceability.csv"));
    config.tracker.provider = TrackerProvider::Fixture;
    config.tracker.fixture_path = path_string(bugs_path);
    Ok(config)
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

fn evaluate(summary: &RunSummary, traceability_lines: usize, unclean_files: usize) -> Vec<Check> {
    vec![
        Check {
            name: "tests_generated",
            passed: summary.tests_generated >= MIN_TESTS,
            detail: format!("{} generated, need {MIN_TESTS}", summary.tests_generated),
        },
        Check {
            name: "coverage",
            passed: summary.validation.coverage > MIN_COVERAGE,
            detail: format!(
                "{:.2}, need more than {MIN_COVERAGE:.2}",
                summary.validation.coverage
            ),
        },
        Check {
            name: "traceability",
            passed: traceability_lines > 1,
            detail: format!("{traceability_lines} lines in {}", summary.traceability_path),
        },
        Check {
            name: "phi_guard",
            passed: unclean_files == 0,
            detail: format!("{unclean_files} written tests failed the guard"),
        },
    ]
}
