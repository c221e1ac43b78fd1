use anyhow::{Context, bail};
use hq_config::HqConfig;
use hq_pipeline::{CodeUnit, Coordinator, RunInput};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunArgs;
use crate::output::output;
use crate::progress::Progress;

/// Handle `hqa run`.
pub async fn handle(args: &RunArgs, config: &HqConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let input = build_input(args)?;

    let coordinator = Coordinator::from_config(config.clone());
    let progress = Progress::spinner("running pipeline");
    let run = match coordinator.run(input).await {
        Ok(run) => run,
        Err(error) => {
            progress.finish_err("pipeline failed");
            return Err(error).context("pipeline run failed");
        }
    };
    progress.finish_ok(&format!("{} tests generated", run.summary.tests_generated));

    for note in &run.summary.degraded {
        tracing::warn!(run_id = %run.summary.run_id, "degraded: {note}");
    }
    output(&run.summary, flags.format)
}

fn build_input(args: &RunArgs) -> anyhow::Result<RunInput> {
    let mut requirements = args.requirements.clone();
    if let Some(path) = &args.requirements_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read requirements file {}", path.display()))?;
        requirements.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }

    if requirements.is_empty() && args.code.is_empty() {
        bail!("run: pass at least one --requirement, --requirements-file, or --code");
    }

    Ok(RunInput {
        requirements,
        code_units: args.code.iter().cloned().map(CodeUnit::Path).collect(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::build_input;
    use crate::cli::root_commands::RunArgs;

    fn args(requirements: &[&str], code: &[&str]) -> RunArgs {
        RunArgs {
            requirements: requirements.iter().map(|s| (*s).to_string()).collect(),
            requirements_file: None,
            code: code.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn empty_run_is_rejected() {
        assert!(build_input(&args(&[], &[])).is_err());
    }

    #[test]
    fn requirements_file_lines_follow_inline_requirements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reqs.txt");
        std::fs::write(&path, "Export FHIR bundles\n\n  Audit every PHI read  \n").unwrap();

        let mut run_args = args(&["Patient lookup"], &["app.py"]);
        run_args.requirements_file = Some(path);
        let input = build_input(&run_args).unwrap();

        assert_eq!(
            input.requirements,
            vec!["Patient lookup", "Export FHIR bundles", "Audit every PHI read"]
        );
        assert_eq!(input.code_units.len(), 1);
    }

    #[test]
    fn missing_requirements_file_is_an_error() {
        let mut run_args = args(&["Patient lookup"], &[]);
        run_args.requirements_file = Some("/nonexistent/hqa/reqs.txt".into());
        assert!(build_input(&run_args).is_err());
    }
}
