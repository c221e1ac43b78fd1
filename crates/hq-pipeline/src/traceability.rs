//! Traceability exporter.
//!
//! Writes `test_id,requirement_id,requirement_title`, one row per generated
//! test. The file is replaced atomically: rows go to a temp file in the
//! target directory, which is then renamed over the destination.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use hq_core::entities::{GeneratedTest, Requirement, TestIntent};

use crate::error::PipelineError;

pub const HEADER: [&str; 3] = ["test_id", "requirement_id", "requirement_title"];

/// Quote a field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Render the full CSV document. A test keeps its intent's requirement id even
/// when that requirement is absent from `requirements`; only the title is
/// left empty. Tests with no resolvable intent get both columns empty.
#[must_use]
pub fn render(
    tests: &[GeneratedTest],
    intents: &[TestIntent],
    requirements: &[Requirement],
) -> String {
    let intent_requirement: HashMap<&str, &str> = intents
        .iter()
        .filter_map(|i| i.requirement_id.as_deref().map(|r| (i.id.as_str(), r)))
        .collect();
    let titles: HashMap<&str, &str> = requirements
        .iter()
        .map(|r| (r.id.as_str(), r.title.as_str()))
        .collect();

    let mut out = csv_row(&HEADER);
    for test in tests {
        let requirement_id = intent_requirement
            .get(test.intent_id.as_str())
            .copied()
            .unwrap_or("");
        let title = titles.get(requirement_id).copied().unwrap_or("");
        out.push_str(&csv_row(&[test.id.as_str(), requirement_id, title]));
    }
    out
}

/// Write the traceability file, replacing any previous one.
///
/// # Errors
///
/// [`PipelineError::ExportFailure`] on any I/O error. A failed export leaves
/// the previous file untouched.
pub fn export(
    path: &Path,
    tests: &[GeneratedTest],
    intents: &[TestIntent],
    requirements: &[Requirement],
) -> Result<(), PipelineError> {
    let failure = |source: std::io::Error| PipelineError::ExportFailure {
        path: path.display().to_string(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(failure)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(failure)?;
    tmp.write_all(render(tests, intents, requirements).as_bytes())
        .map_err(failure)?;
    tmp.as_file().sync_all().map_err(failure)?;
    tmp.persist(path).map_err(|e| failure(e.error))?;

    tracing::info!(path = %path.display(), rows = tests.len(), "wrote traceability file");
    Ok(())
}
