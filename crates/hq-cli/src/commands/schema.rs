use anyhow::bail;
use hq_core::entities::{BugItem, CodeSymbol, GeneratedTest, Requirement, TestIntent};
use hq_core::responses::{CoverageMetrics, RunSummary, ValidationSummary};
use schemars::schema_for;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

pub const TYPE_NAMES: [&str; 8] = [
    "requirement",
    "code-symbol",
    "bug-item",
    "test-intent",
    "generated-test",
    "validation-summary",
    "coverage-metrics",
    "run-summary",
];

/// JSON schema for one of [`TYPE_NAMES`]. Underscores are accepted in place
/// of hyphens.
pub fn schema_for_name(name: &str) -> anyhow::Result<Option<Value>> {
    let schema = match name.replace('_', "-").to_ascii_lowercase().as_str() {
        "requirement" => schema_for!(Requirement),
        "code-symbol" => schema_for!(CodeSymbol),
        "bug-item" => schema_for!(BugItem),
        "test-intent" => schema_for!(TestIntent),
        "generated-test" => schema_for!(GeneratedTest),
        "validation-summary" => schema_for!(ValidationSummary),
        "coverage-metrics" => schema_for!(CoverageMetrics),
        "run-summary" => schema_for!(RunSummary),
        _ => return Ok(None),
    };
    Ok(Some(serde_json::to_value(schema)?))
}

/// Handle `hqa schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(schema) = schema_for_name(&args.type_name)? else {
        bail!(
            "unknown schema type '{}' (expected one of: {})",
            args.type_name,
            TYPE_NAMES.join(", ")
        );
    };
    output(&schema, flags.format)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{TYPE_NAMES, schema_for_name};

    #[test]
    fn every_listed_type_has_a_schema() {
        for name in TYPE_NAMES {
            let schema = schema_for_name(name).unwrap();
            assert!(schema.is_some(), "missing schema for {name}");
        }
    }

    #[rstest]
    #[case("requirement", "description")]
    #[case("generated_test", "intent_id")]
    #[case("Run-Summary", "traceability_path")]
    fn schema_lists_expected_property(#[case] name: &str, #[case] property: &str) {
        let schema = schema_for_name(name).unwrap().unwrap();
        assert!(
            schema["properties"].get(property).is_some(),
            "{name} schema lacks {property}"
        );
    }

    #[test]
    fn unknown_type_is_none() {
        assert!(schema_for_name("patient").unwrap().is_none());
    }
}
