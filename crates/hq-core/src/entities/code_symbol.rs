use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SymbolKind;

/// A function-like or class-like declaration extracted from one code unit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CodeSymbol {
    pub id: String,
    pub name: String,
    pub kind: SymbolKind,
    pub file_path: Option<String>,
    /// 1-based line of the declaration start.
    pub start_line: u32,
    pub end_line: u32,
    /// Exact source range of the declaration, redacted.
    pub code_snippet: String,
}
