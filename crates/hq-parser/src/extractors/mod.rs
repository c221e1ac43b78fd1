//! Language dispatch and the shared node-to-symbol conversion.

use ast_grep_core::Node;
use ast_grep_language::SupportLang;
use hq_core::entities::CodeSymbol;
use hq_core::enums::SymbolKind;
use hq_core::ids::{PREFIX_SYMBOL, generate_id};

use crate::error::ParserError;
use crate::parser::AstTree;

pub mod generic;
pub mod python;

/// Extract every function-like and class-like declaration from a parsed tree.
///
/// # Errors
/// Returns [`ParserError::UnsupportedLanguage`] when no kind table exists for
/// `lang`.
pub fn extract(
    tree: &AstTree,
    lang: SupportLang,
    file_path: Option<&str>,
) -> Result<Vec<CodeSymbol>, ParserError> {
    match lang {
        SupportLang::Python => Ok(python::extract(tree, file_path)),
        other => generic::extract(tree, other, file_path),
    }
}

/// Build a [`CodeSymbol`] from a declaration node. The snippet is the node's
/// exact source text, redacted.
pub(crate) fn to_symbol<D: ast_grep_core::Doc>(
    node: &Node<D>,
    name: String,
    kind: SymbolKind,
    file_path: Option<&str>,
) -> CodeSymbol {
    CodeSymbol {
        id: generate_id(PREFIX_SYMBOL),
        name,
        kind,
        file_path: file_path.map(str::to_string),
        start_line: line_number(node.start_pos().line()),
        end_line: line_number(node.end_pos().line()),
        code_snippet: hq_redact::redact(&node.text()),
    }
}

fn line_number(zero_based: usize) -> u32 {
    u32::try_from(zero_based + 1).unwrap_or(u32::MAX)
}

pub(crate) fn field_text<D: ast_grep_core::Doc>(node: &Node<D>, field: &str) -> Option<String> {
    node.field(field)
        .map(|n| n.text().to_string())
        .filter(|text| !text.is_empty())
}
