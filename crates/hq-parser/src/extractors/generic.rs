//! Kind-based extractor for the non-Python languages `detect_language` knows.
//!
//! Each language has a fixed table of node kinds that count as function-like
//! or class-like declarations. Nodes without a `name` field (anonymous
//! functions, arrow functions, `impl` blocks) are skipped.

use ast_grep_core::Node;
use ast_grep_language::SupportLang;
use hq_core::entities::CodeSymbol;
use hq_core::enums::SymbolKind;

use super::{field_text, to_symbol};
use crate::error::ParserError;
use crate::parser::AstTree;

struct KindTable {
    functions: &'static [&'static str],
    classes: &'static [&'static str],
}

static RUST: KindTable = KindTable {
    functions: &["function_item"],
    classes: &["struct_item", "enum_item", "trait_item"],
};

static JS_FAMILY: KindTable = KindTable {
    functions: &[
        "function_declaration",
        "generator_function_declaration",
        "method_definition",
    ],
    classes: &["class_declaration", "interface_declaration"],
};

static GO: KindTable = KindTable {
    functions: &["function_declaration", "method_declaration"],
    classes: &["type_spec"],
};

static JAVA: KindTable = KindTable {
    functions: &["method_declaration", "constructor_declaration"],
    classes: &[
        "class_declaration",
        "interface_declaration",
        "enum_declaration",
        "record_declaration",
    ],
};

static RUBY: KindTable = KindTable {
    functions: &["method", "singleton_method"],
    classes: &["class", "module"],
};

fn table_for(lang: SupportLang) -> Option<&'static KindTable> {
    match lang {
        SupportLang::Rust => Some(&RUST),
        SupportLang::TypeScript | SupportLang::Tsx | SupportLang::JavaScript => Some(&JS_FAMILY),
        SupportLang::Go => Some(&GO),
        SupportLang::Java => Some(&JAVA),
        SupportLang::Ruby => Some(&RUBY),
        _ => None,
    }
}

/// Extract declarations in source order using the language's kind table.
///
/// # Errors
/// Returns [`ParserError::UnsupportedLanguage`] if `lang` has no table.
pub fn extract(
    tree: &AstTree,
    lang: SupportLang,
    file_path: Option<&str>,
) -> Result<Vec<CodeSymbol>, ParserError> {
    let table =
        table_for(lang).ok_or_else(|| ParserError::UnsupportedLanguage(format!("{lang:?}")))?;
    let mut symbols = Vec::new();
    collect(&tree.root(), table, file_path, &mut symbols);
    Ok(symbols)
}

fn collect<D: ast_grep_core::Doc>(
    node: &Node<D>,
    table: &KindTable,
    file_path: Option<&str>,
    symbols: &mut Vec<CodeSymbol>,
) {
    let node_kind = node.kind();
    let is = |kinds: &[&str]| kinds.iter().any(|k| *k == node_kind.as_ref());
    let kind = if is(table.functions) {
        Some(SymbolKind::Function)
    } else if is(table.classes) {
        Some(SymbolKind::Class)
    } else {
        None
    };
    if let Some(kind) = kind
        && let Some(name) = field_text(node, "name")
    {
        symbols.push(to_symbol(node, name, kind, file_path));
    }
    for child in node.children() {
        collect(&child, table, file_path, symbols);
    }
}
