//! Python extractor: functions and classes at any depth.
//!
//! Unlike a module-level API listing, every `function_definition` and
//! `class_definition` is a coverable unit here, so methods and nested
//! functions each get their own symbol. Decorators are not part of the
//! snippet; a `decorated_definition` is walked through to its definition.

use ast_grep_core::Node;
use hq_core::entities::CodeSymbol;
use hq_core::enums::SymbolKind;

use super::{field_text, to_symbol};
use crate::parser::AstTree;

/// Extract all functions and classes in source order.
pub fn extract(tree: &AstTree, file_path: Option<&str>) -> Vec<CodeSymbol> {
    let mut symbols = Vec::new();
    collect(&tree.root(), file_path, &mut symbols);
    symbols
}

fn collect<D: ast_grep_core::Doc>(
    node: &Node<D>,
    file_path: Option<&str>,
    symbols: &mut Vec<CodeSymbol>,
) {
    let kind = match node.kind().as_ref() {
        "function_definition" => Some(SymbolKind::Function),
        "class_definition" => Some(SymbolKind::Class),
        _ => None,
    };
    if let Some(kind) = kind
        && let Some(name) = field_text(node, "name")
    {
        symbols.push(to_symbol(node, name, kind, file_path));
    }
    for child in node.children() {
        collect(&child, file_path, symbols);
    }
}
