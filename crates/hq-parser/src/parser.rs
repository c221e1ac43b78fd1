//! ast-grep wrapper, language detection, and syntax-error detection.

use ast_grep_core::Node;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::SupportLang;

/// The concrete AST tree type returned by `parse_source`.
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// Detect the programming language from a file path extension.
///
/// Returns `None` for unsupported or unrecognized extensions.
#[must_use]
pub fn detect_language(file_path: &str) -> Option<SupportLang> {
    let (_, ext) = file_path.rsplit_once('.')?;
    match ext {
        "py" | "pyi" => Some(SupportLang::Python),
        "rs" => Some(SupportLang::Rust),
        "ts" => Some(SupportLang::TypeScript),
        "tsx" => Some(SupportLang::Tsx),
        "js" | "mjs" | "cjs" => Some(SupportLang::JavaScript),
        "go" => Some(SupportLang::Go),
        "java" => Some(SupportLang::Java),
        "rb" => Some(SupportLang::Ruby),
        _ => None,
    }
}

/// Parse source code into an ast-grep tree for the given language.
#[must_use]
pub fn parse_source(source: &str, lang: SupportLang) -> AstTree {
    use ast_grep_language::LanguageExt;
    lang.ast_grep(source)
}

/// First syntax error in the tree as `(line, snippet)`, 1-based.
///
/// tree-sitter recovers from malformed input instead of failing: it wraps
/// unparseable spans in `ERROR` nodes and inserts zero-width MISSING leaves.
/// Either one marks the parse as failed.
#[must_use]
pub fn first_syntax_error(tree: &AstTree) -> Option<(usize, String)> {
    tree.root()
        .children()
        .find_map(|child| find_error(&child))
}

fn find_error<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<(usize, String)> {
    let text = node.text();
    let is_missing = text.is_empty() && node.children().next().is_none();
    if node.kind().as_ref() == "ERROR" || is_missing {
        let snippet: String = text.chars().take(40).collect();
        return Some((node.start_pos().line() + 1, snippet));
    }
    node.children().find_map(|child| find_error(&child))
}
