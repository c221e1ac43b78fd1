//! # hq-parser
//!
//! ast-grep-based code symbol extraction for healthqa.
//!
//! - **Python** (the primary target): every `def` and `class`, at any depth.
//! - **Kind-table languages** (Rust, TypeScript/TSX/JS, Go, Java, Ruby):
//!   named function-like and class-like declarations.
//!
//! Extraction is fail-closed. A unit with any syntax error yields
//! [`ParserError::ParseFailed`], never a partial symbol list.

mod error;
pub mod extractors;
pub mod parser;

use ast_grep_language::SupportLang;
use hq_core::entities::CodeSymbol;

pub use error::ParserError;
pub use parser::{detect_language, first_syntax_error, parse_source};

/// Parse `source` as `lang` and extract its declarations.
///
/// # Errors
/// - [`ParserError::ParseFailed`] if the tree contains a syntax error.
/// - [`ParserError::UnsupportedLanguage`] if `lang` has no extractor.
pub fn extract_symbols(
    source: &str,
    lang: SupportLang,
    file_path: Option<&str>,
) -> Result<Vec<CodeSymbol>, ParserError> {
    let tree = parse_source(source, lang);
    if let Some((line, near)) = first_syntax_error(&tree) {
        return Err(ParserError::ParseFailed {
            language: format!("{lang:?}"),
            message: format!("syntax error at line {line} near {:?}", hq_redact::redact(&near)),
        });
    }
    let symbols = extractors::extract(&tree, lang, file_path)?;
    tracing::debug!(
        language = ?lang,
        file_path = file_path.unwrap_or("<inline>"),
        symbols = symbols.len(),
        "extracted code symbols"
    );
    Ok(symbols)
}

/// Extract from a unit whose language is inferred from `file_path`, falling
/// back to Python for inline units with no recognizable extension.
///
/// # Errors
/// Same as [`extract_symbols`].
pub fn extract_unit(source: &str, file_path: Option<&str>) -> Result<Vec<CodeSymbol>, ParserError> {
    let lang = match file_path {
        Some(path) => detect_language(path)
            .ok_or_else(|| ParserError::UnsupportedLanguage(path.to_string()))?,
        None => SupportLang::Python,
    };
    extract_symbols(source, lang, file_path)
}
