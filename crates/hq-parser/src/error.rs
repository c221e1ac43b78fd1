//! Parser error types for hq-parser.

/// Errors that can occur during source code parsing and extraction.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Parse failed for {language}: {message}")]
    ParseFailed { language: String, message: String },

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),
}
