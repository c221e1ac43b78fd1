//! Requirement normalizer: raw requirement strings to tagged [`Requirement`]s.

use chrono::Utc;
use hq_core::entities::Requirement;
use hq_core::enums::Language;
use hq_core::ids::{PREFIX_REQUIREMENT, generate_id};

pub const TAG_HIPAA: &str = "HIPAA";
pub const TAG_FHIR: &str = "FHIR";
pub const TAG_HINDI: &str = "hindi";

/// Case-insensitive keyword → tag table, checked in order.
const KEYWORD_TAGS: &[(&str, &str)] = &[
    ("patient", TAG_HIPAA),
    ("phi", TAG_HIPAA),
    ("fhir", TAG_FHIR),
];

const ELLIPSIS: &str = "...";

// ---------------------------------------------------------------------------
// Language detection
// ---------------------------------------------------------------------------

/// Pluggable script-family classifier. Returning `None` defers to
/// [`ScriptRangeDetector`].
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<Language>;
}

/// Deterministic fallback: any character in the Devanagari block
/// (U+0900..=U+097F) makes the text [`Language::Hi`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptRangeDetector;

impl LanguageDetector for ScriptRangeDetector {
    fn detect(&self, text: &str) -> Option<Language> {
        Some(classify_by_script(text))
    }
}

fn classify_by_script(text: &str) -> Language {
    if text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)) {
        Language::Hi
    } else {
        Language::En
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

pub struct RequirementNormalizer {
    detector: Box<dyn LanguageDetector>,
    title_max_chars: usize,
}

impl RequirementNormalizer {
    #[must_use]
    pub fn new(detector: Box<dyn LanguageDetector>, title_max_chars: usize) -> Self {
        Self {
            detector,
            title_max_chars,
        }
    }

    /// Normalize every raw string, in input order. Nothing is merged or
    /// deduplicated.
    #[must_use]
    pub fn normalize(&self, raw: &[String]) -> Vec<Requirement> {
        raw.iter().map(|text| self.normalize_one(text)).collect()
    }

    #[must_use]
    pub fn normalize_one(&self, text: &str) -> Requirement {
        let language = self
            .detector
            .detect(text)
            .unwrap_or_else(|| classify_by_script(text));
        let description = hq_redact::redact(text);
        let title = truncate_title(&description, self.title_max_chars);

        Requirement {
            id: generate_id(PREFIX_REQUIREMENT),
            title,
            description,
            language,
            tags: tags_for(text, language),
            created_at: Utc::now(),
        }
    }
}

impl Default for RequirementNormalizer {
    fn default() -> Self {
        Self::new(Box::new(ScriptRangeDetector), 80)
    }
}

/// First `max_chars` characters, with `...` appended when anything was cut.
#[must_use]
pub fn truncate_title(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

fn tags_for(text: &str, language: Language) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for (keyword, tag) in KEYWORD_TAGS {
        if lower.contains(keyword) && !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
    }
    if language == Language::Hi {
        tags.push(TAG_HINDI.to_string());
    }
    tags
}
