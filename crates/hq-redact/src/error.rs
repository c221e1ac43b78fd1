//! Guard rejection type.

use thiserror::Error;

use crate::patterns::PhiCategory;

/// Text about to be persisted or executed still matches a PHI/PII pattern.
///
/// Only the matched categories are carried, never the matched text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("text contains patterns that resemble PHI/PII ({}); refusing to persist or execute it", format_categories(.categories))]
pub struct PhiDetected {
    pub categories: Vec<PhiCategory>,
}

fn format_categories(categories: &[PhiCategory]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
