use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Language;

/// A normalized requirement. `description` is always redacted text.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Requirement {
    pub id: String,
    /// Bounded-length summary of the (redacted) description.
    pub title: String,
    pub description: String,
    pub language: Language,
    /// Compliance and category labels, in the order they were assigned.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}
