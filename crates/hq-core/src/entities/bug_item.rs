use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::BugStatus;

/// A bug ingested from a tracker. `title` and `description` are redacted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BugItem {
    pub id: String,
    /// Provider-native key (`PROJ-123`, work item id), when the provider has one.
    pub external_id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    /// Requirement IDs this bug refers to. Not enforced as a foreign key.
    pub related_requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
