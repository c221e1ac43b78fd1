use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Priority;

/// A planned unit of test coverage, prior to synthesis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TestIntent {
    pub id: String,
    /// Back-reference to a requirement present in the planner's input.
    pub requirement_id: Option<String>,
    pub description: String,
    pub priority: Priority,
    pub parameters: BTreeMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
