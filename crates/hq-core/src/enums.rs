//! Enums for healthqa entities and the coordinator state machine.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! [`PipelineState`] provides `allowed_next_states()` so the coordinator can
//! enforce its strictly sequential run order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SymbolKind
// ---------------------------------------------------------------------------

/// Kind of an extracted code symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
}

impl SymbolKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BugStatus
// ---------------------------------------------------------------------------

/// Tracker status of a bug.
///
/// Ingestors never map provider-specific states onto this enum; every
/// ingested bug starts (and stays) `Open`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    #[default]
    Open,
    Triaged,
    InProgress,
    Resolved,
    Closed,
}

impl BugStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Triaged => "triaged",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority of a planned test intent.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Script family of a requirement text.
///
/// `En` is the primary (Latin) family, `Hi` the secondary (Devanagari) one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// Coordinator state for a single run.
///
/// ```text
/// idle → parsing_requirements → analyzing_code → fetching_bugs → planning
///      → synthesizing → validating → exporting → done
/// ```
///
/// Strictly linear: every state has exactly one successor and none is
/// re-entered within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    ParsingRequirements,
    AnalyzingCode,
    FetchingBugs,
    Planning,
    Synthesizing,
    Validating,
    Exporting,
    Done,
}

impl PipelineState {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::ParsingRequirements],
            Self::ParsingRequirements => &[Self::AnalyzingCode],
            Self::AnalyzingCode => &[Self::FetchingBugs],
            Self::FetchingBugs => &[Self::Planning],
            Self::Planning => &[Self::Synthesizing],
            Self::Synthesizing => &[Self::Validating],
            Self::Validating => &[Self::Exporting],
            Self::Exporting => &[Self::Done],
            Self::Done => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Move to `next`, rejecting anything but the single successor.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if `next` is not the successor
    /// of `self`.
    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ParsingRequirements => "parsing_requirements",
            Self::AnalyzingCode => "analyzing_code",
            Self::FetchingBugs => "fetching_bugs",
            Self::Planning => "planning",
            Self::Synthesizing => "synthesizing",
            Self::Validating => "validating",
            Self::Exporting => "exporting",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_walks_every_state_once() {
        let order = [
            PipelineState::ParsingRequirements,
            PipelineState::AnalyzingCode,
            PipelineState::FetchingBugs,
            PipelineState::Planning,
            PipelineState::Synthesizing,
            PipelineState::Validating,
            PipelineState::Exporting,
            PipelineState::Done,
        ];
        let mut state = PipelineState::Idle;
        for next in order {
            state = state.transition(next).expect("linear transition");
        }
        assert_eq!(state, PipelineState::Done);
        assert!(PipelineState::Done.allowed_next_states().is_empty());
    }

    #[test]
    fn pipeline_rejects_skips_and_reentry() {
        assert!(!PipelineState::Idle.can_transition_to(PipelineState::Planning));
        assert!(!PipelineState::Validating.can_transition_to(PipelineState::Validating));
        assert!(!PipelineState::Exporting.can_transition_to(PipelineState::Synthesizing));

        let err = PipelineState::Planning
            .transition(PipelineState::Exporting)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: PipelineState::Planning,
                to: PipelineState::Exporting,
            }
        );
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&BugStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&PipelineState::ParsingRequirements).unwrap(),
            "\"parsing_requirements\""
        );
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn defaults_match_ingest_contract() {
        assert_eq!(BugStatus::default(), BugStatus::Open);
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn priority_orders_low_to_high() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}
