//! Errors raised by the core types themselves.
//!
//! Stage failures live in `hq-pipeline` (`PipelineError`); this crate only
//! rejects illegal moves of the coordinator state machine.

use thiserror::Error;

use crate::enums::PipelineState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The coordinator tried to leave `from` for anything but its successor.
    #[error("illegal pipeline transition from {from} to {to}")]
    InvalidTransition {
        from: PipelineState,
        to: PipelineState,
    },
}
