//! # hq-core
//!
//! Core types, ID generation, and error types for healthqa.
//!
//! This crate provides the foundational types shared across all healthqa crates:
//! - Entity structs produced by each pipeline stage (requirements, symbols,
//!   bugs, intents, generated tests)
//! - Enums, including the coordinator state machine
//! - ID prefix constants and generation helpers
//! - Cross-cutting error types
//! - Response types returned by the `hqa` binary

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
