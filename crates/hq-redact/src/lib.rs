//! # hq-redact
//!
//! The redaction gate every text-bearing healthqa artifact passes through.
//!
//! - [`redact`] masks emails, phone numbers, SSN-shaped government IDs,
//!   medical record numbers, and calendar dates with category placeholders
//!   such as `[REDACTED_EMAIL]`. It is total, deterministic, and idempotent.
//! - [`assert_clean`] re-scans with the same patterns and rejects text that
//!   still matches any of them. It never redacts.
//!
//! The patterns are intentionally conservative. They catch obvious shapes and
//! are not a compliance mechanism on their own.

mod error;
mod gate;
mod patterns;

pub use error::PhiDetected;
pub use gate::{assert_clean, contains_phi, find_phi, redact};
pub use patterns::PhiCategory;
