//! ID prefixes and generation.
//!
//! Every entity ID is `{prefix}-{8 hex chars}`, e.g. `req-a3f8b2c1`. The hex
//! part comes from a random v4 UUID, so IDs are unique per run but never
//! stable across runs; determinism checks must compare entity content, not IDs.

pub const PREFIX_REQUIREMENT: &str = "req";
pub const PREFIX_SYMBOL: &str = "sym";
pub const PREFIX_BUG: &str = "bug";
pub const PREFIX_INTENT: &str = "int";
pub const PREFIX_TEST: &str = "gen";
pub const PREFIX_RUN: &str = "run";

/// Generate a new prefixed ID.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &raw[..8])
}

/// Return the prefix of an ID (`"req"` for `"req-a3f8b2c1"`).
#[must_use]
pub fn prefix_of(id: &str) -> Option<&str> {
    id.split_once('-').map(|(prefix, _)| prefix)
}
