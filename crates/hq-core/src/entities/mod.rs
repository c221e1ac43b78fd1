//! Entity structs for every healthqa pipeline artifact.
//!
//! Each entity is created once per run by its owning pipeline stage. All
//! structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON output
//! and schema validation.

mod bug_item;
mod code_symbol;
mod requirement;
mod test_intent;

pub use bug_item::BugItem;
pub use code_symbol::CodeSymbol;
pub use generated_test::{GeneratedTest, METADATA_PATH};
pub use requirement::Requirement;
pub use test_intent::TestIntent;
