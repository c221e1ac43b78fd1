pub mod coverage;
pub mod dispatch;
pub mod dry_run;
pub mod extract;
pub mod redact;
pub mod run;
pub mod scan;
pub mod schema;
