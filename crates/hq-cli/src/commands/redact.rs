use std::io::Read;

use anyhow::Context;
use hq_redact::PhiCategory;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RedactArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RedactResponse {
    redacted: String,
    /// Categories found in the input. The matched text is never echoed.
    categories: Vec<PhiCategory>,
}

/// Handle `hqa redact`.
pub fn handle(args: &RedactArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = match &args.text {
        Some(text) => text.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read text from stdin")?;
            buffer
        }
    };

    output(
        &RedactResponse {
            categories: hq_redact::find_phi(&text),
            redacted: hq_redact::redact(&text),
        },
        flags.format,
    )
}
