//! `redact` and the guard built on the same patterns.

use regex::NoExpand;

use crate::error::PhiDetected;
use crate::patterns::PhiCategory;

// A single ordered pass can, in rare adjacency cases, expose a new match for
// an earlier category. Passes repeat until the text stops changing.
const MAX_PASSES: usize = 4;

/// Replace every PHI/PII match with its category placeholder.
///
/// Total and deterministic. Empty input comes back unchanged, and
/// `redact(&redact(t)) == redact(t)` for every `t`.
#[must_use]
pub fn redact(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut current = redact_pass(text);
    for _ in 1..MAX_PASSES {
        let next = redact_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn redact_pass(text: &str) -> String {
    let mut out = text.to_string();
    for category in PhiCategory::ALL {
        out = category
            .pattern()
            .replace_all(&out, NoExpand(category.placeholder()))
            .into_owned();
    }
    out
}

/// Categories with at least one match in `text`, in application order.
#[must_use]
pub fn find_phi(text: &str) -> Vec<PhiCategory> {
    PhiCategory::ALL
        .into_iter()
        .filter(|category| category.pattern().is_match(text))
        .collect()
}

#[must_use]
pub fn contains_phi(text: &str) -> bool {
    PhiCategory::ALL
        .iter()
        .any(|category| category.pattern().is_match(text))
}

/// Reject `text` if any redaction pattern still matches it.
///
/// # Errors
///
/// Returns [`PhiDetected`] naming the matched categories.
pub fn assert_clean(text: &str) -> Result<(), PhiDetected> {
    let categories = find_phi(text);
    if categories.is_empty() {
        Ok(())
    } else {
        Err(PhiDetected { categories })
    }
}
