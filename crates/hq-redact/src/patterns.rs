//! PHI/PII categories and the patterns that recognize them.
//!
//! Categories are applied in the order of [`PhiCategory::ALL`]. Placeholders
//! contain no digits, no `@`, and no word-bounded `MRN`, so no pattern can
//! match a placeholder.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+").expect("email pattern compiles")
});

// Optional +1 country code, then 3-3-4 digits with `-`, `.`, or whitespace
// separators. The area code may be parenthesized.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b")
        .expect("phone pattern compiles")
});

static SSN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern compiles"));

static MRN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bMRN[:#\s]*[A-Za-z0-9-]{4,20}\b").expect("mrn pattern compiles")
});

// ISO, slashed, dotted/dashed day-month-year, and "Jan 5, 2021" forms.
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:\d{4}-\d{2}-\d{2}",
        r"|\d{1,2}/\d{1,2}/\d{2,4}",
        r"|\d{1,2}[.-]\d{1,2}[.-]\d{4}",
        r"|(?i:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4})\b",
    ))
    .expect("date pattern compiles")
});

/// A class of sensitive token the gate masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhiCategory {
    Email,
    Phone,
    Ssn,
    Mrn,
    Date,
}

impl PhiCategory {
    /// Every category, in the order redaction applies them.
    pub const ALL: [Self; 5] = [Self::Email, Self::Phone, Self::Ssn, Self::Mrn, Self::Date];

    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Email => "[REDACTED_EMAIL]",
            Self::Phone => "[REDACTED_PHONE]",
            Self::Ssn => "[REDACTED_SSN]",
            Self::Mrn => "[REDACTED_MRN]",
            Self::Date => "[REDACTED_DATE]",
        }
    }

    #[must_use]
    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Email => &EMAIL,
            Self::Phone => &PHONE,
            Self::Ssn => &SSN,
            Self::Mrn => &MRN,
            Self::Date => &DATE,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Ssn => "ssn",
            Self::Mrn => "mrn",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for PhiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
