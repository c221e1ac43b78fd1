//! Test planner: symbols, requirements, and bugs to [`TestIntent`]s.
//!
//! Pure and deterministic. Intents are emitted in three passes:
//!
//! 1. one per symbol, linked to the requirement with the highest token
//!    overlap (ties go to the earliest requirement, no overlap leaves it
//!    unlinked); high priority if any bug mentions the symbol by name
//! 2. one per requirement that no symbol intent linked to
//! 3. one per bug, always high priority, linked to the first of its
//!    `related_requirements` present in the input, else by token overlap
//!
//! Every `requirement_id` set here names a requirement from the input.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::Utc;
use hq_core::entities::{BugItem, CodeSymbol, Requirement, TestIntent};
use hq_core::enums::Priority;
use hq_core::ids::{PREFIX_INTENT, generate_id};
use serde_json::Value;

pub const PARAM_ORIGIN: &str = "origin";
pub const PARAM_TARGET: &str = "target";
pub const PARAM_SYMBOL_ID: &str = "symbol_id";
pub const PARAM_BUG_ID: &str = "bug_id";
pub const PARAM_FILE_PATH: &str = "file_path";

pub const ORIGIN_SYMBOL: &str = "symbol";
pub const ORIGIN_REQUIREMENT: &str = "requirement";
pub const ORIGIN_BUG: &str = "bug";

const MIN_TOKEN_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "must", "should", "shall", "will", "are",
    "from", "into", "when", "not", "all", "any", "can", "has", "have", "its", "def", "self",
    "return", "none", "true", "false", "pass", "class", "redacted",
];

/// Lowercased alphanumeric tokens of at least three characters, with
/// identifiers split on `_` and stopwords dropped.
fn tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    a.intersection(b).count()
}

struct IndexedRequirement<'a> {
    requirement: &'a Requirement,
    tokens: BTreeSet<String>,
}

/// Index of the best-matching requirement, if any scores above zero.
fn best_match(candidates: &[IndexedRequirement<'_>], query: &BTreeSet<String>) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = overlap(&candidate.tokens, query);
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

fn symbol_tokens(symbol: &CodeSymbol) -> BTreeSet<String> {
    let mut set = tokens(&symbol.name);
    set.extend(tokens(&symbol.code_snippet));
    set
}

/// Whole-identifier match, ignoring ASCII case. `run` does not match `running`.
fn mentions(bug: &BugItem, name: &str) -> bool {
    [bug.title.as_str(), bug.description.as_str()].iter().any(|text| {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .any(|word| word.eq_ignore_ascii_case(name))
    })
}

fn intent(
    requirement_id: Option<String>,
    description: String,
    priority: Priority,
    parameters: BTreeMap<String, Value>,
) -> TestIntent {
    TestIntent {
        id: generate_id(PREFIX_INTENT),
        requirement_id,
        description,
        priority,
        parameters,
        created_at: Utc::now(),
    }
}

/// Derive test intents. See the module docs for the rules.
#[must_use]
pub fn plan(
    requirements: &[Requirement],
    symbols: &[CodeSymbol],
    bugs: &[BugItem],
) -> Vec<TestIntent> {
    let indexed: Vec<IndexedRequirement<'_>> = requirements
        .iter()
        .map(|requirement| IndexedRequirement {
            requirement,
            tokens: tokens(&format!("{} {}", requirement.title, requirement.description)),
        })
        .collect();

    let mut intents = Vec::with_capacity(symbols.len() + requirements.len() + bugs.len());
    let mut linked: HashSet<&str> = HashSet::new();

    for symbol in symbols {
        let matched = best_match(&indexed, &symbol_tokens(symbol)).map(|i| indexed[i].requirement);
        let priority = if bugs.iter().any(|bug| mentions(bug, &symbol.name)) {
            Priority::High
        } else {
            Priority::Medium
        };

        let mut parameters = BTreeMap::new();
        parameters.insert(PARAM_ORIGIN.to_string(), Value::from(ORIGIN_SYMBOL));
        parameters.insert(PARAM_TARGET.to_string(), Value::from(symbol.name.clone()));
        parameters.insert(PARAM_SYMBOL_ID.to_string(), Value::from(symbol.id.clone()));
        if let Some(path) = &symbol.file_path {
            parameters.insert(PARAM_FILE_PATH.to_string(), Value::from(path.clone()));
        }

        let description = match matched {
            Some(req) => format!("Verify {} {} satisfies: {}", symbol.kind, symbol.name, req.title),
            None => format!("Verify {} {} behaves as implemented", symbol.kind, symbol.name),
        };
        if let Some(req) = matched {
            linked.insert(req.id.as_str());
        }
        intents.push(intent(matched.map(|r| r.id.clone()), description, priority, parameters));
    }

    for requirement in requirements {
        if linked.contains(requirement.id.as_str()) {
            continue;
        }
        let mut parameters = BTreeMap::new();
        parameters.insert(PARAM_ORIGIN.to_string(), Value::from(ORIGIN_REQUIREMENT));
        parameters.insert(PARAM_TARGET.to_string(), Value::from(requirement.title.clone()));
        intents.push(intent(
            Some(requirement.id.clone()),
            format!("Verify requirement: {}", requirement.title),
            Priority::Medium,
            parameters,
        ));
    }

    for bug in bugs {
        let related = bug
            .related_requirements
            .iter()
            .find_map(|id| requirements.iter().find(|r| &r.id == id));
        let matched = related.or_else(|| {
            let query = tokens(&format!("{} {}", bug.title, bug.description));
            best_match(&indexed, &query).map(|i| indexed[i].requirement)
        });

        let mut parameters = BTreeMap::new();
        parameters.insert(PARAM_ORIGIN.to_string(), Value::from(ORIGIN_BUG));
        parameters.insert(PARAM_TARGET.to_string(), Value::from(bug.title.clone()));
        parameters.insert(PARAM_BUG_ID.to_string(), Value::from(bug.id.clone()));
        intents.push(intent(
            matched.map(|r| r.id.clone()),
            format!("Regression test for bug: {}", bug.title),
            Priority::High,
            parameters,
        ));
    }

    intents
}

#[cfg(test)]
mod tests {
    use hq_core::enums::{BugStatus, Language, SymbolKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn requirement(id: &str, text: &str) -> Requirement {
        Requirement {
            id: id.into(),
            title: text.into(),
            description: text.into(),
            language: Language::En,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn symbol(name: &str, snippet: &str) -> CodeSymbol {
        CodeSymbol {
            id: format!("sym-{name}"),
            name: name.into(),
            kind: SymbolKind::Function,
            file_path: Some("svc.py".into()),
            start_line: 1,
            end_line: 2,
            code_snippet: snippet.into(),
        }
    }

    fn bug(title: &str, related: &[&str]) -> BugItem {
        BugItem {
            id: format!("bug-{}", title.len()),
            external_id: None,
            title: title.into(),
            description: String::new(),
            status: BugStatus::Open,
            related_requirements: related.iter().map(|s| (*s).to_string()).collect(),
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    fn shape(intents: &[TestIntent]) -> Vec<(Option<String>, Priority, String)> {
        intents
            .iter()
            .map(|i| (i.requirement_id.clone(), i.priority, i.description.clone()))
            .collect()
    }

    #[test]
    fn tokenizer_splits_identifiers_and_drops_noise() {
        let t = tokens("def load_patient_record(self): return DB");
        assert_eq!(
            t.into_iter().collect::<Vec<_>>(),
            vec!["load", "patient", "record"]
        );
    }

    #[test]
    fn symbols_link_to_best_requirement() {
        let reqs = vec![
            requirement("req-a", "Export audit logs nightly"),
            requirement("req-b", "Patient record lookup by identifier"),
        ];
        let syms = vec![symbol("lookup_patient", "def lookup_patient(identifier):\n    ...")];

        let intents = plan(&reqs, &syms, &[]);

        assert_eq!(intents[0].requirement_id.as_deref(), Some("req-b"));
        assert_eq!(intents[0].priority, Priority::Medium);
        assert_eq!(intents[0].parameters[PARAM_ORIGIN], Value::from("symbol"));
        // req-a was not linked by any symbol so it gets its own intent
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[1].requirement_id.as_deref(), Some("req-a"));
    }

    #[test]
    fn ties_go_to_earliest_requirement() {
        let reqs = vec![
            requirement("req-1", "discharge summary"),
            requirement("req-2", "discharge workflow"),
        ];
        let intents = plan(&reqs, &[symbol("discharge", "def discharge(): ...")], &[]);
        assert_eq!(intents[0].requirement_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn symbol_without_overlap_is_unlinked() {
        let reqs = vec![requirement("req-1", "Billing export")];
        let intents = plan(&reqs, &[symbol("zzz", "def zzz(): ...")], &[]);
        assert_eq!(intents[0].requirement_id, None);
    }

    #[test]
    fn bug_intents_are_high_priority_and_prefer_related_ids() {
        let reqs = vec![
            requirement("req-1", "Appointment booking"),
            requirement("req-2", "Lab results display"),
        ];
        let bugs = vec![
            bug("Appointment booking crashes", &["req-unknown", "req-2"]),
            bug("Appointment booking double books", &[]),
            bug("Unrelated flicker", &["req-missing"]),
        ];

        let intents = plan(&reqs, &[], &bugs);
        let bug_intents: Vec<_> = intents
            .iter()
            .filter(|i| i.parameters[PARAM_ORIGIN] == Value::from("bug"))
            .collect();

        assert_eq!(bug_intents.len(), 3);
        assert!(bug_intents.iter().all(|i| i.priority == Priority::High));
        assert_eq!(bug_intents[0].requirement_id.as_deref(), Some("req-2"));
        assert_eq!(bug_intents[1].requirement_id.as_deref(), Some("req-1"));
        assert_eq!(bug_intents[2].requirement_id, None);
    }

    #[test]
    fn symbol_named_in_bug_is_high_priority() {
        let intents = plan(
            &[],
            &[symbol("save_patient", "def save_patient(p): ...")],
            &[bug("save_patient drops middle name", &[])],
        );
        assert_eq!(intents[0].priority, Priority::High);
    }

    #[test]
    fn symbol_name_inside_longer_word_is_not_a_mention() {
        let intents = plan(
            &[],
            &[symbol("get", "def get(): ..."), symbol("run", "def run(): ...")],
            &[bug("Target service keeps running out of memory", &[])],
        );
        assert_eq!(intents[0].priority, Priority::Medium);
        assert_eq!(intents[1].priority, Priority::Medium);
    }

    #[test]
    fn mention_ignores_case_and_punctuation() {
        let mut report = bug("Lookup fails", &[]);
        report.description = "Calling Lookup_Patient(42) returns nothing.".into();
        let intents = plan(&[], &[symbol("lookup_patient", "...")], &[report]);
        assert_eq!(intents[0].priority, Priority::High);
    }

    #[test]
    fn every_link_points_into_input() {
        let reqs = vec![requirement("req-1", "Vitals chart"), requirement("req-2", "Vitals alerts")];
        let syms = vec![symbol("chart_vitals", "..."), symbol("other", "...")];
        let bugs = vec![bug("Vitals alerts late", &["req-404"])];
        let ids: HashSet<_> = reqs.iter().map(|r| r.id.clone()).collect();

        for intent in plan(&reqs, &syms, &bugs) {
            if let Some(id) = intent.requirement_id {
                assert!(ids.contains(&id), "dangling requirement id {id}");
            }
        }
    }

    #[test]
    fn planning_is_deterministic() {
        let reqs = vec![
            requirement("req-1", "Patient search by name"),
            requirement("req-2", "FHIR export"),
        ];
        let syms = vec![
            symbol("search_patient", "def search_patient(name): ..."),
            symbol("export_bundle", "def export_bundle(): ..."),
        ];
        let bugs = vec![bug("search_patient slow", &[]), bug("export fails", &["req-2"])];

        let first = plan(&reqs, &syms, &bugs);
        let second = plan(&reqs, &syms, &bugs);

        assert_eq!(shape(&first), shape(&second));
        // both requirements are linked by a symbol, so no requirement intents
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn empty_input_plans_nothing() {
        assert!(plan(&[], &[], &[]).is_empty());
    }
}
