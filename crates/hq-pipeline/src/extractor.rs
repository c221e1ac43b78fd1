//! Code-unit stage: load each unit through the [`CodeStore`], then extract
//! symbols with `hq-parser`.
//!
//! Units are processed concurrently but results come back in input order. A
//! unit that cannot be loaded or parsed contributes no symbols at all.

use std::time::Duration;

use futures::future::join_all;
use hq_core::entities::CodeSymbol;

use crate::code_store::CodeStore;
use crate::error::PipelineError;

/// One code unit to analyse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeUnit {
    /// A path resolved through the configured code store.
    Path(String),
    /// Source text supplied directly. `name` (if any) picks the language by
    /// extension and becomes the symbols' `file_path`; otherwise Python.
    Inline {
        name: Option<String>,
        source: String,
    },
}

impl CodeUnit {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Inline { name, .. } => name.as_deref().unwrap_or("<inline>"),
        }
    }
}

/// Symbols from every unit that succeeded, plus the failure of every unit
/// that did not.
#[derive(Debug, Default)]
pub struct Extraction {
    pub symbols: Vec<CodeSymbol>,
    pub failures: Vec<(String, PipelineError)>,
}

pub struct SymbolExtractor<'a> {
    store: &'a dyn CodeStore,
    timeout: Duration,
}

impl<'a> SymbolExtractor<'a> {
    #[must_use]
    pub fn new(store: &'a dyn CodeStore, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Extract symbols from one unit. Either every symbol in the unit is
    /// returned or an error is; never a partial list.
    ///
    /// # Errors
    ///
    /// [`PipelineError::SourceUnavailable`] if the unit cannot be loaded in
    /// time, [`PipelineError::ParseFailure`] if it is not valid source.
    pub async fn extract_unit(&self, unit: &CodeUnit) -> Result<Vec<CodeSymbol>, PipelineError> {
        let (source, file_path) = match unit {
            CodeUnit::Path(path) => (self.load(path).await?, Some(path.as_str())),
            CodeUnit::Inline { name, source } => (source.clone(), name.as_deref()),
        };
        hq_parser::extract_unit(&source, file_path).map_err(|e| PipelineError::ParseFailure {
            unit: unit.label().to_string(),
            reason: e.to_string(),
        })
    }

    /// Extract every unit concurrently, keeping input order in the output.
    pub async fn extract_all(&self, units: &[CodeUnit]) -> Extraction {
        let results = join_all(units.iter().map(|unit| self.extract_unit(unit))).await;

        let mut extraction = Extraction::default();
        for (unit, result) in units.iter().zip(results) {
            match result {
                Ok(symbols) => extraction.symbols.extend(symbols),
                Err(e) => {
                    tracing::warn!(unit = unit.label(), %e, "code unit yielded no symbols");
                    extraction.failures.push((unit.label().to_string(), e));
                }
            }
        }
        extraction
    }

    async fn load(&self, path: &str) -> Result<String, PipelineError> {
        match tokio::time::timeout(self.timeout, self.store.load(path)).await {
            Ok(result) => result,
            Err(_) => Err(PipelineError::SourceUnavailable {
                path: path.to_string(),
                reason: format!("{} store timed out after {:?}", self.store.name(), self.timeout),
            }),
        }
    }
}
