//! Test synthesizer: one [`TestIntent`] in, one [`GeneratedTest`] out.
//!
//! Whatever the [`CodeModel`] returns is redacted, then checked with
//! [`hq_redact::assert_clean`]. Only code that passes the guard is kept or
//! written to disk. Code that still fails after a second redaction is
//! rejected with [`PipelineError::PhiDetected`] and never persisted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use hq_config::{ModelBackend, ModelConfig};
use hq_core::entities::{GeneratedTest, METADATA_PATH, TestIntent};
use hq_core::ids::{PREFIX_TEST, generate_id};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PipelineError;
use crate::planner::PARAM_TARGET;

pub const TEST_LANGUAGE: &str = "python";

const SLUG_MAX_CHARS: usize = 40;

// ── Code model collaborator ────────────────────────────────────────

#[async_trait]
pub trait CodeModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produce test source for `intent`. The output is untrusted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ProviderUnreachable`] when the model fails.
    async fn generate(&self, intent: &TestIntent) -> Result<String, PipelineError>;
}

/// Deterministic pytest template. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateModel;

impl TemplateModel {
    #[must_use]
    pub fn render(intent: &TestIntent) -> String {
        let target = intent
            .parameters
            .get(PARAM_TARGET)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let requirement = intent.requirement_id.as_deref().unwrap_or("");
        format!(
            "# Generated by healthqa for intent {intent_id}\n\
             \n\
             \n\
             def test_{slug}():\n    \
                 description = {description}\n    \
                 requirement_id = {requirement}\n    \
                 target = {target}\n    \
                 assert isinstance(description, str)\n    \
                 assert isinstance(requirement_id, str)\n    \
                 assert isinstance(target, str)\n",
            intent_id = intent.id,
            slug = slug(intent),
            description = python_literal(&intent.description),
            requirement = python_literal(requirement),
            target = python_literal(target),
        )
    }
}

#[async_trait]
impl CodeModel for TemplateModel {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, intent: &TestIntent) -> Result<String, PipelineError> {
        Ok(Self::render(intent))
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    code: String,
}

/// HTTP code model: `POST {endpoint}/generate` with `{"model", "prompt"}`,
/// answering `{"code"}`.
pub struct RemoteCodeModel {
    http: reqwest::Client,
    endpoint: String,
    model_id: String,
    api_key: String,
}

impl RemoteCodeModel {
    #[must_use]
    pub fn new(config: &ModelConfig, timeout: Duration) -> Self {
        Self {
            http: hq_trackers::build_client(timeout),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

fn prompt_for(intent: &TestIntent) -> String {
    format!(
        "Write a single self-contained pytest test function.\nIntent: {}\nPriority: {}\nParameters: {}",
        intent.description,
        intent.priority,
        serde_json::to_string(&intent.parameters).unwrap_or_default()
    )
}

#[async_trait]
impl CodeModel for RemoteCodeModel {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn generate(&self, intent: &TestIntent) -> Result<String, PipelineError> {
        let url = format!("{}/generate", self.endpoint);
        let mut request = self.http.post(&url).json(&GenerateRequest {
            model: &self.model_id,
            prompt: prompt_for(intent),
        });
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| PipelineError::unreachable("code model", e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::unreachable(
                "code model",
                format!("model endpoint returned {status}"),
            ));
        }
        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| PipelineError::unreachable("code model", e))?;
        Ok(body.code)
    }
}

/// Build the model selected by configuration.
///
/// # Errors
///
/// Returns [`PipelineError::ProviderUnconfigured`] for a remote backend with
/// no endpoint.
pub fn code_model_from_config(
    config: &ModelConfig,
    timeout: Duration,
) -> Result<Box<dyn CodeModel>, PipelineError> {
    match config.backend {
        ModelBackend::Template => Ok(Box::new(TemplateModel)),
        ModelBackend::Remote => {
            if !config.is_configured() {
                return Err(PipelineError::unconfigured(
                    "code model",
                    "endpoint and model_id are required",
                ));
            }
            Ok(Box::new(RemoteCodeModel::new(config, timeout)))
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Double-quoted Python string literal for `text`.
fn python_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// ASCII identifier fragment from the intent's target (or description).
#[must_use]
pub fn slug(intent: &TestIntent) -> String {
    let source = intent
        .parameters
        .get(PARAM_TARGET)
        .and_then(Value::as_str)
        .unwrap_or(intent.description.as_str());
    let mut out = String::new();
    for c in source.chars() {
        if out.len() >= SLUG_MAX_CHARS {
            break;
        }
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "intent".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Redact, then guard. A second redaction is attempted before giving up.
///
/// # Errors
///
/// [`PipelineError::PhiDetected`] if the text cannot be made clean.
pub fn sanitize(raw: &str) -> Result<String, PipelineError> {
    let code = hq_redact::redact(raw);
    if hq_redact::assert_clean(&code).is_ok() {
        return Ok(code);
    }
    let code = hq_redact::redact(&code);
    hq_redact::assert_clean(&code)?;
    Ok(code)
}

// ── Synthesizer ────────────────────────────────────────────────────

/// Final check on model output before it is kept. [`sanitize`] unless
/// replaced with [`TestSynthesizer::with_guard`].
pub type Guard = fn(&str) -> Result<String, PipelineError>;

/// Tests that passed the guard, and the intents that did not.
#[derive(Debug, Default)]
pub struct Synthesis {
    pub tests: Vec<GeneratedTest>,
    pub rejected: Vec<(String, PipelineError)>,
}

pub struct TestSynthesizer<'a> {
    model: &'a dyn CodeModel,
    output_dir: Option<PathBuf>,
    timeout: Duration,
    guard: Guard,
}

impl<'a> TestSynthesizer<'a> {
    /// `output_dir` of `None` keeps tests in memory only.
    #[must_use]
    pub fn new(model: &'a dyn CodeModel, output_dir: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            model,
            output_dir,
            timeout,
            guard: sanitize,
        }
    }

    #[must_use]
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    /// Synthesize one test. `index` disambiguates file names within a run.
    ///
    /// A failing or slow model falls back to [`TemplateModel`].
    ///
    /// # Errors
    ///
    /// [`PipelineError::PhiDetected`] if the code cannot pass the guard.
    pub async fn synthesize(
        &self,
        intent: &TestIntent,
        index: usize,
    ) -> Result<GeneratedTest, PipelineError> {
        let raw = match tokio::time::timeout(self.timeout, self.model.generate(intent)).await {
            Ok(Ok(code)) => code,
            Ok(Err(e)) => {
                tracing::warn!(model = self.model.name(), intent = %intent.id, %e, "model failed, using template");
                TemplateModel::render(intent)
            }
            Err(_) => {
                tracing::warn!(model = self.model.name(), intent = %intent.id, "model timed out, using template");
                TemplateModel::render(intent)
            }
        };
        let code = (self.guard)(&raw)?;

        let mut metadata = BTreeMap::new();
        if let Some(dir) = &self.output_dir {
            let path = dir.join(format!("test_{}_{index}.py", slug(intent)));
            match write_test(&path, &code).await {
                Ok(()) => {
                    metadata.insert(METADATA_PATH.to_string(), path.to_string_lossy().into_owned());
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "could not write generated test");
                }
            }
        }

        Ok(GeneratedTest {
            id: generate_id(PREFIX_TEST),
            intent_id: intent.id.clone(),
            code,
            language: TEST_LANGUAGE.to_string(),
            metadata,
            created_at: Utc::now(),
            passed: None,
            last_run_at: None,
        })
    }

    /// Synthesize every intent concurrently; output keeps intent order.
    pub async fn synthesize_all(&self, intents: &[TestIntent]) -> Synthesis {
        let results = join_all(
            intents
                .iter()
                .enumerate()
                .map(|(index, intent)| self.synthesize(intent, index)),
        )
        .await;

        let mut synthesis = Synthesis::default();
        for (intent, result) in intents.iter().zip(results) {
            match result {
                Ok(test) => synthesis.tests.push(test),
                Err(e) => {
                    tracing::warn!(intent = %intent.id, %e, "generated test rejected");
                    synthesis.rejected.push((intent.id.clone(), e));
                }
            }
        }
        synthesis
    }
}

async fn write_test(path: &Path, code: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, code).await
}
