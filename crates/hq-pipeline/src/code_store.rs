//! Code/text-store collaborator: `load(path) -> text`.
//!
//! The addressing scheme is opaque to callers. [`LocalCodeStore`] reads the
//! filesystem, [`ObjectCodeStore`] fetches `{endpoint}/{bucket}/{path}` over
//! HTTP, and [`InMemoryCodeStore`] serves fixed sources for tests and dry runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use hq_config::{StorageBackend, StorageConfig};

use crate::error::PipelineError;

#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Store name for logs.
    fn name(&self) -> &'static str;

    /// Load the full text stored under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::SourceUnavailable`] when the text cannot be read.
    async fn load(&self, path: &str) -> Result<String, PipelineError>;
}

fn unavailable(path: &str, reason: impl ToString) -> PipelineError {
    PipelineError::SourceUnavailable {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

// ── Local ──────────────────────────────────────────────────────────

/// Filesystem store. `file://` prefixes are stripped; relative paths resolve
/// against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct LocalCodeStore {
    root: Option<PathBuf>,
}

impl LocalCodeStore {
    #[must_use]
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let stripped = path.strip_prefix("file://").unwrap_or(path);
        let candidate = Path::new(stripped);
        match &self.root {
            Some(root) if candidate.is_relative() => root.join(candidate),
            _ => candidate.to_path_buf(),
        }
    }
}

#[async_trait]
impl CodeStore for LocalCodeStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn load(&self, path: &str) -> Result<String, PipelineError> {
        tokio::fs::read_to_string(self.resolve(path))
            .await
            .map_err(|e| unavailable(path, e))
    }
}

// ── Object ─────────────────────────────────────────────────────────

pub struct ObjectCodeStore {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
}

impl ObjectCodeStore {
    #[must_use]
    pub fn new(endpoint: &str, bucket: &str, timeout: Duration) -> Self {
        Self {
            http: hq_trackers::build_client(timeout),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        let key = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/{key}",
            self.endpoint,
            urlencoding::encode(&self.bucket)
        )
    }
}

#[async_trait]
impl CodeStore for ObjectCodeStore {
    fn name(&self) -> &'static str {
        "object"
    }

    async fn load(&self, path: &str) -> Result<String, PipelineError> {
        let resp = self
            .http
            .get(self.object_url(path))
            .send()
            .await
            .map_err(|e| unavailable(path, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(unavailable(path, format!("object store returned {status}")));
        }
        resp.text().await.map_err(|e| unavailable(path, e))
    }
}

// ── In-memory ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct InMemoryCodeStore {
    sources: HashMap<String, String>,
}

impl InMemoryCodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.sources.insert(path.into(), text.into());
        self
    }
}

#[async_trait]
impl CodeStore for InMemoryCodeStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, path: &str) -> Result<String, PipelineError> {
        self.sources
            .get(path)
            .cloned()
            .ok_or_else(|| unavailable(path, "no such source"))
    }
}

/// Build the store selected by configuration.
///
/// # Errors
///
/// Returns [`PipelineError::ProviderUnconfigured`] when the object backend
/// lacks an endpoint or bucket.
pub fn code_store_from_config(
    config: &StorageConfig,
    timeout: Duration,
) -> Result<Box<dyn CodeStore>, PipelineError> {
    match config.backend {
        StorageBackend::Local => {
            let root = (!config.root.is_empty()).then(|| PathBuf::from(&config.root));
            Ok(Box::new(LocalCodeStore::new(root)))
        }
        StorageBackend::Object => {
            if !config.is_configured() {
                return Err(PipelineError::unconfigured(
                    "object store",
                    "endpoint and bucket are required",
                ));
            }
            Ok(Box::new(ObjectCodeStore::new(
                &config.endpoint,
                &config.bucket,
                timeout,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn local_store_strips_scheme_and_joins_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("svc.py"), "def f():\n    pass\n").unwrap();

        let store = LocalCodeStore::new(Some(dir.path().to_path_buf()));
        assert_eq!(store.load("svc.py").await.unwrap(), "def f():\n    pass\n");
        assert_eq!(store.load("file://svc.py").await.unwrap(), "def f():\n    pass\n");

        let absolute = dir.path().join("svc.py");
        let text = LocalCodeStore::default()
            .load(absolute.to_str().unwrap())
            .await
            .unwrap();
        assert!(text.starts_with("def f()"));
    }

    #[tokio::test]
    async fn local_missing_file_is_source_unavailable() {
        let err = LocalCodeStore::default()
            .load("/nonexistent/x.py")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn object_store_fetches_bucket_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/code/src/app.py"))
            .respond_with(ResponseTemplate::new(200).set_body_string("class A:\n    pass\n"))
            .mount(&server)
            .await;

        let store = ObjectCodeStore::new(&server.uri(), "code", Duration::from_secs(5));
        assert_eq!(store.load("src/app.py").await.unwrap(), "class A:\n    pass\n");
    }

    #[tokio::test]
    async fn object_store_404_is_source_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = ObjectCodeStore::new(&server.uri(), "code", Duration::from_secs(5));
        let err = store.load("missing.py").await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }

    #[test]
    fn object_backend_without_bucket_is_unconfigured() {
        let config = StorageConfig {
            backend: StorageBackend::Object,
            endpoint: "http://localhost:9000".into(),
            ..Default::default()
        };
        let err = code_store_from_config(&config, Duration::from_secs(1))
            .err()
            .expect("unconfigured");
        assert!(matches!(err, PipelineError::ProviderUnconfigured { .. }));
    }
}
