//! Azure DevOps client.
//!
//! Two calls per fetch: a WIQL query returns bug IDs ordered by
//! `System.ChangedDate`, then a batch `workitems` GET returns their fields.
//! The batch endpoint takes at most [`MAX_BATCH_IDS`] ids per call and does
//! not promise to keep the requested order, so ids are sent in chunks and the
//! results re-sorted to match the WIQL order.

use std::time::Duration;

use async_trait::async_trait;
use hq_config::AzureConfig;
use serde_json::json;

use crate::{
    BugTracker, TrackerRecord,
    error::TrackerError,
    http::{build_client, check_response},
};

const API_VERSION: &str = "6.0";

/// Upper bound on `ids` for one `workitems` batch request.
pub const MAX_BATCH_IDS: usize = 200;

const WIQL: &str = "SELECT [System.Id] FROM WorkItems \
                    WHERE [System.WorkItemType] = 'Bug' AND [System.TeamProject] = @project \
                    ORDER BY [System.ChangedDate] DESC";

#[derive(serde::Deserialize)]
struct WiqlResponse {
    #[serde(default, rename = "workItems")]
    work_items: Vec<WorkItemRef>,
}

#[derive(serde::Deserialize)]
struct WorkItemRef {
    id: u64,
}

#[derive(serde::Deserialize)]
struct WorkItemsResponse {
    #[serde(default)]
    value: Vec<WorkItem>,
}

#[derive(serde::Deserialize)]
struct WorkItem {
    id: u64,
    fields: WorkItemFields,
}

#[derive(serde::Deserialize)]
struct WorkItemFields {
    #[serde(default, rename = "System.Title")]
    title: Option<String>,
    #[serde(default, rename = "System.Description")]
    description: Option<String>,
}

pub struct AzureDevOpsTracker {
    http: reqwest::Client,
    base_url: String,
    org: String,
    pat: String,
}

impl AzureDevOpsTracker {
    #[must_use]
    pub fn new(config: &AzureConfig, timeout: Duration) -> Self {
        Self {
            http: build_client(timeout),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            org: config.org.clone(),
            pat: config.pat.clone(),
        }
    }

    fn project_url(&self, project: &str) -> String {
        format!(
            "{}/{}/{}/_apis/wit",
            self.base_url,
            urlencoding::encode(&self.org),
            urlencoding::encode(project)
        )
    }

    async fn query_ids(&self, project: &str, limit: usize) -> Result<Vec<u64>, TrackerError> {
        let url = format!(
            "{}/wiql?api-version={API_VERSION}&$top={limit}",
            self.project_url(project)
        );
        let resp = check_response(
            self.http
                .post(&url)
                .basic_auth("", Some(&self.pat))
                .json(&json!({ "query": WIQL }))
                .send()
                .await?,
        )
        .await?;
        let data: WiqlResponse = resp
            .json()
            .await
            .map_err(|e| TrackerError::Parse(format!("azure wiql response: {e}")))?;
        Ok(data.work_items.into_iter().take(limit).map(|w| w.id).collect())
    }

    async fn fetch_items(&self, project: &str, ids: &[u64]) -> Result<Vec<WorkItem>, TrackerError> {
        let mut items = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_BATCH_IDS) {
            items.extend(self.fetch_batch(project, chunk).await?);
        }
        Ok(items)
    }

    async fn fetch_batch(&self, project: &str, ids: &[u64]) -> Result<Vec<WorkItem>, TrackerError> {
        let id_list = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/workitems?ids={id_list}&fields=System.Title,System.Description&api-version={API_VERSION}",
            self.project_url(project)
        );
        let resp = check_response(
            self.http
                .get(&url)
                .basic_auth("", Some(&self.pat))
                .send()
                .await?,
        )
        .await?;
        let data: WorkItemsResponse = resp
            .json()
            .await
            .map_err(|e| TrackerError::Parse(format!("azure workitems response: {e}")))?;
        Ok(data.value)
    }
}

/// Order `items` to follow `ids`, dropping items that were not requested.
fn in_query_order(ids: &[u64], items: Vec<WorkItem>) -> Vec<TrackerRecord> {
    let mut items = items;
    items.retain(|item| ids.contains(&item.id));
    items.sort_by_key(|item| ids.iter().position(|id| *id == item.id));
    items
        .into_iter()
        .map(|item| TrackerRecord {
            external_id: Some(item.id.to_string()),
            title: item.fields.title.unwrap_or_default(),
            description: item.fields.description.unwrap_or_default(),
            related_requirements: Vec::new(),
        })
        .collect()
}

#[async_trait]
impl BugTracker for AzureDevOpsTracker {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn fetch_recent(
        &self,
        project: &str,
        limit: usize,
    ) -> Result<Vec<TrackerRecord>, TrackerError> {
        if project.is_empty() {
            return Err(TrackerError::Unconfigured {
                provider: "azure",
                reason: "project is required".to_string(),
            });
        }
        if limit == 0 {
            return Ok(Vec::new());
        }
        let ids = self.query_ids(project, limit).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = self.fetch_items(project, &ids).await?;
        let records = in_query_order(&ids, items);
        tracing::debug!(project, ids = ids.len(), records = records.len(), "fetched azure work items");
        Ok(records)
    }
}
