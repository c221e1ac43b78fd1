//! Jira and Azure DevOps clients against a local mock server.

use std::time::Duration;

use hq_config::{AzureConfig, JiraConfig};
use hq_trackers::{AzureDevOpsTracker, BugTracker, JiraTracker, TrackerError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn jira(server: &MockServer) -> JiraTracker {
    JiraTracker::new(
        &JiraConfig {
            base_url: server.uri(),
            email: "qa@example.com".into(),
            api_token: "token".into(),
        },
        TIMEOUT,
    )
}

fn azure(server: &MockServer) -> AzureDevOpsTracker {
    AzureDevOpsTracker::new(
        &AzureConfig {
            org: "contoso".into(),
            pat: "pat".into(),
            base_url: server.uri(),
        },
        TIMEOUT,
    )
}

#[tokio::test]
async fn jira_search_maps_issues_in_response_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("maxResults", "2"))
        .and(query_param("jql", "issuetype=Bug ORDER BY updated DESC"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [
                {"key": "EHR-3", "fields": {"summary": "Newest", "description": "d3"}},
                {"key": "EHR-2", "fields": {"summary": "Older", "description": null}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = jira(&server).fetch_recent("", 2).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].external_id.as_deref(), Some("EHR-3"));
    assert_eq!(records[0].title, "Newest");
    assert_eq!(records[1].description, "");
}

#[tokio::test]
async fn jira_truncates_to_limit_even_if_server_returns_more() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [
                {"key": "A-1", "fields": {"summary": "1"}},
                {"key": "A-2", "fields": {"summary": "2"}},
                {"key": "A-3", "fields": {"summary": "3"}}
            ]
        })))
        .mount(&server)
        .await;

    let records = jira(&server).fetch_recent("", 1).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn jira_unauthorized_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = jira(&server).fetch_recent("", 5).await.unwrap_err();
    assert!(matches!(err, TrackerError::Api { status: 401, .. }));
}

#[tokio::test]
async fn jira_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let err = jira(&server).fetch_recent("", 5).await.unwrap_err();
    assert!(matches!(err, TrackerError::RateLimited { retry_after_secs: 12 }));
}

#[tokio::test]
async fn jira_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"issues": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let tracker = JiraTracker::new(
        &JiraConfig {
            base_url: server.uri(),
            email: "qa@example.com".into(),
            api_token: "token".into(),
        },
        Duration::from_millis(50),
    );
    let err = tracker.fetch_recent("", 5).await.unwrap_err();
    assert!(matches!(err, TrackerError::Http(_)));
}

#[tokio::test]
async fn azure_queries_wiql_then_fetches_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/ehr/_apis/wit/wiql"))
        .and(query_param("api-version", "6.0"))
        .and(body_partial_json(json!({
            "query": "SELECT [System.Id] FROM WorkItems WHERE [System.WorkItemType] = 'Bug' AND [System.TeamProject] = @project ORDER BY [System.ChangedDate] DESC"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workItems": [{"id": 9}, {"id": 4}, {"id": 1}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contoso/ehr/_apis/wit/workitems"))
        .and(query_param("ids", "9,4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": 4, "fields": {"System.Title": "Second"}},
                {"id": 9, "fields": {"System.Title": "First", "System.Description": "desc"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = azure(&server).fetch_recent("ehr", 2).await.unwrap();

    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(records[0].description, "desc");
}

#[tokio::test]
async fn azure_empty_query_skips_item_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/ehr/_apis/wit/wiql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workItems": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let records = azure(&server).fetch_recent("ehr", 10).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn azure_requires_project() {
    let server = MockServer::start().await;
    let err = azure(&server).fetch_recent("", 10).await.unwrap_err();
    assert!(err.is_unconfigured());
}

#[tokio::test]
async fn azure_splits_large_limits_into_batches() {
    let server = MockServer::start().await;
    let ids: Vec<u64> = (1..=250).collect();
    let join = |ids: &[u64]| {
        ids.iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",")
    };
    Mock::given(method("POST"))
        .and(path("/contoso/ehr/_apis/wit/wiql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workItems": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>()
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contoso/ehr/_apis/wit/workitems"))
        .and(query_param("ids", join(&ids[..200])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": 1, "fields": {"System.Title": "Newest"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contoso/ehr/_apis/wit/workitems"))
        .and(query_param("ids", join(&ids[200..])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": 250, "fields": {"System.Title": "Oldest"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = azure(&server).fetch_recent("ehr", 250).await.unwrap();

    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Oldest"]);
}
