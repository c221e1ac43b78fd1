//! Shared HTTP helpers for tracker clients.
//!
//! Status-code checks live here (429 with `Retry-After`, any other
//! non-success status as [`TrackerError::Api`]) so the Jira and Azure modules
//! only build requests and map responses.

use std::time::Duration;

use crate::error::TrackerError;

/// Build the HTTP client every tracker uses.
///
/// # Panics
///
/// Panics if the underlying `reqwest::Client` fails to build.
#[must_use]
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("healthqa/0.1")
        .timeout(timeout)
        .build()
        .expect("reqwest client should build")
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. A 429 becomes
/// [`TrackerError::RateLimited`] (`Retry-After` seconds, default 60); any
/// other non-success status becomes [`TrackerError::Api`] carrying the body.
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, TrackerError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(TrackerError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(TrackerError::Api {
            status: resp.status().as_u16(),
            message: truncate_body(resp.text().await.unwrap_or_default()),
        });
    }
    Ok(resp)
}

// Error bodies from trackers can be whole HTML pages.
fn truncate_body(body: String) -> String {
    const MAX_CHARS: usize = 300;
    if body.chars().count() <= MAX_CHARS {
        body
    } else {
        body.chars().take(MAX_CHARS).collect()
    }
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
