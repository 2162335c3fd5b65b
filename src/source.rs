use std::time::Duration;

use rocket::tokio;

/// True when `source` names an http(s) resource rather than a file.
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Read a data document in one attempt: GET for URLs, a file read otherwise.
/// A non-success HTTP status is an error.
pub async fn read_source(source: &str, timeout: Duration) -> Result<String, String> {
    if is_remote(source) {
        fetch_text(source.trim(), timeout).await
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| format!("cannot read {}: {}", source, e))
    }
}

pub async fn fetch_text(url: &str, timeout: Duration) -> Result<String, String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| format!("HTTP client error: {}", e))?;

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("request to {} failed: {}", url, e))?;

    if !resp.status().is_success() {
        return Err(format!("{} returned {}", url, resp.status()));
    }

    resp.text()
        .await
        .map_err(|e| format!("reading {} failed: {}", url, e))
}
