// src/core/probe/http_probe.rs

use tracing::{debug, error, info};

use crate::core::models::{HeaderSet, ScanConfig};
use crate::error::{Result, ScanError};

/// One fetched HTTP response: status, lower-cased headers and body text.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status_code: u16,
    pub headers: HeaderSet,
    pub body: String,
}

/// Fetches the target's headers and body.
///
/// This probe is mandatory: any failure here (client build, transport,
/// timeout, non-success status, unreadable body) aborts the whole scan with
/// [`ScanError::RequestFailed`]. Duplicate headers collapse last-write-wins.
pub async fn fetch_headers_and_body(url: &str, config: &ScanConfig) -> Result<FetchedResponse> {
    info!(url, "Fetching target headers and body.");

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to build HTTP client.");
            ScanError::RequestFailed(format!("Failed to build HTTP client: {e}"))
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        error!(url, error = %e, "HTTP request failed.");
        ScanError::RequestFailed(e.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        error!(url, status = %status, "Target responded with a non-success status.");
        return Err(ScanError::RequestFailed(format!(
            "target responded with status {status}"
        )));
    }

    let mut headers = HeaderSet::new();
    for (name, value) in response.headers() {
        let value = match value.to_str() {
            Ok(s) => s.to_string(),
            // Presence still matters even when the value is not valid UTF-8.
            Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
        };
        headers.insert(name.as_str().to_lowercase(), value);
    }

    let body = response.text().await.map_err(|e| {
        error!(error = %e, "Failed to read response body.");
        ScanError::RequestFailed(format!("Failed to read response body: {e}"))
    })?;

    debug!(
        status = status.as_u16(),
        headers = headers.len(),
        bytes = body.len(),
        "Fetch completed."
    );
    Ok(FetchedResponse {
        status_code: status.as_u16(),
        headers,
        body,
    })
}
