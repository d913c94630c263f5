//! HTTP fetch helpers shared by the scanner and the detail resolver.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Build the HTTP client used against the site
pub fn build_client() -> Result<Client, String> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}

/// GET a URL and return the body as text; non-2xx is an error
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }
    Ok(response.text().await?)
}

/// GET a URL and decode the body as JSON
pub async fn fetch_json(client: &Client, url: &str) -> Result<serde_json::Value, FetchError> {
    let text = fetch_text(client, url).await?;
    Ok(serde_json::from_str(&text)?)
}
