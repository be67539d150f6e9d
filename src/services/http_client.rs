//! Shared helpers for the blocking HTTP adapters.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use url::Url;

use crate::domain::AppError;

/// Build a blocking client with the configured request timeout.
pub fn build_client(timeout_secs: u64) -> Result<Client, AppError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Append `path` to `base`, keeping any path already present on `base`.
pub fn endpoint(base: &Url, path: &str) -> Result<Url, AppError> {
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| AppError::Configuration(format!("Invalid URL '{}': {}", joined, e)))
}

/// Status code and body text of an unsuccessful response.
pub fn describe_failure(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_else(|_| "Unknown error".to_string());
    (status, format!("HTTP {}: {}", status, body.trim()))
}
