//! Secret Manager client implementation using reqwest.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::domain::{AppError, SecretVersionName};
use crate::ports::{SecretStore, TokenSource};
use crate::services::http_client::{describe_failure, endpoint};

/// HTTP client for the Secret Manager `versions:access` API.
pub struct SecretManagerHttpClient {
    base_url: Url,
    tokens: Box<dyn TokenSource>,
    client: Client,
}

impl std::fmt::Debug for SecretManagerHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManagerHttpClient").field("base_url", &self.base_url).finish()
    }
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    payload: Payload,
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    data: String,
}

impl SecretManagerHttpClient {
    pub fn new(base_url: Url, tokens: Box<dyn TokenSource>, client: Client) -> Self {
        Self { base_url, tokens, client }
    }
}

impl SecretStore for SecretManagerHttpClient {
    fn access_secret_version(&self, name: &SecretVersionName) -> Result<Vec<u8>, AppError> {
        let store_error = |status: Option<u16>, message: String| AppError::SecretStore {
            name: name.to_string(),
            status,
            message,
        };

        let url = endpoint(&self.base_url, &format!("v1/{}:access", name))?;
        let token = self.tokens.access_token()?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .map_err(|e| store_error(None, format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let (status, message) = describe_failure(response);
            return Err(store_error(Some(status), message));
        }

        let body: AccessResponse = response
            .json()
            .map_err(|e| store_error(None, format!("Failed to parse response: {}", e)))?;

        STANDARD
            .decode(body.payload.data.as_bytes())
            .map_err(|e| store_error(None, format!("Payload is not valid base64: {}", e)))
    }
}
