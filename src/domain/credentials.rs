//! Cloud credentials used to reach the destination warehouse.

use std::fmt;

use serde::Deserialize;

use crate::domain::AppError;

/// Secret holding the production service-account key.
pub const SERVICE_ACCOUNT_SECRET: &str = "gcp_service_account";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// How a client authenticates.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Credentials provided by the runtime (pre-minted token or metadata server).
    Ambient,
    /// A service-account key fetched from the secret store.
    ServiceAccount(ServiceAccountKey),
}

/// The subset of a service-account key file needed to mint tokens.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Auth(format!("Invalid service account key: {}", e)))
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}
