//! OAuth token sources for Google Cloud APIs.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{AppError, Credentials, ServiceAccountKey};
use crate::ports::TokenSource;
use crate::services::http_client::{describe_failure, endpoint};

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const METADATA_TOKEN_PATH: &str = "computeMetadata/v1/instance/service-accounts/default/token";
const METADATA_FLAVOR: &str = "Metadata-Flavor";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Where ambient credentials come from.
#[derive(Debug, Clone)]
pub struct AmbientAuth {
    /// Pre-minted token, used as-is when present.
    pub static_token: Option<String>,
    /// Compute metadata server base URL.
    pub metadata_url: Url,
}

/// A fixed token supplied by the environment.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    fn access_token(&self) -> Result<String, AppError> {
        Ok(self.0.clone())
    }
}

/// Default service account of the compute instance running the process.
pub struct MetadataServerToken {
    url: Url,
    client: Client,
}

impl MetadataServerToken {
    pub fn new(metadata_url: &Url, client: Client) -> Result<Self, AppError> {
        Ok(Self { url: endpoint(metadata_url, METADATA_TOKEN_PATH)?, client })
    }
}

impl TokenSource for MetadataServerToken {
    fn access_token(&self) -> Result<String, AppError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(METADATA_FLAVOR, "Google")
            .send()
            .map_err(|e| AppError::Auth(format!("Metadata server unreachable: {}", e)))?;

        if !response.status().is_success() {
            let (_, message) = describe_failure(response);
            return Err(AppError::Auth(format!("Metadata server refused token: {}", message)));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| AppError::Auth(format!("Failed to parse metadata token: {}", e)))?;
        Ok(token.access_token)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Exchanges a signed service-account assertion for an access token.
pub struct ServiceAccountToken {
    key: ServiceAccountKey,
    client: Client,
}

impl ServiceAccountToken {
    pub fn new(key: ServiceAccountKey, client: Client) -> Self {
        Self { key, client }
    }

    fn signed_assertion(&self) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| AppError::Auth(format!("Invalid service account private key: {}", e)))?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| AppError::Auth(format!("Failed to sign assertion: {}", e)))
    }
}

impl TokenSource for ServiceAccountToken {
    fn access_token(&self) -> Result<String, AppError> {
        let assertion = self.signed_assertion()?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| AppError::Auth(format!("Token endpoint unreachable: {}", e)))?;

        if !response.status().is_success() {
            let (_, message) = describe_failure(response);
            return Err(AppError::Auth(format!(
                "Token exchange for {} failed: {}",
                self.key.client_email, message
            )));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))?;
        Ok(token.access_token)
    }
}

/// Token source matching the given credentials.
pub fn token_source(
    credentials: Credentials,
    ambient: &AmbientAuth,
    client: Client,
) -> Result<Box<dyn TokenSource>, AppError> {
    match credentials {
        Credentials::ServiceAccount(key) => Ok(Box::new(ServiceAccountToken::new(key, client))),
        Credentials::Ambient => match &ambient.static_token {
            Some(token) => Ok(Box::new(StaticToken::new(token.clone()))),
            None => Ok(Box::new(MetadataServerToken::new(&ambient.metadata_url, client)?)),
        },
    }
}
