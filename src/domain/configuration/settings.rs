//! Process-wide settings assembled once at start-up.

use url::Url;

use super::{DeployConfig, EnvSnapshot};
use crate::domain::AppError;

pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";
pub const GITHUB_REF_VAR: &str = "GITHUB_REF";
pub const GCP_PROJECT_ID_VAR: &str = "GCP_PROJECT_ID";
pub const BRANCH_NAME_VAR: &str = "BRANCH_NAME";
pub const TAG_VAR: &str = "TAG";
pub const PREFECT_API_URL_VAR: &str = "PREFECT_API_URL";
pub const PREFECT_API_KEY_VAR: &str = "PREFECT_API_KEY";
pub const GCP_ACCESS_TOKEN_VAR: &str = "GCP_ACCESS_TOKEN";

const DEFAULT_BRANCH_NAME: &str = "local";
const DEFAULT_TAG: &str = "latest";

/// Explicit configuration passed to every component.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Snapshot consulted for per-secret overrides.
    pub env: EnvSnapshot,
    /// `ENVIRONMENT`, used verbatim when present.
    pub environment_override: Option<String>,
    /// `GITHUB_REF` as reported by CI.
    pub github_ref: Option<String>,
    /// `GCP_PROJECT_ID`.
    pub gcp_project_id: Option<String>,
    /// `BRANCH_NAME`, defaulting to `local`.
    pub branch_name: String,
    /// `TAG`, defaulting to `latest`.
    pub image_tag: String,
    /// Scheduler API base URL after applying `PREFECT_API_URL`.
    pub prefect_api_url: Url,
    /// `PREFECT_API_KEY`.
    pub prefect_api_key: Option<String>,
    /// `GCP_ACCESS_TOKEN`, a pre-minted ambient token.
    pub gcp_access_token: Option<String>,
    /// File-based configuration.
    pub config: DeployConfig,
}

impl Settings {
    pub fn from_sources(env: EnvSnapshot, config: DeployConfig) -> Result<Self, AppError> {
        config.validate()?;

        let prefect_api_url = match env.get(PREFECT_API_URL_VAR) {
            Some(raw) => Url::parse(raw).map_err(|e| {
                AppError::InvalidConfig(format!("{} is not a valid URL: {}", PREFECT_API_URL_VAR, e))
            })?,
            None => config.api.prefect_url.clone(),
        };

        let owned = |key: &str| env.get(key).map(str::to_string);

        Ok(Self {
            environment_override: owned(ENVIRONMENT_VAR),
            github_ref: owned(GITHUB_REF_VAR),
            gcp_project_id: owned(GCP_PROJECT_ID_VAR),
            branch_name: env.get_or(BRANCH_NAME_VAR, DEFAULT_BRANCH_NAME).to_string(),
            image_tag: env.get_or(TAG_VAR, DEFAULT_TAG).to_string(),
            prefect_api_url,
            prefect_api_key: owned(PREFECT_API_KEY_VAR),
            gcp_access_token: owned(GCP_ACCESS_TOKEN_VAR),
            config,
            env,
        })
    }

    /// Settings built from environment pairs and default file configuration.
    pub fn from_env_pairs<I, K, V>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_sources(EnvSnapshot::from_pairs(pairs), DeployConfig::default())
    }

    /// Project id required by cloud calls.
    pub fn require_project_id(&self) -> Result<&str, AppError> {
        self.gcp_project_id.as_deref().ok_or_else(|| {
            AppError::config_error(format!("{} environment variable not set", GCP_PROJECT_ID_VAR))
        })
    }
}
