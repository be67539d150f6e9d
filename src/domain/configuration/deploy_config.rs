//! Deployment configuration loaded from `flowdeploy.toml`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;

/// Optional file-based configuration. Every field has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Container image naming.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Work pool names per environment.
    #[serde(default)]
    pub work_pools: WorkPoolConfig,
    /// Remote API endpoints.
    #[serde(default)]
    pub api: ApiConfig,
}

impl DeployConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.registry.validate()?;
        self.work_pools.validate()?;
        self.api.validate()?;
        Ok(())
    }
}

/// Container image naming configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Template rendered with `project_id`, `environment` and `tag`.
    #[serde(default = "default_image_template")]
    pub image_template: String,
    /// Target platform of the pre-built image.
    #[serde(default = "default_platform")]
    pub platform: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { image_template: default_image_template(), platform: default_platform() }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.image_template.trim().is_empty() {
            return Err(AppError::InvalidConfig("registry.image_template must not be empty".into()));
        }
        if self.platform.trim().is_empty() {
            return Err(AppError::InvalidConfig("registry.platform must not be empty".into()));
        }
        Ok(())
    }
}

fn default_image_template() -> String {
    "us-central1-docker.pkg.dev/{{ project_id }}/prefect-images/parsons-prefect-{{ environment }}:{{ tag }}"
        .to_string()
}

fn default_platform() -> String {
    "linux/amd64".to_string()
}

/// Scheduler work pools keyed by production vs. everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkPoolConfig {
    #[serde(default = "default_prod_pool")]
    pub prod: String,
    #[serde(default = "default_dev_pool")]
    pub dev: String,
}

impl Default for WorkPoolConfig {
    fn default() -> Self {
        Self { prod: default_prod_pool(), dev: default_dev_pool() }
    }
}

impl WorkPoolConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.prod.trim().is_empty() || self.dev.trim().is_empty() {
            return Err(AppError::InvalidConfig("work pool names must not be empty".into()));
        }
        Ok(())
    }

    pub fn for_prod(&self, is_prod: bool) -> &str {
        if is_prod { &self.prod } else { &self.dev }
    }
}

fn default_prod_pool() -> String {
    "prod-cloud-run-pool".to_string()
}

fn default_dev_pool() -> String {
    "dev-cloud-run-pool".to_string()
}

/// Remote API endpoints and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Scheduler API base URL (overridden by `PREFECT_API_URL`).
    #[serde(default = "default_prefect_url")]
    pub prefect_url: Url,
    /// Secret Manager API base URL.
    #[serde(default = "default_secret_manager_url")]
    pub secret_manager_url: Url,
    /// BigQuery API base URL.
    #[serde(default = "default_bigquery_url")]
    pub bigquery_url: Url,
    /// BigQuery media upload base URL used for load jobs.
    #[serde(default = "default_bigquery_upload_url")]
    pub bigquery_upload_url: Url,
    /// Compute metadata server base URL used for ambient credentials.
    #[serde(default = "default_metadata_url")]
    pub metadata_url: Url,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefect_url: default_prefect_url(),
            secret_manager_url: default_secret_manager_url(),
            bigquery_url: default_bigquery_url(),
            bigquery_upload_url: default_bigquery_upload_url(),
            metadata_url: default_metadata_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}

fn default_prefect_url() -> Url {
    Url::parse("http://127.0.0.1:4200/api").expect("Default scheduler URL must be valid")
}

fn default_secret_manager_url() -> Url {
    Url::parse("https://secretmanager.googleapis.com").expect("Default secret URL must be valid")
}

fn default_bigquery_url() -> Url {
    Url::parse("https://bigquery.googleapis.com/bigquery/v2")
        .expect("Default BigQuery URL must be valid")
}

fn default_bigquery_upload_url() -> Url {
    Url::parse("https://bigquery.googleapis.com/upload/bigquery/v2")
        .expect("Default BigQuery upload URL must be valid")
}

fn default_metadata_url() -> Url {
    Url::parse("http://metadata.google.internal").expect("Default metadata URL must be valid")
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: DeployConfig = toml::from_str("").unwrap();
        assert_eq!(config.work_pools.prod, "prod-cloud-run-pool");
        assert_eq!(config.work_pools.dev, "dev-cloud-run-pool");
        assert_eq!(config.registry.platform, "linux/amd64");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(
            config.api.bigquery_upload_url.as_str(),
            "https://bigquery.googleapis.com/upload/bigquery/v2"
        );
        config.validate().unwrap();
    }

    #[test]
    fn partial_sections_are_merged_with_defaults() {
        let config: DeployConfig = toml::from_str(
            r#"
[work_pools]
prod = "k8s-prod"

[api]
timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.work_pools.prod, "k8s-prod");
        assert_eq!(config.work_pools.dev, "dev-cloud-run-pool");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<DeployConfig, _> = toml::from_str("[registry]\nimage = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let config: DeployConfig = toml::from_str("[api]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn work_pool_selection() {
        let pools = WorkPoolConfig::default();
        assert_eq!(pools.for_prod(true), "prod-cloud-run-pool");
        assert_eq!(pools.for_prod(false), "dev-cloud-run-pool");
    }
}
