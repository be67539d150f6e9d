//! Deployment configuration parsing.

use crate::domain::{AppError, DeployConfig};

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<DeployConfig, AppError> {
    let config: DeployConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
