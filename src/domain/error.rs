use std::io;

use thiserror::Error;

/// Library-wide error type for flowdeploy operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Configuration file contains invalid values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Secret identifier is absent or malformed.
    #[error("Invalid secret identifier '{0}': must be non-empty and alphanumeric with hyphens or underscores")]
    InvalidSecretId(String),

    /// Cron expression could not be accepted as a schedule.
    #[error("Invalid cron schedule '{expression}': {reason}")]
    InvalidCronSchedule { expression: String, reason: String },

    /// Flow name does not match any declared flow.
    #[error("Flow '{name}' not found. Available: {available}")]
    UnknownFlow { name: String, available: String },

    /// Secret store rejected or failed an access request.
    #[error("Secret store error for '{name}': {message}")]
    SecretStore { name: String, status: Option<u16>, message: String },

    /// Secret payload was not valid UTF-8 text.
    #[error("Secret '{name}' payload is not valid UTF-8")]
    SecretEncoding { name: String },

    /// Scheduler rejected or failed a deployment registration.
    #[error("Deployment registration failed for '{deployment}': {details}")]
    Registry { deployment: String, details: String },

    /// Destination warehouse rejected or failed an operation.
    #[error("Warehouse error during {operation}: {details}")]
    Warehouse { operation: String, details: String },

    /// Credential acquisition failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Row data does not match the record schema of a pipeline stage.
    #[error("Schema mismatch at {stage}: {details}")]
    Schema { stage: String, details: String },

    /// Image template rendering failed.
    #[error("Template error: {0}")]
    Template(String),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

}
