use crate::domain::{AppError, SecretVersionName};

/// Remote store of named, versioned secret payloads.
pub trait SecretStore {
    /// Fetch the raw payload of one secret version.
    fn access_secret_version(&self, name: &SecretVersionName) -> Result<Vec<u8>, AppError>;
}
