use std::fmt;

use crate::domain::AppError;
use crate::impl_validated_id;

/// Version used when the caller does not pin one.
pub const LATEST_VERSION: &str = "latest";

/// A validated secret identifier.
///
/// Guarantees:
/// - Non-empty
/// - Contains only ASCII alphanumeric characters, `-`, or `_`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretId(String);

impl_validated_id!(SecretId, AppError::InvalidSecretId);

impl SecretId {
    /// Validate an identifier that may be absent.
    ///
    /// An absent identifier is rejected the same way as an empty one so that
    /// no lookup is attempted for it.
    pub fn from_optional(id: Option<&str>) -> Result<Self, AppError> {
        match id {
            Some(id) => Self::new(id),
            None => Err(AppError::InvalidSecretId(String::new())),
        }
    }

    /// Name of the environment variable that overrides this secret locally.
    pub fn env_key(&self) -> String {
        self.0.to_uppercase()
    }
}

/// Fully-qualified name of one version of a secret in the secret store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersionName {
    project_id: String,
    secret_id: SecretId,
    version: String,
}

impl SecretVersionName {
    pub fn new(project_id: &str, secret_id: &SecretId, version: Option<&str>) -> Self {
        Self {
            project_id: project_id.to_string(),
            secret_id: secret_id.clone(),
            version: version.unwrap_or(LATEST_VERSION).to_string(),
        }
    }
}

impl fmt::Display for SecretVersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/secrets/{}/versions/{}",
            self.project_id, self.secret_id, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_key_is_uppercase() {
        let id = SecretId::new("test_secret").unwrap();
        assert_eq!(id.env_key(), "TEST_SECRET");
    }

    #[test]
    fn absent_id_is_rejected() {
        assert!(matches!(SecretId::from_optional(None), Err(AppError::InvalidSecretId(_))));
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(SecretId::new("").is_err());
    }

    #[test]
    fn version_name_defaults_to_latest() {
        let id = SecretId::new("test_secret").unwrap();
        let name = SecretVersionName::new("test-project", &id, None);
        assert_eq!(name.to_string(), "projects/test-project/secrets/test_secret/versions/latest");
    }

    #[test]
    fn version_name_uses_pinned_version() {
        let id = SecretId::new("test_secret").unwrap();
        let name = SecretVersionName::new("test-project", &id, Some("2"));
        assert_eq!(name.to_string(), "projects/test-project/secrets/test_secret/versions/2");
    }
}
