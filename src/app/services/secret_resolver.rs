//! Secret lookup: environment snapshot first, then the remote secret store.

use std::fmt;

use tracing::{debug, info};

use crate::domain::{AppError, SecretId, SecretVersionName, Settings};
use crate::ports::SecretStore;

/// Where a resolved secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    /// An environment variable named after the upper-cased identifier.
    EnvironmentVariable,
    /// The remote secret store.
    SecretManager,
}

impl SecretSource {
    pub fn label(self) -> &'static str {
        match self {
            SecretSource::EnvironmentVariable => "environment variable",
            SecretSource::SecretManager => "Secret Manager",
        }
    }
}

/// A secret value together with its origin.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    pub value: String,
    pub source: SecretSource,
}

impl fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

pub struct SecretResolver<'a, S: SecretStore + ?Sized> {
    settings: &'a Settings,
    store: &'a S,
}

impl<'a, S: SecretStore + ?Sized> SecretResolver<'a, S> {
    pub fn new(settings: &'a Settings, store: &'a S) -> Self {
        Self { settings, store }
    }

    /// Validate a raw identifier, then resolve it.
    pub fn resolve_optional(
        &self,
        secret_id: Option<&str>,
        version: Option<&str>,
    ) -> Result<ResolvedSecret, AppError> {
        let secret_id = SecretId::from_optional(secret_id)?;
        self.resolve(&secret_id, version)
    }

    /// Resolve a secret from the environment, falling back to the remote store.
    ///
    /// `version` defaults to the latest version and only applies to the
    /// remote store.
    pub fn resolve(
        &self,
        secret_id: &SecretId,
        version: Option<&str>,
    ) -> Result<ResolvedSecret, AppError> {
        let key = secret_id.env_key();
        let (value, source) = match self.settings.env.get(&key) {
            Some(value) => (value.to_string(), SecretSource::EnvironmentVariable),
            None => {
                debug!(variable = %key, "Secret not set in environment");
                (self.fetch_remote(secret_id, version)?, SecretSource::SecretManager)
            }
        };

        info!(secret = %secret_id, source = source.label(), "Resolved secret");
        Ok(ResolvedSecret { value, source })
    }

    fn fetch_remote(&self, secret_id: &SecretId, version: Option<&str>) -> Result<String, AppError> {
        let project = self.settings.require_project_id()?;
        let name = SecretVersionName::new(project, secret_id, version);
        debug!(name = %name, "Fetching secret from Secret Manager");

        let payload = self.store.access_secret_version(&name)?;
        String::from_utf8(payload).map_err(|_| AppError::SecretEncoding { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSecretStore;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        Settings::from_env_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn environment_variable_short_circuits_store() {
        let settings = settings(&[("TEST_SECRET", "test_value"), ("GCP_PROJECT_ID", "p")]);
        let store = FakeSecretStore::returning("from_store");

        let secret =
            SecretResolver::new(&settings, &store).resolve_optional(Some("test_secret"), None).unwrap();

        assert_eq!(secret.value, "test_value");
        assert_eq!(secret.source, SecretSource::EnvironmentVariable);
        assert!(store.requested().is_empty());
    }

    #[test]
    fn falls_back_to_latest_version_in_store() {
        let settings = settings(&[("GCP_PROJECT_ID", "test-project")]);
        let store = FakeSecretStore::returning("secret_from_gsm");

        let secret =
            SecretResolver::new(&settings, &store).resolve_optional(Some("test_secret"), None).unwrap();

        assert_eq!(secret.value, "secret_from_gsm");
        assert_eq!(secret.source, SecretSource::SecretManager);
        assert_eq!(store.requested(), vec!["projects/test-project/secrets/test_secret/versions/latest"]);
    }

    #[test]
    fn pinned_version_is_requested() {
        let settings = settings(&[("GCP_PROJECT_ID", "test-project")]);
        let store = FakeSecretStore::returning("v3");

        SecretResolver::new(&settings, &store).resolve_optional(Some("test_secret"), Some("3")).unwrap();

        assert_eq!(store.requested(), vec!["projects/test-project/secrets/test_secret/versions/3"]);
    }

    #[test]
    fn absent_identifier_fails_before_any_lookup() {
        let settings = settings(&[("GCP_PROJECT_ID", "test-project")]);
        let store = FakeSecretStore::returning("unused");

        let result = SecretResolver::new(&settings, &store).resolve_optional(None, None);

        assert!(matches!(result, Err(AppError::InvalidSecretId(_))));
        assert!(store.requested().is_empty());
    }

    #[test]
    fn empty_identifier_fails_before_any_lookup() {
        let settings = settings(&[("GCP_PROJECT_ID", "test-project")]);
        let store = FakeSecretStore::returning("unused");

        let result = SecretResolver::new(&settings, &store).resolve_optional(Some(""), None);

        assert!(matches!(result, Err(AppError::InvalidSecretId(_))));
        assert!(store.requested().is_empty());
    }

    #[test]
    fn store_errors_propagate_unchanged() {
        let settings = settings(&[("GCP_PROJECT_ID", "test-project")]);
        let store = FakeSecretStore::failing(404);

        let err =
            SecretResolver::new(&settings, &store).resolve_optional(Some("missing"), None).unwrap_err();

        assert!(matches!(err, AppError::SecretStore { status: Some(404), .. }));
        assert_eq!(store.requested().len(), 1);
    }

    #[test]
    fn missing_project_is_configuration_error() {
        let settings = settings(&[]);
        let store = FakeSecretStore::returning("unused");

        let result = SecretResolver::new(&settings, &store).resolve_optional(Some("db_password"), None);

        assert!(matches!(result, Err(AppError::Configuration(_))));
        assert!(store.requested().is_empty());
    }

    #[test]
    fn non_utf8_payload_is_encoding_error() {
        let settings = settings(&[("GCP_PROJECT_ID", "test-project")]);
        let store = FakeSecretStore::returning_bytes(&[0xff, 0xfe]);

        let result = SecretResolver::new(&settings, &store).resolve_optional(Some("binary"), None);

        assert!(matches!(result, Err(AppError::SecretEncoding { .. })));
    }

    #[test]
    fn debug_output_hides_value() {
        let secret = ResolvedSecret {
            value: "hunter2".into(),
            source: SecretSource::EnvironmentVariable,
        };
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }
}
