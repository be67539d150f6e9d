use crate::app::services::SecretResolver;
use crate::domain::Settings;
use crate::ports::SecretStore;

/// Application context holding dependencies for command execution.
pub struct AppContext<S: SecretStore> {
    settings: Settings,
    secrets: S,
}

impl<S: SecretStore> AppContext<S> {
    /// Create a new application context.
    pub fn new(settings: Settings, secrets: S) -> Self {
        Self { settings, secrets }
    }

    /// Get a reference to the process settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Secret resolver bound to this context's settings and store.
    pub fn secret_resolver(&self) -> SecretResolver<'_, S> {
        SecretResolver::new(&self.settings, &self.secrets)
    }
}
