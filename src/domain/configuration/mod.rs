pub mod deploy_config;
pub mod env_snapshot;
pub mod loader;
pub mod settings;

pub use deploy_config::{ApiConfig, DeployConfig, RegistryConfig, WorkPoolConfig};
pub use env_snapshot::EnvSnapshot;
pub use loader::parse_config_content;
pub use settings::Settings;
