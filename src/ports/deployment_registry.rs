use crate::domain::{AppError, DeploymentConfig};

/// Identifier assigned by the scheduler to a registered deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentId(pub String);

impl std::fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scheduler that accepts deployment registrations.
///
/// Deployments reference an already-built image; implementations never
/// build or push images.
pub trait DeploymentRegistry {
    fn register(&self, config: &DeploymentConfig) -> Result<DeploymentId, AppError>;
}
