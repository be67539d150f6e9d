use crate::domain::{AppError, DeploymentConfig};
use crate::ports::{DeploymentId, DeploymentRegistry};

/// Registry that prints deployments instead of submitting them.
#[derive(Debug, Clone, Default)]
pub struct DryRunRegistry;

impl DeploymentRegistry for DryRunRegistry {
    fn register(&self, config: &DeploymentConfig) -> Result<DeploymentId, AppError> {
        println!("=== DRY RUN ===");
        println!("Would deploy {}:", config.deployment_name);
        println!("  Flow: {}", config.flow_name);
        println!("  Work pool: {}", config.work_pool);
        println!("  Image: {}", config.image);
        println!("  Command: {}", config.command);
        match &config.schedule {
            Some(cron) => println!("  Schedule: {}", cron),
            None => println!("  Schedule: none"),
        }
        println!("  Parameters: env={}", config.parameters.env);
        println!("  Tags: {}", config.tags.join(", "));

        Ok(DeploymentId(format!("dry-run-{}", config.flow_name)))
    }
}
