//! Register every declared pipeline with the scheduler.

use tracing::info;

use crate::domain::{
    AppError, DeploymentConfig, DeploymentTarget, Environment, EnvironmentResolution,
    PipelineDeclaration, Settings,
};
use crate::ports::{DeploymentId, DeploymentRegistry};
use crate::services::render_image_reference;

/// A deployment accepted by the registry.
#[derive(Debug, Clone)]
pub struct RegisteredDeployment {
    pub config: DeploymentConfig,
    pub id: DeploymentId,
}

#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub resolution: EnvironmentResolution,
    pub deployments: Vec<RegisteredDeployment>,
}

/// Values shared by every deployment for `environment`.
pub fn deployment_target(
    settings: &Settings,
    environment: &Environment,
) -> Result<DeploymentTarget, AppError> {
    let image = render_image_reference(
        &settings.config.registry,
        settings.gcp_project_id.as_deref(),
        environment,
        &settings.image_tag,
    )?;

    Ok(DeploymentTarget {
        environment: environment.clone(),
        work_pool: settings.config.work_pools.for_prod(environment.is_prod()).to_string(),
        image,
        branch_name: settings.branch_name.clone(),
    })
}

/// Register `declarations` in order. The first failure aborts the rest.
pub fn execute<R: DeploymentRegistry + ?Sized>(
    settings: &Settings,
    resolution: EnvironmentResolution,
    declarations: &[PipelineDeclaration],
    registry: &R,
) -> Result<DeployOutcome, AppError> {
    let target = deployment_target(settings, &resolution.environment)?;
    info!(
        environment = %target.environment,
        work_pool = %target.work_pool,
        image = %target.image.name,
        "Deploying pipelines"
    );

    let mut deployments = Vec::with_capacity(declarations.len());
    for declaration in declarations {
        let config = DeploymentConfig::for_declaration(declaration, &target);
        info!(deployment = %config.deployment_name, flow = %config.flow_name, "Registering deployment");

        let id = registry.register(&config)?;
        deployments.push(RegisteredDeployment { config, id });
    }

    Ok(DeployOutcome { resolution, deployments })
}
