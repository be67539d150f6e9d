//! Deployment configuration derived from a pipeline declaration.

use std::fmt;

use serde::Serialize;

use crate::domain::{CronSchedule, Environment, PipelineDeclaration};

/// Prefix applied to deployment names outside production.
pub const DEV_DEPLOYMENT_PREFIX: &str = "DEV-";

/// Program inside the image that workers invoke for each flow run.
pub const RUN_PROGRAM: &str = env!("CARGO_PKG_NAME");

/// Reference to a pre-built container image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReference {
    pub name: String,
    pub platform: String,
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.platform)
    }
}

/// Parameters passed to every flow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowParameters {
    pub env: Environment,
}

/// Values shared by every deployment in one registration run.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    pub environment: Environment,
    pub work_pool: String,
    pub image: ImageReference,
    pub branch_name: String,
}

/// One deployment as submitted to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentConfig {
    pub deployment_name: String,
    pub flow_name: String,
    pub work_pool: String,
    pub image: ImageReference,
    /// Command the worker runs in the image, e.g. `flowdeploy run example-pipeline --env dev`.
    pub command: String,
    pub schedule: Option<CronSchedule>,
    pub parameters: FlowParameters,
    pub tags: Vec<String>,
}

impl DeploymentConfig {
    pub fn for_declaration(declaration: &PipelineDeclaration, target: &DeploymentTarget) -> Self {
        let is_prod = target.environment.is_prod();

        let deployment_name = if is_prod {
            declaration.display_name.clone()
        } else {
            format!("{}{}", DEV_DEPLOYMENT_PREFIX, declaration.display_name)
        };

        let flow_name = declaration.flow.name();
        Self {
            deployment_name,
            flow_name: flow_name.to_string(),
            work_pool: target.work_pool.clone(),
            image: target.image.clone(),
            command: format!("{} run {} --env {}", RUN_PROGRAM, flow_name, target.environment),
            schedule: is_prod.then(|| declaration.schedule.clone()),
            parameters: FlowParameters { env: target.environment.clone() },
            tags: vec![target.environment.to_string(), target.branch_name.clone()],
        }
    }
}
