//! flowdeploy: resolve the runtime environment and register data pipelines
//! with a Prefect-compatible scheduler.

pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    DeployOutcome, HealthReport, PipelineReport, RegisteredDeployment, ResolvedSecret,
    RunOptions, RunResult, SecretSource, deploy, deploy_at, get_secret, get_secret_at,
    resolve_environment, resolve_environment_at, run_flow, run_flow_at,
};
pub use domain::{AppError, Environment, EnvironmentResolution, EnvironmentSignal};
