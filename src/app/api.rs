//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together settings
//! loading, adapter construction and command execution.

use std::path::{Path, PathBuf};

use crate::app::{
    AppContext,
    commands::{deploy, run},
    config::load_settings,
    services,
};
use crate::domain::{Credentials, Settings, declared_pipelines};
use crate::ports::DeploymentRegistry;
use crate::services::http_client::build_client;
use crate::services::{
    AmbientAuth, BigQueryConnector, BigQueryUrls, DryRunRegistry, GitCommandAdapter,
    PrefectHttpRegistry, SecretManagerHttpClient, gcp_auth,
};

pub use crate::app::commands::deploy::{DeployOutcome, RegisteredDeployment};
pub use crate::app::commands::healthcheck::HealthReport;
pub use crate::app::commands::pipeline::PipelineReport;
pub use crate::app::commands::run::{RunOptions, RunResult};
pub use crate::app::services::{ResolvedSecret, SecretSource};
pub use crate::domain::{AppError, Environment, EnvironmentResolution, EnvironmentSignal};

fn ambient_auth(settings: &Settings) -> AmbientAuth {
    AmbientAuth {
        static_token: settings.gcp_access_token.clone(),
        metadata_url: settings.config.api.metadata_url.clone(),
    }
}

fn create_context(settings: Settings) -> Result<AppContext<SecretManagerHttpClient>, AppError> {
    let api = &settings.config.api;
    let client = build_client(api.timeout_secs)?;
    let tokens = gcp_auth::token_source(Credentials::Ambient, &ambient_auth(&settings), client.clone())?;
    let store = SecretManagerHttpClient::new(api.secret_manager_url.clone(), tokens, client);
    Ok(AppContext::new(settings, store))
}

fn create_connector(settings: &Settings) -> BigQueryConnector {
    let api = &settings.config.api;
    BigQueryConnector::new(
        BigQueryUrls { api: api.bigquery_url.clone(), upload: api.bigquery_upload_url.clone() },
        settings.gcp_project_id.clone(),
        ambient_auth(settings),
        api.timeout_secs,
    )
}

fn current_dir() -> Result<PathBuf, AppError> {
    Ok(std::env::current_dir()?)
}

/// Resolve the runtime environment for the current directory.
pub fn resolve_environment() -> Result<EnvironmentResolution, AppError> {
    resolve_environment_at(current_dir()?)
}

/// Resolve the runtime environment for the specified path.
pub fn resolve_environment_at(path: impl AsRef<Path>) -> Result<EnvironmentResolution, AppError> {
    let path = path.as_ref();
    let settings = load_settings(path)?;
    let git = GitCommandAdapter::new(path.to_path_buf());
    Ok(services::resolve_environment(&settings, &git))
}

/// Register all declared pipelines for the resolved environment.
///
/// With `dry_run` the deployments are printed instead of submitted.
pub fn deploy(dry_run: bool) -> Result<DeployOutcome, AppError> {
    deploy_at(current_dir()?, dry_run)
}

/// Register all declared pipelines, resolving settings at the specified path.
pub fn deploy_at(path: impl AsRef<Path>, dry_run: bool) -> Result<DeployOutcome, AppError> {
    let path = path.as_ref();
    let settings = load_settings(path)?;
    let git = GitCommandAdapter::new(path.to_path_buf());
    let resolution = services::resolve_environment(&settings, &git);

    let registry: Box<dyn DeploymentRegistry> = if dry_run {
        Box::new(DryRunRegistry)
    } else {
        Box::new(PrefectHttpRegistry::new(
            settings.prefect_api_url.clone(),
            settings.prefect_api_key.clone(),
            build_client(settings.config.api.timeout_secs)?,
        ))
    };

    deploy::execute(&settings, resolution, &declared_pipelines()?, registry.as_ref())
}

/// Run one flow locally.
pub fn run_flow(options: RunOptions) -> Result<RunResult, AppError> {
    run_flow_at(current_dir()?, options)
}

/// Run one flow locally, resolving settings at the specified path.
pub fn run_flow_at(path: impl AsRef<Path>, options: RunOptions) -> Result<RunResult, AppError> {
    let settings = load_settings(path.as_ref())?;
    let connector = create_connector(&settings);
    let ctx = create_context(settings)?;
    run::execute(&ctx, &connector, options)
}

/// Resolve a secret by identifier.
pub fn get_secret(secret_id: Option<&str>, version: Option<&str>) -> Result<ResolvedSecret, AppError> {
    get_secret_at(current_dir()?, secret_id, version)
}

/// Resolve a secret by identifier, resolving settings at the specified path.
pub fn get_secret_at(
    path: impl AsRef<Path>,
    secret_id: Option<&str>,
    version: Option<&str>,
) -> Result<ResolvedSecret, AppError> {
    let ctx = create_context(load_settings(path.as_ref())?)?;
    ctx.secret_resolver().resolve_optional(secret_id, version)
}
