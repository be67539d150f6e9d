//! The example extract → transform → load pipeline.

use chrono::Utc;
use tracing::info;

use crate::app::AppContext;
use crate::domain::flows::{self, EnrichedRecord, LoadTarget, MetricRecord};
use crate::domain::{
    AppError, Credentials, Environment, SERVICE_ACCOUNT_SECRET, SecretId, ServiceAccountKey, Table,
};
use crate::ports::{SecretStore, WarehouseConnector};

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub environment: Environment,
    pub rows_loaded: usize,
    pub target: LoadTarget,
}

pub fn extract() -> Table<MetricRecord> {
    let table = flows::extract(Utc::now());
    info!(rows = table.num_rows(), "Extracted rows");
    table
}

pub fn transform(table: &Table<MetricRecord>) -> Table<EnrichedRecord> {
    let transformed = flows::transform(table);
    info!(rows = transformed.num_rows(), "Transformed rows");
    transformed
}

/// Write `table` to the environment's destination, replacing any previous load.
pub fn load<S, W>(
    ctx: &AppContext<S>,
    connector: &W,
    table: &Table<EnrichedRecord>,
    env: &Environment,
) -> Result<LoadTarget, AppError>
where
    S: SecretStore,
    W: WarehouseConnector + ?Sized,
{
    let credentials = credentials_for(ctx, env)?;
    let warehouse = connector.connect(credentials)?;

    let target = LoadTarget::for_environment(env);
    warehouse.create_dataset(&target.dataset, true)?;
    warehouse.copy(&table.to_table_data()?, &target.table_name)?;

    info!(rows = table.num_rows(), table = %target.table_name, "Loaded rows");
    Ok(target)
}

/// Run all three stages in sequence. `None` runs against `dev`.
pub fn example_pipeline<S, W>(
    ctx: &AppContext<S>,
    connector: &W,
    env: Option<Environment>,
) -> Result<PipelineReport, AppError>
where
    S: SecretStore,
    W: WarehouseConnector + ?Sized,
{
    let environment = env.unwrap_or_default();
    info!(environment = %environment, "Starting example pipeline");

    let raw = extract();
    let transformed = transform(&raw);
    let target = load(ctx, connector, &transformed, &environment)?;

    Ok(PipelineReport { environment, rows_loaded: transformed.num_rows(), target })
}

fn credentials_for<S: SecretStore>(
    ctx: &AppContext<S>,
    env: &Environment,
) -> Result<Credentials, AppError> {
    if !env.is_prod() {
        return Ok(Credentials::Ambient);
    }

    let secret_id = SecretId::new(SERVICE_ACCOUNT_SECRET)?;
    let secret = ctx.secret_resolver().resolve(&secret_id, None)?;
    Ok(Credentials::ServiceAccount(ServiceAccountKey::from_json(&secret.value)?))
}
