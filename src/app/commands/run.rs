//! Run one declared flow locally.

use crate::app::AppContext;
use crate::app::commands::healthcheck::{self, HealthReport};
use crate::app::commands::pipeline::{self, PipelineReport};
use crate::domain::{AppError, Environment, FlowKind};
use crate::ports::{SecretStore, WarehouseConnector};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub flow: String,
    pub env: Option<String>,
}

#[derive(Debug, Clone)]
pub enum RunResult {
    Pipeline(PipelineReport),
    Health(HealthReport),
}

pub fn execute<S, W>(
    ctx: &AppContext<S>,
    connector: &W,
    options: RunOptions,
) -> Result<RunResult, AppError>
where
    S: SecretStore,
    W: WarehouseConnector + ?Sized,
{
    let flow = FlowKind::from_name(&options.flow)?;
    let env = options.env.as_deref().map(Environment::parse);

    match flow {
        FlowKind::ExamplePipeline => {
            pipeline::example_pipeline(ctx, connector, env).map(RunResult::Pipeline)
        }
        FlowKind::Healthcheck => Ok(RunResult::Health(healthcheck::execute(ctx.settings(), env))),
    }
}
