pub mod configuration;
pub mod credentials;
pub mod deployment;
pub mod environment;
pub mod error;
pub mod flows;
pub mod identities;
pub mod pipeline;
pub mod table;

pub use configuration::{DeployConfig, EnvSnapshot, Settings};
pub use credentials::{Credentials, SERVICE_ACCOUNT_SECRET, ServiceAccountKey};
pub use deployment::{DeploymentConfig, DeploymentTarget, FlowParameters, ImageReference};
pub use environment::{Environment, EnvironmentResolution, EnvironmentSignal};
pub use error::AppError;
pub use identities::{SecretId, SecretVersionName};
pub use pipeline::{CronSchedule, FlowKind, PipelineDeclaration, declared_pipelines};
pub use table::{Column, ColumnType, Record, Table, TableData};
