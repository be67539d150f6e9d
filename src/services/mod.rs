pub mod bigquery_http;
pub mod dry_run_registry;
pub mod gcp_auth;
pub mod git_command;
pub mod http_client;
pub mod image_template;
pub mod prefect_http;
pub mod secret_manager_http;

pub use bigquery_http::{BigQueryConnector, BigQueryUrls};
pub use dry_run_registry::DryRunRegistry;
pub use gcp_auth::{AmbientAuth, MetadataServerToken, ServiceAccountToken, StaticToken};
pub use git_command::GitCommandAdapter;
pub use image_template::render_image_reference;
pub use prefect_http::PrefectHttpRegistry;
pub use secret_manager_http::SecretManagerHttpClient;
