mod deployment_registry;
mod git;
mod secret_store;
mod token_source;
mod warehouse;

pub use deployment_registry::{DeploymentId, DeploymentRegistry};
pub use git::{Git, GitError};
pub use secret_store::SecretStore;
pub use token_source::TokenSource;
pub use warehouse::{Warehouse, WarehouseConnector};
