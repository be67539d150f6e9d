//! Resolution services shared by the commands.

pub mod environment_resolver;
pub mod secret_resolver;

pub use environment_resolver::resolve_environment;
pub use secret_resolver::{ResolvedSecret, SecretResolver, SecretSource};
