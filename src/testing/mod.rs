mod fake_git;
mod fake_registry;
mod fake_secret_store;
mod fake_warehouse;

pub use fake_git::FakeGit;
pub use fake_registry::FakeRegistry;
pub use fake_secret_store::FakeSecretStore;
pub use fake_warehouse::{FakeConnector, WarehouseCall};

/// PKCS#8 RSA key used to sign test assertions. Not associated with any account.
pub const TEST_PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");
