pub mod secret_id;
pub mod validation;

pub use secret_id::{SecretId, SecretVersionName};
