use std::sync::{Arc, Mutex};

use crate::domain::{AppError, SecretVersionName};
use crate::ports::SecretStore;

/// Secret store double that records every requested version name.
#[derive(Clone)]
pub struct FakeSecretStore {
    payload: Result<Vec<u8>, u16>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FakeSecretStore {
    pub fn returning(payload: &str) -> Self {
        Self { payload: Ok(payload.as_bytes().to_vec()), requests: Arc::new(Mutex::new(vec![])) }
    }

    pub fn returning_bytes(payload: &[u8]) -> Self {
        Self { payload: Ok(payload.to_vec()), requests: Arc::new(Mutex::new(vec![])) }
    }

    /// Every access fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self { payload: Err(status), requests: Arc::new(Mutex::new(vec![])) }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl SecretStore for FakeSecretStore {
    fn access_secret_version(&self, name: &SecretVersionName) -> Result<Vec<u8>, AppError> {
        self.requests.lock().unwrap().push(name.to_string());
        match &self.payload {
            Ok(bytes) => Ok(bytes.clone()),
            Err(status) => Err(AppError::SecretStore {
                name: name.to_string(),
                status: Some(*status),
                message: "fake failure".into(),
            }),
        }
    }
}
