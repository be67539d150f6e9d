use std::sync::{Arc, Mutex};

use crate::domain::{AppError, DeploymentConfig};
use crate::ports::{DeploymentId, DeploymentRegistry};

/// Registry double that records submitted deployments.
#[derive(Clone, Default)]
pub struct FakeRegistry {
    pub registered: Arc<Mutex<Vec<DeploymentConfig>>>,
    /// Zero-based index of the call that should fail.
    fail_on: Option<usize>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call: usize) -> Self {
        Self { fail_on: Some(call), ..Self::default() }
    }

    pub fn registered(&self) -> Vec<DeploymentConfig> {
        self.registered.lock().unwrap().clone()
    }
}

impl DeploymentRegistry for FakeRegistry {
    fn register(&self, config: &DeploymentConfig) -> Result<DeploymentId, AppError> {
        let mut registered = self.registered.lock().unwrap();
        if self.fail_on == Some(registered.len()) {
            return Err(AppError::Registry {
                deployment: config.deployment_name.clone(),
                details: "rejected by fake registry".into(),
            });
        }
        registered.push(config.clone());
        Ok(DeploymentId(format!("deployment-{}", registered.len())))
    }
}
