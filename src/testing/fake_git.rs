use std::sync::Mutex;
use std::time::Duration;

use crate::ports::{Git, GitError};

/// Git double that reports a fixed branch or a failure.
pub struct FakeGit {
    branch: Option<String>,
    pub calls: Mutex<usize>,
}

impl FakeGit {
    pub fn on_branch(branch: &str) -> Self {
        Self { branch: Some(branch.to_string()), calls: Mutex::new(0) }
    }

    /// A git that never answers, as when the binary hangs past its deadline.
    pub fn unavailable() -> Self {
        Self { branch: None, calls: Mutex::new(0) }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Git for FakeGit {
    fn get_current_branch(&self) -> Result<String, GitError> {
        *self.calls.lock().unwrap() += 1;
        self.branch.clone().ok_or(GitError::Timeout(Duration::from_secs(2)))
    }
}
