use std::time::Duration;

use thiserror::Error;

/// Failure of a git invocation.
///
/// Callers treat every variant as "no information"; it is never surfaced
/// as an [`AppError`](crate::domain::AppError).
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git did not finish within {0:?}")]
    Timeout(Duration),

    #[error("git exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("git produced no output")]
    EmptyOutput,
}

pub trait Git {
    /// Get the current branch name.
    fn get_current_branch(&self) -> Result<String, GitError>;
}
