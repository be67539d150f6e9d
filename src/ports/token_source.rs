use crate::domain::AppError;

/// Supplies OAuth bearer tokens for cloud API calls.
pub trait TokenSource {
    fn access_token(&self) -> Result<String, AppError>;
}
