use thiserror::Error;

/// Errors surfaced by the workflow.
#[derive(Debug, Error)]
pub enum PublishingError {
    /// id-scoped call matched no eligible row
    #[error("content record not found")]
    NotFound,

    /// publish was attempted with no acting principal
    #[error("publishing requires an authenticated principal")]
    AuthenticationRequired,

    /// database failure, stringified at the boundary
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<sqlx::Error> for PublishingError {
    fn from(value: sqlx::Error) -> Self {
        PublishingError::Persistence(value.to_string())
    }
}
