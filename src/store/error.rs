use thiserror::Error;

/// Errors raised by a `DataStore` backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation errors
    /// Automatically converted from sqlx::Error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced row does not exist
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// Write rejected by a uniqueness or exclusion rule
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend unavailable or failed for a non-database reason
    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}
