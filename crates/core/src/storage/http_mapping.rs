//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! The transport layer lives outside this crate; it uses this mapping so
//! every error kind reaches the client with its own status.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `InvalidData` -> 400 (Bad Request)
/// - `InsufficientFunds` -> 402 (Payment Required)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `AlreadyCompleted` -> 422 (Unprocessable Entity)
/// - `TransactionAborted` -> 503 (Service Unavailable)
/// - `StoreUnavailable` -> 503 (Service Unavailable)
///
/// # Examples
///
/// ```
/// use chorequest_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::AlreadyCompleted {
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 422);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::InsufficientFunds { .. } => 402,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::AlreadyCompleted { .. } => 422,
        RepositoryError::TransactionAborted(_) => 503,
        RepositoryError::StoreUnavailable(_) => 503,
    }
}
