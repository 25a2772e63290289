use thiserror::Error;

use crate::quest::ValidationError;

/// Errors raised by an [`EntityStore`](super::EntityStore) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record already exists: {pk} / {sk}")]
    AlreadyExists { pk: String, sk: String },
    /// A precondition did not hold. `index` is the position of the failing
    /// update within a transaction, 0 for single-item calls.
    #[error("Condition failed on update {index}")]
    ConditionFailed { index: usize },
    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Discriminant of a [`RepositoryError`], for callers mapping errors to
/// transport responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    AlreadyCompleted,
    InsufficientFunds,
    TransactionAborted,
    StoreUnavailable,
    InvalidData,
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Assignment already completed: {id}")]
    AlreadyCompleted { id: String },
    #[error("Insufficient funds for child {child_id}: price {price_gold}")]
    InsufficientFunds { child_id: String, price_gold: u32 },
    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            RepositoryError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            RepositoryError::AlreadyCompleted { .. } => ErrorKind::AlreadyCompleted,
            RepositoryError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            RepositoryError::TransactionAborted(_) => ErrorKind::TransactionAborted,
            RepositoryError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            RepositoryError::InvalidData(_) => ErrorKind::InvalidData,
        }
    }

    /// Returns true if the caller may retry the whole operation.
    ///
    /// Guard failures (`AlreadyCompleted`, `InsufficientFunds`,
    /// `AlreadyExists`) are final outcomes and never transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RepositoryError::TransactionAborted(_) | RepositoryError::StoreUnavailable(_)
        )
    }
}

impl From<StoreError> for RepositoryError {
    /// Generic translation. Call sites that issue a conditional write map
    /// `ConditionFailed` to their own guard error before falling back here.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists { pk, sk } => RepositoryError::AlreadyExists {
                entity_type: "Record",
                id: format!("{pk} / {sk}"),
            },
            StoreError::ConditionFailed { index } => {
                RepositoryError::InvalidData(format!("Unexpected failed condition on update {index}"))
            }
            StoreError::TransactionAborted(msg) => RepositoryError::TransactionAborted(msg),
            StoreError::Unavailable(msg) => RepositoryError::StoreUnavailable(msg),
            StoreError::InvalidData(msg) => RepositoryError::InvalidData(msg),
        }
    }
}

impl From<ValidationError> for RepositoryError {
    fn from(err: ValidationError) -> Self {
        RepositoryError::InvalidData(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Quest",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "Quest not found: abc-123");
    }

    #[test]
    fn test_repository_error_insufficient_funds_display() {
        let error = RepositoryError::InsufficientFunds {
            child_id: "child-1".to_string(),
            price_gold: 15,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient funds for child child-1: price 15"
        );
    }

    #[test]
    fn test_only_infrastructure_errors_are_transient() {
        assert!(RepositoryError::TransactionAborted("conflict".into()).is_transient());
        assert!(RepositoryError::StoreUnavailable("timeout".into()).is_transient());
        assert!(!RepositoryError::AlreadyCompleted { id: "a".into() }.is_transient());
        assert!(!RepositoryError::InsufficientFunds {
            child_id: "c".into(),
            price_gold: 1
        }
        .is_transient());
        assert!(!RepositoryError::AlreadyExists {
            entity_type: "Child",
            id: "c".into()
        }
        .is_transient());
    }

    #[test]
    fn test_store_error_conversion_keeps_kind() {
        let aborted: RepositoryError = StoreError::TransactionAborted("conflict".into()).into();
        assert_eq!(aborted.kind(), ErrorKind::TransactionAborted);

        let unavailable: RepositoryError = StoreError::Unavailable("throttled".into()).into();
        assert_eq!(unavailable.kind(), ErrorKind::StoreUnavailable);

        let exists: RepositoryError = StoreError::AlreadyExists {
            pk: "PARENT#p".into(),
            sk: "CHILD#c".into(),
        }
        .into();
        assert_eq!(exists.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_validation_error_becomes_invalid_data() {
        let error: RepositoryError = ValidationError::EmptyName.into();
        assert_eq!(error, RepositoryError::InvalidData("Name cannot be empty".into()));
    }
}
