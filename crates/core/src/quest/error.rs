use thiserror::Error;

/// Errors that can occur when validating creation requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Parent ID cannot be empty")]
    EmptyParentId,
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Name too long (max 100 characters)")]
    NameTooLong,
    #[error("Quest title cannot be empty")]
    EmptyTitle,
    #[error("Quest title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Quest XP reward must be greater than zero")]
    ZeroXpReward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::EmptyName.to_string(),
            "Name cannot be empty"
        );
        assert_eq!(
            ValidationError::ZeroXpReward.to_string(),
            "Quest XP reward must be greater than zero"
        );
    }
}
