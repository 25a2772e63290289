//! Pure validation functions for creation requests.

use super::error::ValidationError;
use super::requests::{NewChild, NewQuest, NewReward};

const MAX_NAME_LEN: usize = 100;
const MAX_TITLE_LEN: usize = 200;

fn validate_parent_id(parent_id: &str) -> Result<(), ValidationError> {
    if parent_id.trim().is_empty() {
        return Err(ValidationError::EmptyParentId);
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

/// Validates a child creation request.
pub fn validate_new_child(request: &NewChild) -> Result<(), ValidationError> {
    validate_parent_id(&request.parent_id)?;
    validate_name(&request.name)
}

/// Validates a quest creation request.
pub fn validate_new_quest(request: &NewQuest) -> Result<(), ValidationError> {
    validate_parent_id(&request.parent_id)?;
    if request.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if request.title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    if request.xp_reward == 0 {
        return Err(ValidationError::ZeroXpReward);
    }
    Ok(())
}

/// Validates a reward creation request.
pub fn validate_new_reward(request: &NewReward) -> Result<(), ValidationError> {
    validate_parent_id(&request.parent_id)?;
    validate_name(&request.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_child() {
        assert!(validate_new_child(&NewChild::new("parent-1", "Alex")).is_ok());
    }

    #[test]
    fn test_child_requires_parent_and_name() {
        assert_eq!(
            validate_new_child(&NewChild::new("  ", "Alex")),
            Err(ValidationError::EmptyParentId)
        );
        assert_eq!(
            validate_new_child(&NewChild::new("parent-1", "")),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validate_new_child(&NewChild::new("parent-1", "x".repeat(101))),
            Err(ValidationError::NameTooLong)
        );
    }

    #[test]
    fn test_quest_rules() {
        assert!(validate_new_quest(&NewQuest::new("p", "Clean Room", 50, 0)).is_ok());
        assert_eq!(
            validate_new_quest(&NewQuest::new("p", "Clean Room", 0, 10)),
            Err(ValidationError::ZeroXpReward)
        );
        assert_eq!(
            validate_new_quest(&NewQuest::new("p", " ", 5, 1)),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            validate_new_quest(&NewQuest::new("p", "t".repeat(201), 5, 1)),
            Err(ValidationError::TitleTooLong)
        );
    }

    #[test]
    fn test_reward_allows_zero_threshold() {
        assert!(validate_new_reward(&NewReward::new("p", "Sticker", 0)).is_ok());
        assert_eq!(
            validate_new_reward(&NewReward::new("p", "", 10)),
            Err(ValidationError::EmptyName)
        );
    }
}
