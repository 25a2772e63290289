//! Request types for parent-scoped creation operations.
//!
//! Pure data types with no I/O. Each request turns into its entity with a
//! freshly generated ID.

use serde::{Deserialize, Serialize};

use super::types::{Child, Quest, Reward};

/// Request payload for creating a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChild {
    pub parent_id: String,
    pub name: String,
}

impl NewChild {
    pub fn new(parent_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            name: name.into(),
        }
    }

    pub fn into_child(self) -> Child {
        Child::new(self.parent_id, self.name)
    }
}

/// Request payload for creating a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuest {
    pub parent_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl NewQuest {
    pub fn new(
        parent_id: impl Into<String>,
        title: impl Into<String>,
        xp_reward: u32,
        gold_reward: u32,
    ) -> Self {
        Self {
            parent_id: parent_id.into(),
            title: title.into(),
            description: None,
            xp_reward,
            gold_reward,
        }
    }

    /// Set the quest description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn into_quest(self) -> Quest {
        let quest = Quest::new(self.parent_id, self.title, self.xp_reward, self.gold_reward);
        match self.description {
            Some(description) => quest.with_description(description),
            None => quest,
        }
    }
}

/// Request payload for creating a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReward {
    pub parent_id: String,
    pub name: String,
    pub xp_threshold: u32,
}

impl NewReward {
    pub fn new(parent_id: impl Into<String>, name: impl Into<String>, xp_threshold: u32) -> Self {
        Self {
            parent_id: parent_id.into(),
            name: name.into(),
            xp_threshold,
        }
    }

    pub fn into_reward(self) -> Reward {
        Reward::new(self.parent_id, self.name, self.xp_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_quest_into_quest_keeps_rewards() {
        let quest = NewQuest::new("parent-1", "Clean Room", 50, 10)
            .with_description("Tidy up and vacuum")
            .into_quest();

        assert_eq!(quest.title, "Clean Room");
        assert_eq!(quest.description.as_deref(), Some("Tidy up and vacuum"));
        assert_eq!(quest.xp_reward, 50);
        assert_eq!(quest.gold_reward, 10);
    }

    #[test]
    fn test_each_conversion_generates_a_fresh_id() {
        let request = NewChild::new("parent-1", "Alex");
        let first = request.clone().into_child();
        let second = request.into_child();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_new_quest_deserializes_without_description() {
        let json = r#"{"parentId":"p","title":"Do Dishes","xpReward":30,"goldReward":8}"#;
        let request: NewQuest = serde_json::from_str(json).unwrap();
        assert_eq!(request.description, None);
        assert_eq!(request.gold_reward, 8);
    }
}
