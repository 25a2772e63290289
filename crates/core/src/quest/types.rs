use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A child that earns XP and gold by completing quests.
///
/// Owned by a parent partition; `xp` and `gold` start at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: Uuid,
    pub parent_id: String,
    pub name: String,
    pub xp: u64,
    pub gold: u64,
}

impl Child {
    /// Creates a new child with a fresh ID and an empty balance.
    pub fn new(parent_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: parent_id.into(),
            name: name.into(),
            xp: 0,
            gold: 0,
        }
    }
}

/// A chore defined by a parent, worth a fixed amount of XP and gold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: Uuid,
    pub parent_id: String,
    pub title: String,
    pub description: Option<String>,
    /// XP credited on completion. Always greater than zero.
    pub xp_reward: u32,
    /// Gold credited on completion.
    pub gold_reward: u32,
}

impl Quest {
    /// Creates a new quest with a fresh ID.
    pub fn new(
        parent_id: impl Into<String>,
        title: impl Into<String>,
        xp_reward: u32,
        gold_reward: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: parent_id.into(),
            title: title.into(),
            description: None,
            xp_reward,
            gold_reward,
        }
    }

    /// Sets the description for this quest.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A reward that unlocks once a child reaches an XP threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: Uuid,
    pub parent_id: String,
    pub name: String,
    pub xp_threshold: u32,
}

impl Reward {
    /// Creates a new reward with a fresh ID.
    pub fn new(parent_id: impl Into<String>, name: impl Into<String>, xp_threshold: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: parent_id.into(),
            name: name.into(),
            xp_threshold,
        }
    }

    /// Returns true if a child with the given XP has unlocked this reward.
    pub fn is_unlocked_by(&self, xp: u64) -> bool {
        xp >= u64::from(self.xp_threshold)
    }
}

/// Lifecycle state of an assignment. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Assigned,
    Completed,
}

impl AssignmentStatus {
    /// Wire representation used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "ASSIGNED",
            AssignmentStatus::Completed => "COMPLETED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Completed)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown assignment status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown assignment status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AssignmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSIGNED" => Ok(AssignmentStatus::Assigned),
            "COMPLETED" => Ok(AssignmentStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A quest handed to a child, carrying a snapshot of the quest it refers to.
///
/// `completed_at` is set if and only if `status` is `Completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub child_id: Uuid,
    pub quest: Quest,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Creates a new assignment in the `Assigned` state.
    pub fn new(child_id: Uuid, quest: Quest, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            child_id,
            quest,
            status: AssignmentStatus::Assigned,
            created_at,
            completed_at: None,
        }
    }

    /// Returns this assignment moved to the `Completed` state.
    pub fn completed(mut self, completed_at: DateTime<Utc>) -> Self {
        self.status = AssignmentStatus::Completed;
        self.completed_at = Some(completed_at);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }
}
