//! Physical record model shared by every entity kind.
//!
//! One table holds children, quests, rewards and assignments. A [`Record`]
//! is the tagged shape they all share: an [`EntityKind`] discriminator, the
//! primary and secondary keys, and the optional per-kind [`Attributes`].
//! The conversions here are pure and testable without a store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::quest::{Assignment, AssignmentStatus, Child, Quest, Reward};

use super::error::{StoreError, StoreResult};
use super::keys::{self, IndexKey, PrimaryKey, SecondaryIndex};

// ============================================================================
// Entity kind
// ============================================================================

/// Discriminator stored in the `Type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Child,
    Quest,
    Reward,
    Assignment,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Child => "Child",
            EntityKind::Quest => "Quest",
            EntityKind::Reward => "Reward",
            EntityKind::Assignment => "Assignment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Child" => Ok(EntityKind::Child),
            "Quest" => Ok(EntityKind::Quest),
            "Reward" => Ok(EntityKind::Reward),
            "Assignment" => Ok(EntityKind::Assignment),
            other => Err(StoreError::InvalidData(format!("Unknown entity type: {other}"))),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// Union of the non-key attributes of every entity kind.
///
/// Quests reuse `xp` and `gold` for their rewards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub parent_id: Option<String>,
    pub child_id: Option<Uuid>,
    pub quest_id: Option<Uuid>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub xp: Option<i64>,
    pub gold: Option<i64>,
    pub xp_threshold: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A single item of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: PrimaryKey,
    pub kind: EntityKind,
    /// `GSI1` entry, assignments only.
    pub by_quest: Option<IndexKey>,
    /// `GSI2` entry, children and quests only.
    pub by_id: Option<IndexKey>,
    pub attributes: Attributes,
}

impl Record {
    /// Returns this record's key within the given index, if it has one.
    pub fn index_key(&self, index: SecondaryIndex) -> Option<&IndexKey> {
        match index {
            SecondaryIndex::ByQuest => self.by_quest.as_ref(),
            SecondaryIndex::ById => self.by_id.as_ref(),
        }
    }

    fn expect_kind(&self, kind: EntityKind) -> StoreResult<()> {
        if self.kind != kind {
            return Err(StoreError::InvalidData(format!(
                "Expected {kind} record at {} / {}, found {}",
                self.key.pk, self.key.sk, self.kind
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Child conversions
// ============================================================================

/// Fails with `InvalidData` if a balance does not fit the stored width.
pub fn child_to_record(child: &Child) -> StoreResult<Record> {
    Ok(Record {
        key: keys::child_key(&child.parent_id, child.id),
        kind: EntityKind::Child,
        by_quest: None,
        by_id: Some(keys::child_by_id_key(child.id)),
        attributes: Attributes {
            parent_id: Some(child.parent_id.clone()),
            name: Some(child.name.clone()),
            xp: Some(to_stored(child.xp, "XP")?),
            gold: Some(to_stored(child.gold, "Gold")?),
            ..Attributes::default()
        },
    })
}

pub fn record_to_child(record: &Record) -> StoreResult<Child> {
    record.expect_kind(EntityKind::Child)?;
    let attrs = &record.attributes;
    Ok(Child {
        id: keys::strip_prefix(&record.key.sk, keys::CHILD_PREFIX)?,
        parent_id: require(attrs.parent_id.clone(), "ParentID")?,
        name: require(attrs.name.clone(), "Name")?,
        xp: non_negative(attrs.xp.unwrap_or(0), "XP")?,
        gold: non_negative(attrs.gold.unwrap_or(0), "Gold")?,
    })
}

// ============================================================================
// Quest conversions
// ============================================================================

pub fn quest_to_record(quest: &Quest) -> Record {
    Record {
        key: keys::quest_key(&quest.parent_id, quest.id),
        kind: EntityKind::Quest,
        by_quest: None,
        by_id: Some(keys::quest_by_id_key(quest.id)),
        attributes: Attributes {
            parent_id: Some(quest.parent_id.clone()),
            title: Some(quest.title.clone()),
            description: quest.description.clone(),
            xp: Some(i64::from(quest.xp_reward)),
            gold: Some(i64::from(quest.gold_reward)),
            ..Attributes::default()
        },
    }
}

pub fn record_to_quest(record: &Record) -> StoreResult<Quest> {
    record.expect_kind(EntityKind::Quest)?;
    let attrs = &record.attributes;
    Ok(Quest {
        id: keys::strip_prefix(&record.key.sk, keys::QUEST_PREFIX)?,
        parent_id: require(attrs.parent_id.clone(), "ParentID")?,
        title: require(attrs.title.clone(), "Title")?,
        description: attrs.description.clone(),
        xp_reward: small(require(attrs.xp, "XP")?, "XP")?,
        gold_reward: small(attrs.gold.unwrap_or(0), "Gold")?,
    })
}

// ============================================================================
// Reward conversions
// ============================================================================

pub fn reward_to_record(reward: &Reward) -> Record {
    Record {
        key: keys::reward_key(&reward.parent_id, reward.id),
        kind: EntityKind::Reward,
        by_quest: None,
        by_id: None,
        attributes: Attributes {
            parent_id: Some(reward.parent_id.clone()),
            name: Some(reward.name.clone()),
            xp_threshold: Some(i64::from(reward.xp_threshold)),
            ..Attributes::default()
        },
    }
}

pub fn record_to_reward(record: &Record) -> StoreResult<Reward> {
    record.expect_kind(EntityKind::Reward)?;
    let attrs = &record.attributes;
    Ok(Reward {
        id: keys::strip_prefix(&record.key.sk, keys::REWARD_PREFIX)?,
        parent_id: require(attrs.parent_id.clone(), "ParentID")?,
        name: require(attrs.name.clone(), "Name")?,
        xp_threshold: small(attrs.xp_threshold.unwrap_or(0), "XPThreshold")?,
    })
}

// ============================================================================
// Assignment conversions
// ============================================================================

/// An assignment as stored: it references its quest by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAssignment {
    pub key: PrimaryKey,
    pub id: Uuid,
    pub child_id: Uuid,
    pub quest_id: Uuid,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl StoredAssignment {
    /// Attaches the resolved quest snapshot.
    pub fn with_quest(self, quest: Quest) -> Assignment {
        Assignment {
            id: self.id,
            child_id: self.child_id,
            quest,
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }
}

pub fn assignment_to_record(assignment: &Assignment) -> Record {
    Record {
        key: keys::assignment_key(assignment.child_id, assignment.id),
        kind: EntityKind::Assignment,
        by_quest: Some(keys::assignment_by_quest_key(
            assignment.quest.id,
            assignment.id,
        )),
        by_id: None,
        attributes: Attributes {
            child_id: Some(assignment.child_id),
            quest_id: Some(assignment.quest.id),
            status: Some(assignment.status),
            created_at: Some(assignment.created_at),
            completed_at: assignment.completed_at,
            ..Attributes::default()
        },
    }
}

pub fn record_to_assignment(record: &Record) -> StoreResult<StoredAssignment> {
    record.expect_kind(EntityKind::Assignment)?;
    let attrs = &record.attributes;
    let status = require(attrs.status, "Status")?;
    if status.is_terminal() != attrs.completed_at.is_some() {
        return Err(StoreError::InvalidData(format!(
            "Assignment {} has status {status} but CompletedAt is {}",
            record.key.sk,
            if attrs.completed_at.is_some() { "set" } else { "missing" }
        )));
    }
    let child_id = match attrs.child_id {
        Some(id) => id,
        None => keys::child_id_from_pk(&record.key.pk)?,
    };
    Ok(StoredAssignment {
        key: record.key.clone(),
        id: keys::strip_prefix(&record.key.sk, keys::ASSIGN_PREFIX)?,
        child_id,
        quest_id: require(attrs.quest_id, "QuestID")?,
        status,
        created_at: require(attrs.created_at, "CreatedAt")?,
        completed_at: attrs.completed_at,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn require<T>(value: Option<T>, field: &str) -> StoreResult<T> {
    value.ok_or_else(|| StoreError::InvalidData(format!("Missing field: {field}")))
}

fn non_negative(value: i64, field: &str) -> StoreResult<u64> {
    u64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("Negative value for {field}: {value}")))
}

fn small(value: i64, field: &str) -> StoreResult<u32> {
    u32::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("Out of range value for {field}: {value}")))
}

fn to_stored(value: u64, field: &str) -> StoreResult<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("Out of range value for {field}: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_quest() -> Quest {
        Quest::new("parent-1", "Clean Room", 50, 10).with_description("Tidy up and vacuum")
    }

    #[test]
    fn test_child_record_has_direct_index_only() {
        let child = Child::new("parent-1", "Alex");
        let record = child_to_record(&child).unwrap();

        assert_eq!(record.key.pk, "PARENT#parent-1");
        assert_eq!(record.key.sk, format!("CHILD#{}", child.id));
        assert_eq!(record.kind, EntityKind::Child);
        assert!(record.by_quest.is_none());
        assert_eq!(
            record.index_key(SecondaryIndex::ById),
            Some(&keys::child_by_id_key(child.id))
        );
        assert_eq!(record_to_child(&record).unwrap(), child);
    }

    #[test]
    fn test_quest_stores_rewards_in_xp_and_gold() {
        let quest = sample_quest();
        let record = quest_to_record(&quest);

        assert_eq!(record.attributes.xp, Some(50));
        assert_eq!(record.attributes.gold, Some(10));
        assert_eq!(record_to_quest(&record).unwrap(), quest);
    }

    #[test]
    fn test_reward_record_has_no_index() {
        let reward = Reward::new("parent-1", "Movie Night", 200);
        let record = reward_to_record(&reward);

        assert!(record.by_id.is_none());
        assert!(record.by_quest.is_none());
        assert_eq!(record_to_reward(&record).unwrap(), reward);
    }

    #[test]
    fn test_assignment_record_is_indexed_by_quest() {
        let quest = sample_quest();
        let assignment = Assignment::new(uuid::Uuid::new_v4(), quest.clone(), Utc::now());
        let record = assignment_to_record(&assignment);

        assert_eq!(record.key.pk, format!("CHILD#{}", assignment.child_id));
        assert_eq!(
            record.by_quest,
            Some(keys::assignment_by_quest_key(quest.id, assignment.id))
        );

        let stored = record_to_assignment(&record).unwrap();
        assert_eq!(stored.quest_id, quest.id);
        assert_eq!(stored.with_quest(quest), assignment);
    }

    #[test]
    fn test_decode_rejects_wrong_kind() {
        let record = reward_to_record(&Reward::new("parent-1", "Movie Night", 200));
        assert!(matches!(
            record_to_child(&record),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_decode_rejects_completed_without_timestamp() {
        let assignment = Assignment::new(uuid::Uuid::new_v4(), sample_quest(), Utc::now());
        let mut record = assignment_to_record(&assignment);
        record.attributes.status = Some(AssignmentStatus::Completed);

        assert!(record_to_assignment(&record).is_err());
    }

    #[test]
    fn test_decode_rejects_negative_gold() {
        let mut record = child_to_record(&Child::new("parent-1", "Alex")).unwrap();
        record.attributes.gold = Some(-5);

        assert!(record_to_child(&record).is_err());
    }

    #[test]
    fn test_encode_rejects_balance_beyond_stored_range() {
        let mut child = Child::new("parent-1", "Alex");
        child.gold = u64::MAX;

        assert!(matches!(
            child_to_record(&child),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!("Quest".parse::<EntityKind>().unwrap(), EntityKind::Quest);
        assert!("Parent".parse::<EntityKind>().is_err());
    }
}
