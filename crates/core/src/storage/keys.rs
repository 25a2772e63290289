//! Key codec for the single-table design.
//!
//! Pure functions for generating partition, sort and secondary-index keys.
//! All functions are sync and have no side effects.

use uuid::Uuid;

use super::error::StoreError;

// ============================================================================
// Key prefixes
// ============================================================================

pub const PARENT_PREFIX: &str = "PARENT#";
pub const CHILD_PREFIX: &str = "CHILD#";
pub const QUEST_PREFIX: &str = "QUEST#";
pub const REWARD_PREFIX: &str = "REWARD#";
pub const ASSIGN_PREFIX: &str = "ASSIGN#";

/// Constant sort key of every direct-by-id index entry.
pub const META_SK: &str = "META";

// ============================================================================
// Key types
// ============================================================================

/// Primary key of a record: partition key plus sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimaryKey {
    pub pk: String,
    pub sk: String,
}

impl PrimaryKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

/// Key of a record within one secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub pk: String,
    pub sk: String,
}

impl IndexKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

/// The two secondary indexes of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryIndex {
    /// `GSI1`: assignments keyed by quest, sorted by assignment id.
    ByQuest,
    /// `GSI2`: children and quests keyed by their own id.
    ById,
}

impl SecondaryIndex {
    /// Physical index name.
    pub fn name(&self) -> &'static str {
        match self {
            SecondaryIndex::ByQuest => "GSI1",
            SecondaryIndex::ById => "GSI2",
        }
    }
}

/// How to match entries of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLookup {
    /// Both index key parts match exactly.
    Exact(IndexKey),
    /// Every entry under one index partition.
    Partition(String),
    /// Entries whose index sort key equals the value, in any index partition.
    SortKey(String),
}

impl IndexLookup {
    /// Returns true if the given index key satisfies this lookup.
    pub fn matches(&self, key: &IndexKey) -> bool {
        match self {
            IndexLookup::Exact(expected) => expected == key,
            IndexLookup::Partition(pk) => &key.pk == pk,
            IndexLookup::SortKey(sk) => &key.sk == sk,
        }
    }
}

// ============================================================================
// Partition keys
// ============================================================================

/// Partition owning a parent's children, quests and rewards.
///
/// Pattern: `PARENT#<parent_id>`
pub fn parent_pk(parent_id: &str) -> String {
    format!("{PARENT_PREFIX}{parent_id}")
}

/// Partition owning a child's assignments.
///
/// Pattern: `CHILD#<child_id>`
pub fn child_pk(child_id: Uuid) -> String {
    format!("{CHILD_PREFIX}{child_id}")
}

// ============================================================================
// Sort keys
// ============================================================================

/// Pattern: `CHILD#<child_id>`
pub fn child_sk(child_id: Uuid) -> String {
    format!("{CHILD_PREFIX}{child_id}")
}

/// Pattern: `QUEST#<quest_id>`
pub fn quest_sk(quest_id: Uuid) -> String {
    format!("{QUEST_PREFIX}{quest_id}")
}

/// Pattern: `REWARD#<reward_id>`
pub fn reward_sk(reward_id: Uuid) -> String {
    format!("{REWARD_PREFIX}{reward_id}")
}

/// Pattern: `ASSIGN#<assignment_id>`
pub fn assignment_sk(assignment_id: Uuid) -> String {
    format!("{ASSIGN_PREFIX}{assignment_id}")
}

// ============================================================================
// Primary keys
// ============================================================================

pub fn child_key(parent_id: &str, child_id: Uuid) -> PrimaryKey {
    PrimaryKey::new(parent_pk(parent_id), child_sk(child_id))
}

pub fn quest_key(parent_id: &str, quest_id: Uuid) -> PrimaryKey {
    PrimaryKey::new(parent_pk(parent_id), quest_sk(quest_id))
}

pub fn reward_key(parent_id: &str, reward_id: Uuid) -> PrimaryKey {
    PrimaryKey::new(parent_pk(parent_id), reward_sk(reward_id))
}

pub fn assignment_key(child_id: Uuid, assignment_id: Uuid) -> PrimaryKey {
    PrimaryKey::new(child_pk(child_id), assignment_sk(assignment_id))
}

// ============================================================================
// Secondary index keys
// ============================================================================

/// `GSI1` key of an assignment.
///
/// Pattern: `QUEST#<quest_id>` / `ASSIGN#<assignment_id>`
pub fn assignment_by_quest_key(quest_id: Uuid, assignment_id: Uuid) -> IndexKey {
    IndexKey::new(quest_sk(quest_id), assignment_sk(assignment_id))
}

/// `GSI2` key of a child.
///
/// Pattern: `CHILD#<child_id>` / `META`
pub fn child_by_id_key(child_id: Uuid) -> IndexKey {
    IndexKey::new(child_sk(child_id), META_SK)
}

/// `GSI2` key of a quest.
///
/// Pattern: `QUEST#<quest_id>` / `META`
pub fn quest_by_id_key(quest_id: Uuid) -> IndexKey {
    IndexKey::new(quest_sk(quest_id), META_SK)
}

/// Lookup of every assignment of a quest on `GSI1`.
pub fn assignments_of_quest(quest_id: Uuid) -> IndexLookup {
    IndexLookup::Partition(quest_sk(quest_id))
}

/// Lookup of a single assignment on `GSI1` when its quest is unknown.
pub fn assignment_by_id(assignment_id: Uuid) -> IndexLookup {
    IndexLookup::SortKey(assignment_sk(assignment_id))
}

// ============================================================================
// Id recovery
// ============================================================================

/// Recovers an entity id from a key carrying the given prefix.
pub fn strip_prefix(key: &str, prefix: &str) -> Result<Uuid, StoreError> {
    let raw = key
        .strip_prefix(prefix)
        .ok_or_else(|| StoreError::InvalidData(format!("Key {key} does not start with {prefix}")))?;
    Uuid::parse_str(raw)
        .map_err(|e| StoreError::InvalidData(format!("Invalid id in key {key}: {e}")))
}

pub fn child_id_from_pk(pk: &str) -> Result<Uuid, StoreError> {
    strip_prefix(pk, CHILD_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[test]
    fn test_parent_pk() {
        assert_eq!(parent_pk("parent-1"), "PARENT#parent-1");
    }

    #[test]
    fn test_child_key() {
        let child_id = id("550e8400-e29b-41d4-a716-446655440001");
        let key = child_key("parent-1", child_id);
        assert_eq!(key.pk, "PARENT#parent-1");
        assert_eq!(key.sk, "CHILD#550e8400-e29b-41d4-a716-446655440001");
    }

    #[test]
    fn test_assignment_key_lives_under_child() {
        let child_id = id("550e8400-e29b-41d4-a716-446655440001");
        let assignment_id = id("550e8400-e29b-41d4-a716-446655440004");
        let key = assignment_key(child_id, assignment_id);
        assert_eq!(key.pk, "CHILD#550e8400-e29b-41d4-a716-446655440001");
        assert_eq!(key.sk, "ASSIGN#550e8400-e29b-41d4-a716-446655440004");
    }

    #[test]
    fn test_assignment_by_quest_key() {
        let quest_id = id("550e8400-e29b-41d4-a716-446655440002");
        let assignment_id = id("550e8400-e29b-41d4-a716-446655440004");
        let key = assignment_by_quest_key(quest_id, assignment_id);
        assert_eq!(key.pk, "QUEST#550e8400-e29b-41d4-a716-446655440002");
        assert_eq!(key.sk, "ASSIGN#550e8400-e29b-41d4-a716-446655440004");
    }

    #[test]
    fn test_by_id_keys_use_meta() {
        let child_id = id("550e8400-e29b-41d4-a716-446655440001");
        let quest_id = id("550e8400-e29b-41d4-a716-446655440002");
        assert_eq!(
            child_by_id_key(child_id),
            IndexKey::new("CHILD#550e8400-e29b-41d4-a716-446655440001", "META")
        );
        assert_eq!(
            quest_by_id_key(quest_id),
            IndexKey::new("QUEST#550e8400-e29b-41d4-a716-446655440002", "META")
        );
    }

    #[test]
    fn test_same_id_never_collides_across_kinds() {
        let shared = Uuid::new_v4();
        let keys = [
            child_sk(shared),
            quest_sk(shared),
            reward_sk(shared),
            assignment_sk(shared),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_index_lookup_matches() {
        let quest_id = Uuid::new_v4();
        let assignment_id = Uuid::new_v4();
        let key = assignment_by_quest_key(quest_id, assignment_id);

        assert!(IndexLookup::Exact(key.clone()).matches(&key));
        assert!(assignments_of_quest(quest_id).matches(&key));
        assert!(assignment_by_id(assignment_id).matches(&key));
        assert!(!assignment_by_id(Uuid::new_v4()).matches(&key));
        assert!(!assignments_of_quest(Uuid::new_v4()).matches(&key));
    }

    #[test]
    fn test_strip_prefix_round_trip() {
        let quest_id = Uuid::new_v4();
        assert_eq!(strip_prefix(&quest_sk(quest_id), QUEST_PREFIX).unwrap(), quest_id);
        assert_eq!(child_id_from_pk(&child_pk(quest_id)).unwrap(), quest_id);
    }

    #[test]
    fn test_strip_prefix_rejects_wrong_kind() {
        let quest_id = Uuid::new_v4();
        assert!(strip_prefix(&quest_sk(quest_id), CHILD_PREFIX).is_err());
        assert!(strip_prefix("QUEST#not-a-uuid", QUEST_PREFIX).is_err());
    }

    #[test]
    fn test_index_names() {
        assert_eq!(SecondaryIndex::ByQuest.name(), "GSI1");
        assert_eq!(SecondaryIndex::ById.name(), "GSI2");
    }
}
