//! Typed domain operations over an [`EntityStore`].
//!
//! The repository owns the transactional logic: quest completion credits
//! XP and gold exactly once, and purchases never drive gold negative. Both
//! rely solely on the store's conditional primitives. The repository never
//! retries; transient failures surface to the caller as-is.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::quest::{
    validate_new_child, validate_new_quest, validate_new_reward, Assignment, AssignmentStatus,
    Child, NewChild, NewQuest, NewReward, Quest, Reward,
};

use super::error::{RepositoryError, Result, StoreError};
use super::keys::{self, IndexLookup, SecondaryIndex};
use super::record::{
    assignment_to_record, child_to_record, quest_to_record, record_to_assignment, record_to_child,
    record_to_quest, record_to_reward, reward_to_record, Record, StoredAssignment,
};
use super::traits::EntityStore;
use super::update::{Condition, ConditionalUpdate, Field, Value};

/// Domain repository for parents, children, quests, rewards and assignments.
///
/// The store handle is injected so tests can run against
/// [`InMemoryStore`](super::InMemoryStore).
#[derive(Debug, Clone)]
pub struct ChoreRepository<S> {
    store: S,
}

impl<S: EntityStore> ChoreRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Children
    // ========================================================================

    pub async fn create_child(&self, request: NewChild) -> Result<Child> {
        validate_new_child(&request)?;
        let child = request.into_child();
        self.put_new(child_to_record(&child)?, "Child", child.id)
            .await?;

        tracing::info!(child_id = %child.id, parent_id = %child.parent_id, "Created child");
        Ok(child)
    }

    pub async fn list_children(&self, parent_id: &str) -> Result<Vec<Child>> {
        let records = self
            .store
            .query_by_prefix(&keys::parent_pk(parent_id), keys::CHILD_PREFIX)
            .await?;
        Ok(records
            .iter()
            .map(record_to_child)
            .collect::<std::result::Result<_, _>>()?)
    }

    /// Gets a child by ID alone through the direct-by-id index.
    pub async fn get_child(&self, child_id: Uuid) -> Result<Child> {
        let record = self.child_record(child_id).await?;
        Ok(record_to_child(&record)?)
    }

    // ========================================================================
    // Quests
    // ========================================================================

    pub async fn create_quest(&self, request: NewQuest) -> Result<Quest> {
        validate_new_quest(&request)?;
        let quest = request.into_quest();
        self.put_new(quest_to_record(&quest), "Quest", quest.id).await?;

        tracing::info!(
            quest_id = %quest.id,
            parent_id = %quest.parent_id,
            xp = quest.xp_reward,
            gold = quest.gold_reward,
            "Created quest"
        );
        Ok(quest)
    }

    pub async fn list_quests(&self, parent_id: &str) -> Result<Vec<Quest>> {
        let records = self
            .store
            .query_by_prefix(&keys::parent_pk(parent_id), keys::QUEST_PREFIX)
            .await?;
        Ok(records
            .iter()
            .map(record_to_quest)
            .collect::<std::result::Result<_, _>>()?)
    }

    /// Gets a quest by ID alone through the direct-by-id index.
    pub async fn get_quest_by_id(&self, quest_id: Uuid) -> Result<Quest> {
        let lookup = IndexLookup::Exact(keys::quest_by_id_key(quest_id));
        let record = self
            .first_in_index(SecondaryIndex::ById, &lookup)
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Quest",
                id: quest_id.to_string(),
            })?;
        Ok(record_to_quest(&record)?)
    }

    // ========================================================================
    // Rewards
    // ========================================================================

    pub async fn create_reward(&self, request: NewReward) -> Result<Reward> {
        validate_new_reward(&request)?;
        let reward = request.into_reward();
        self.put_new(reward_to_record(&reward), "Reward", reward.id)
            .await?;

        tracing::info!(reward_id = %reward.id, parent_id = %reward.parent_id, "Created reward");
        Ok(reward)
    }

    pub async fn list_rewards(&self, parent_id: &str) -> Result<Vec<Reward>> {
        let records = self
            .store
            .query_by_prefix(&keys::parent_pk(parent_id), keys::REWARD_PREFIX)
            .await?;
        Ok(records
            .iter()
            .map(record_to_reward)
            .collect::<std::result::Result<_, _>>()?)
    }

    /// Rewards of the child's parent that the child's XP has reached.
    pub async fn list_unlocked_rewards(&self, child_id: Uuid) -> Result<Vec<Reward>> {
        let child = self.get_child(child_id).await?;
        let rewards = self.list_rewards(&child.parent_id).await?;
        Ok(rewards
            .into_iter()
            .filter(|reward| reward.is_unlocked_by(child.xp))
            .collect())
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    /// Assigns a quest to a child.
    ///
    /// Both the quest and the child are resolved before anything is written,
    /// so a missing reference never leaves an assignment behind.
    pub async fn assign_quest(&self, quest_id: Uuid, child_id: Uuid) -> Result<Assignment> {
        let quest = self.get_quest_by_id(quest_id).await?;
        self.child_record(child_id).await?;

        let assignment = Assignment::new(child_id, quest, Utc::now());
        self.put_new(assignment_to_record(&assignment), "Assignment", assignment.id)
            .await?;

        tracing::info!(
            assignment_id = %assignment.id,
            quest_id = %quest_id,
            child_id = %child_id,
            "Assigned quest"
        );
        Ok(assignment)
    }

    /// Gets one assignment by its primary key.
    pub async fn get_assignment(&self, child_id: Uuid, assignment_id: Uuid) -> Result<Assignment> {
        let record = self
            .store
            .get(&keys::assignment_key(child_id, assignment_id))
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Assignment",
                id: assignment_id.to_string(),
            })?;
        let stored = record_to_assignment(&record)?;
        let quest = self.get_quest_by_id(stored.quest_id).await?;
        Ok(stored.with_quest(quest))
    }

    pub async fn list_assignments_for_child(&self, child_id: Uuid) -> Result<Vec<Assignment>> {
        let records = self
            .store
            .query_by_prefix(&keys::child_pk(child_id), keys::ASSIGN_PREFIX)
            .await?;
        self.attach_quests(&records).await
    }

    /// All assignments of a quest, across every child, via the by-quest index.
    pub async fn list_assignments_for_quest(&self, quest_id: Uuid) -> Result<Vec<Assignment>> {
        let records = self
            .store
            .query_by_secondary_index(SecondaryIndex::ByQuest, &keys::assignments_of_quest(quest_id))
            .await?;
        self.attach_quests(&records).await
    }

    /// Completes an assignment and credits the quest's reward to the child.
    ///
    /// The status change and the credit commit in one atomic multi-update.
    /// The status change is guarded on the assignment not being completed
    /// yet, so concurrent or repeated calls credit the child exactly once;
    /// every call but the winning one fails with `AlreadyCompleted`.
    pub async fn complete_assignment(&self, assignment_id: Uuid) -> Result<Assignment> {
        let record = self
            .first_in_index(SecondaryIndex::ByQuest, &keys::assignment_by_id(assignment_id))
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Assignment",
                id: assignment_id.to_string(),
            })?;
        let stored = record_to_assignment(&record)?;
        if stored.status.is_terminal() {
            tracing::warn!(assignment_id = %assignment_id, "Assignment already completed");
            return Err(RepositoryError::AlreadyCompleted {
                id: assignment_id.to_string(),
            });
        }

        let quest = self.get_quest_by_id(stored.quest_id).await?;
        let child = self.child_record(stored.child_id).await?;

        let completed_at = Utc::now();
        let mark_completed = ConditionalUpdate::new(stored.key.clone())
            .set(Field::Status, Value::Status(AssignmentStatus::Completed))
            .set(Field::CompletedAt, Value::Timestamp(completed_at))
            .when(Condition::All(vec![
                Condition::Absent(Field::CompletedAt),
                Condition::NotEqual(Field::Status, Value::Status(AssignmentStatus::Completed)),
            ]));
        let credit_child = ConditionalUpdate::new(child.key.clone())
            .add(Field::Xp, i64::from(quest.xp_reward))
            .add(Field::Gold, i64::from(quest.gold_reward));

        self.store
            .atomic_multi_update(vec![mark_completed, credit_child])
            .await
            .map_err(|err| match err {
                StoreError::ConditionFailed { index: 0 } => {
                    tracing::warn!(assignment_id = %assignment_id, "Completion guard tripped");
                    RepositoryError::AlreadyCompleted {
                        id: assignment_id.to_string(),
                    }
                }
                StoreError::ConditionFailed { .. } => RepositoryError::NotFound {
                    entity_type: "Child",
                    id: stored.child_id.to_string(),
                },
                other => other.into(),
            })?;

        tracing::info!(
            assignment_id = %assignment_id,
            child_id = %stored.child_id,
            xp = quest.xp_reward,
            gold = quest.gold_reward,
            "Completed assignment"
        );
        Ok(stored.with_quest(quest).completed(completed_at))
    }

    // ========================================================================
    // Purchases
    // ========================================================================

    /// Spends gold on an item.
    ///
    /// The deduction is guarded by the store on `gold >= price`, so two
    /// concurrent purchases can never both succeed past the balance. The
    /// item name is informational and not persisted.
    pub async fn purchase_item(
        &self,
        child_id: Uuid,
        item_name: &str,
        price_gold: u32,
    ) -> Result<Child> {
        let record = self.child_record(child_id).await?;
        let price = i64::from(price_gold);

        let update = ConditionalUpdate::new(record.key)
            .add(Field::Gold, -price)
            .when(Condition::AtLeast(Field::Gold, price));
        let updated = self
            .store
            .conditional_update(update)
            .await
            .map_err(|err| match err {
                StoreError::ConditionFailed { .. } => {
                    tracing::warn!(
                        child_id = %child_id,
                        item = item_name,
                        price_gold,
                        "Purchase rejected, insufficient funds"
                    );
                    RepositoryError::InsufficientFunds {
                        child_id: child_id.to_string(),
                        price_gold,
                    }
                }
                other => other.into(),
            })?;
        let child = record_to_child(&updated)?;

        tracing::info!(
            child_id = %child_id,
            item = item_name,
            price_gold,
            gold = child.gold,
            "Purchased item"
        );
        Ok(child)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn put_new(&self, record: Record, entity_type: &'static str, id: Uuid) -> Result<()> {
        self.store.put_new(record).await.map_err(|err| match err {
            StoreError::AlreadyExists { .. } => RepositoryError::AlreadyExists {
                entity_type,
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    async fn first_in_index(
        &self,
        index: SecondaryIndex,
        lookup: &IndexLookup,
    ) -> Result<Option<Record>> {
        let records = self.store.query_by_secondary_index(index, lookup).await?;
        tracing::debug!(index = index.name(), matches = records.len(), "Index lookup");
        Ok(records.into_iter().next())
    }

    async fn child_record(&self, child_id: Uuid) -> Result<Record> {
        let lookup = IndexLookup::Exact(keys::child_by_id_key(child_id));
        self.first_in_index(SecondaryIndex::ById, &lookup)
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Child",
                id: child_id.to_string(),
            })
    }

    /// Decodes assignment records, resolving each distinct quest once.
    async fn attach_quests(&self, records: &[Record]) -> Result<Vec<Assignment>> {
        let stored: Vec<StoredAssignment> = records
            .iter()
            .map(record_to_assignment)
            .collect::<std::result::Result<_, _>>()?;

        let mut quests: HashMap<Uuid, Quest> = HashMap::new();
        let mut assignments = Vec::with_capacity(stored.len());
        for assignment in stored {
            let quest = match quests.get(&assignment.quest_id) {
                Some(quest) => quest.clone(),
                None => {
                    let quest = self.get_quest_by_id(assignment.quest_id).await?;
                    quests.insert(quest.id, quest.clone());
                    quest
                }
            };
            assignments.push(assignment.with_quest(quest));
        }
        Ok(assignments)
    }
}
