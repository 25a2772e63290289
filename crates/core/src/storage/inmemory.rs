//! In-memory entity store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::{StoreError, StoreResult};
use super::keys::{IndexLookup, PrimaryKey, SecondaryIndex};
use super::record::Record;
use super::traits::EntityStore;
use super::update::ConditionalUpdate;

/// In-memory storage backend.
///
/// Every write runs under one write lock, which gives the same
/// all-or-nothing semantics as the conditional primitives of a real store.
/// Data is not persisted and will be lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<BTreeMap<PrimaryKey, Record>>>,
    injected_failure: Arc<RwLock<Option<StoreError>>>,
    injected_transaction_failure: Arc<RwLock<Option<StoreError>>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next store call fail with `error` instead of running.
    pub async fn fail_next_with(&self, error: StoreError) {
        *self.injected_failure.write().await = Some(error);
    }

    /// Makes the next `atomic_multi_update` fail with `error`. Other calls
    /// run normally.
    pub async fn fail_next_transaction_with(&self, error: StoreError) {
        *self.injected_transaction_failure.write().await = Some(error);
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn take_injected_failure(&self) -> StoreResult<()> {
        match self.injected_failure.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Applies an update to a copy of the stored record.
fn stage_update(
    current: Option<&Record>,
    update: &ConditionalUpdate,
    index: usize,
) -> StoreResult<Record> {
    let current = current.ok_or(StoreError::ConditionFailed { index })?;
    if let Some(condition) = &update.condition {
        if !condition.evaluate(&current.attributes) {
            return Err(StoreError::ConditionFailed { index });
        }
    }
    let mut staged = current.clone();
    for action in &update.actions {
        staged.attributes.apply(action);
    }
    Ok(staged)
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn put_new(&self, record: Record) -> StoreResult<()> {
        self.take_injected_failure().await?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.key) {
            return Err(StoreError::AlreadyExists {
                pk: record.key.pk.clone(),
                sk: record.key.sk.clone(),
            });
        }
        records.insert(record.key.clone(), record);
        Ok(())
    }

    async fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Record>> {
        self.take_injected_failure().await?;
        let records = self.records.read().await;
        Ok(records.get(key).cloned())
    }

    async fn query_by_prefix(
        &self,
        partition_key: &str,
        sort_prefix: &str,
    ) -> StoreResult<Vec<Record>> {
        self.take_injected_failure().await?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.key.pk == partition_key && r.key.sk.starts_with(sort_prefix))
            .cloned()
            .collect())
    }

    async fn query_by_secondary_index(
        &self,
        index: SecondaryIndex,
        lookup: &IndexLookup,
    ) -> StoreResult<Vec<Record>> {
        self.take_injected_failure().await?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.index_key(index).is_some_and(|key| lookup.matches(key)))
            .cloned()
            .collect())
    }

    async fn conditional_update(&self, update: ConditionalUpdate) -> StoreResult<Record> {
        self.take_injected_failure().await?;
        let mut records = self.records.write().await;
        let staged = stage_update(records.get(&update.key), &update, 0)?;
        records.insert(staged.key.clone(), staged.clone());
        Ok(staged)
    }

    async fn atomic_multi_update(&self, updates: Vec<ConditionalUpdate>) -> StoreResult<()> {
        self.take_injected_failure().await?;
        if let Some(error) = self.injected_transaction_failure.write().await.take() {
            return Err(error);
        }
        let mut records = self.records.write().await;

        // Stage everything first so a failing condition leaves no trace.
        // Updates to the same key see the earlier staged value.
        let mut staged: BTreeMap<PrimaryKey, Record> = BTreeMap::new();
        for (index, update) in updates.iter().enumerate() {
            let current = staged
                .get(&update.key)
                .or_else(|| records.get(&update.key));
            let next = stage_update(current, update, index)?;
            staged.insert(next.key.clone(), next);
        }

        records.extend(staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::{Child, Quest};
    use crate::storage::keys;
    use crate::storage::record::{child_to_record, quest_to_record};
    use crate::storage::update::{Condition, Field};

    #[tokio::test]
    async fn test_put_new_rejects_duplicates() {
        let store = InMemoryStore::new();
        let record = child_to_record(&Child::new("parent-1", "Alex")).unwrap();

        store.put_new(record.clone()).await.unwrap();
        let result = store.put_new(record).await;

        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_query_by_prefix_filters_kind_and_partition() {
        let store = InMemoryStore::new();
        store
            .put_new(child_to_record(&Child::new("parent-1", "Alex")).unwrap())
            .await
            .unwrap();
        store
            .put_new(child_to_record(&Child::new("parent-2", "Sam")).unwrap())
            .await
            .unwrap();
        store
            .put_new(quest_to_record(&Quest::new("parent-1", "Clean Room", 50, 10)))
            .await
            .unwrap();

        let children = store
            .query_by_prefix(&keys::parent_pk("parent-1"), keys::CHILD_PREFIX)
            .await
            .unwrap();

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].attributes.name.as_deref(), Some("Alex"));
    }

    #[tokio::test]
    async fn test_query_by_secondary_index() {
        let store = InMemoryStore::new();
        let quest = Quest::new("parent-1", "Clean Room", 50, 10);
        store.put_new(quest_to_record(&quest)).await.unwrap();

        let found = store
            .query_by_secondary_index(
                SecondaryIndex::ById,
                &IndexLookup::Exact(keys::quest_by_id_key(quest.id)),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let missing = store
            .query_by_secondary_index(SecondaryIndex::ByQuest, &keys::assignments_of_quest(quest.id))
            .await
            .unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_conditional_update_on_missing_record_fails() {
        let store = InMemoryStore::new();
        let update = ConditionalUpdate::new(PrimaryKey::new("PARENT#p", "CHILD#c")).add(Field::Gold, 1);

        let result = store.conditional_update(update).await;
        assert_eq!(result, Err(StoreError::ConditionFailed { index: 0 }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_atomic_multi_update_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let rich = Child::new("parent-1", "Alex");
        let poor = Child::new("parent-1", "Sam");
        let mut rich_record = child_to_record(&rich).unwrap();
        rich_record.attributes.gold = Some(100);
        store.put_new(rich_record.clone()).await.unwrap();
        store.put_new(child_to_record(&poor).unwrap()).await.unwrap();

        let result = store
            .atomic_multi_update(vec![
                ConditionalUpdate::new(rich_record.key.clone()).add(Field::Gold, -10),
                ConditionalUpdate::new(keys::child_key("parent-1", poor.id))
                    .add(Field::Gold, -10)
                    .when(Condition::AtLeast(Field::Gold, 10)),
            ])
            .await;

        assert_eq!(result, Err(StoreError::ConditionFailed { index: 1 }));
        let unchanged = store.get(&rich_record.key).await.unwrap().unwrap();
        assert_eq!(unchanged.attributes.gold, Some(100));
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let store = InMemoryStore::new();
        store
            .fail_next_with(StoreError::Unavailable("throttled".to_string()))
            .await;

        let key = PrimaryKey::new("PARENT#p", "CHILD#c");
        assert!(matches!(
            store.get(&key).await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.get(&key).await, Ok(None));
    }

    #[tokio::test]
    async fn test_injected_transaction_failure_skips_reads() {
        let store = InMemoryStore::new();
        let record = child_to_record(&Child::new("parent-1", "Alex")).unwrap();
        store.put_new(record.clone()).await.unwrap();
        store
            .fail_next_transaction_with(StoreError::ConditionFailed { index: 1 })
            .await;

        assert!(store.get(&record.key).await.unwrap().is_some());

        let credit = ConditionalUpdate::new(record.key.clone()).add(Field::Gold, 5);
        assert_eq!(
            store.atomic_multi_update(vec![credit.clone()]).await,
            Err(StoreError::ConditionFailed { index: 1 })
        );
        assert_eq!(store.atomic_multi_update(vec![credit]).await, Ok(()));
        let credited = store.get(&record.key).await.unwrap().unwrap();
        assert_eq!(credited.attributes.gold, Some(5));
    }
}
