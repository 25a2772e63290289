use async_trait::async_trait;

use super::error::StoreResult;
use super::keys::{IndexLookup, PrimaryKey, SecondaryIndex};
use super::record::Record;
use super::update::ConditionalUpdate;

/// Generic operations over the single physical table.
///
/// Every invariant that spans records is enforced through the conditional
/// primitives here, never through locks held by the caller.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Inserts a record iff nothing exists at its primary key.
    async fn put_new(&self, record: Record) -> StoreResult<()>;

    /// Reads a record by primary key.
    async fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Record>>;

    /// Gets all records of a partition whose sort key starts with `sort_prefix`.
    async fn query_by_prefix(&self, partition_key: &str, sort_prefix: &str)
        -> StoreResult<Vec<Record>>;

    /// Gets all records whose key in `index` matches `lookup`.
    async fn query_by_secondary_index(
        &self,
        index: SecondaryIndex,
        lookup: &IndexLookup,
    ) -> StoreResult<Vec<Record>>;

    /// Applies a single-item update and returns the record as updated.
    async fn conditional_update(&self, update: ConditionalUpdate) -> StoreResult<Record>;

    /// Applies every update or none of them.
    async fn atomic_multi_update(&self, updates: Vec<ConditionalUpdate>) -> StoreResult<()>;
}
