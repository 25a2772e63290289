//! Storage layer: single-table key codec, record model, the store contract
//! and the transactional repository built on it.

mod error;
mod http_mapping;
mod inmemory;
pub mod keys;
mod record;
mod repository;
mod traits;
mod update;

pub use error::{ErrorKind, RepositoryError, Result, StoreError, StoreResult};
pub use http_mapping::repository_error_to_status_code;
pub use inmemory::InMemoryStore;
pub use keys::{IndexKey, IndexLookup, PrimaryKey, SecondaryIndex};
pub use record::{
    assignment_to_record, child_to_record, quest_to_record, record_to_assignment,
    record_to_child, record_to_quest, record_to_reward, reward_to_record, Attributes,
    EntityKind, Record, StoredAssignment,
};
pub use repository::ChoreRepository;
pub use traits::EntityStore;
pub use update::{Condition, ConditionalUpdate, Field, UpdateAction, Value};
