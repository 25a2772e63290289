//! DynamoDB storage backend implementation.
//!
//! Single-table layout: `PK`/`SK` primary key, `GSI1` (by quest) and
//! `GSI2` (by id) secondary indexes. Table provisioning is out of scope;
//! the table must already exist.

mod conversions;
mod error;
mod store;

pub use store::DynamoDbStore;
