//! Core of the chorequest persistence layer.
//!
//! - [`quest`]: domain entities, creation requests and their validation.
//! - [`storage`]: key codec, record model, the [`storage::EntityStore`]
//!   contract, an in-memory store and the transactional
//!   [`storage::ChoreRepository`].

pub mod quest;
pub mod storage;
