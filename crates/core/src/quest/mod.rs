mod error;
mod operations;
mod requests;
mod types;

pub use error::ValidationError;
pub use operations::{validate_new_child, validate_new_quest, validate_new_reward};
pub use requests::{NewChild, NewQuest, NewReward};
pub use types::{Assignment, AssignmentStatus, Child, Quest, Reward, UnknownStatus};
