//! Reward CLI commands.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Reward management commands.
#[derive(Debug, Parser)]
pub struct RewardsCommand {
    #[command(subcommand)]
    pub action: RewardsAction,
}

/// Available reward actions.
#[derive(Debug, Subcommand)]
pub enum RewardsAction {
    /// Create a reward.
    Create {
        /// Parent ID.
        #[arg(long)]
        parent: String,
        /// Reward name.
        #[arg(long)]
        name: String,
        /// XP needed to unlock.
        #[arg(long)]
        xp_threshold: u32,
    },
    /// List a parent's rewards.
    List {
        /// Parent ID.
        #[arg(long)]
        parent: String,
    },
    /// List the rewards a child has unlocked.
    Unlocked {
        /// Child ID.
        child: Uuid,
    },
}
