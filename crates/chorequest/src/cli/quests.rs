//! Quest CLI commands.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Quest management commands.
#[derive(Debug, Parser)]
pub struct QuestsCommand {
    #[command(subcommand)]
    pub action: QuestsAction,
}

/// Available quest actions.
#[derive(Debug, Subcommand)]
pub enum QuestsAction {
    /// Create a quest.
    Create {
        /// Parent ID.
        #[arg(long)]
        parent: String,
        /// Quest title.
        #[arg(long)]
        title: String,
        /// Quest description.
        #[arg(long)]
        description: Option<String>,
        /// XP credited on completion.
        #[arg(long)]
        xp: u32,
        /// Gold credited on completion.
        #[arg(long, default_value = "0")]
        gold: u32,
    },
    /// List a parent's quests.
    List {
        /// Parent ID.
        #[arg(long)]
        parent: String,
    },
    /// Get quest by ID.
    Get {
        /// Quest ID.
        id: Uuid,
    },
}
