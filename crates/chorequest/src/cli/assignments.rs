//! Assignment CLI commands.

use clap::{ArgGroup, Parser, Subcommand};
use uuid::Uuid;

/// Assignment commands.
#[derive(Debug, Parser)]
pub struct AssignmentsCommand {
    #[command(subcommand)]
    pub action: AssignmentsAction,
}

/// Available assignment actions.
#[derive(Debug, Subcommand)]
pub enum AssignmentsAction {
    /// Assign a quest to a child.
    Assign {
        /// Quest ID.
        #[arg(long)]
        quest: Uuid,
        /// Child ID.
        #[arg(long)]
        child: Uuid,
    },
    /// List assignments of a child or of a quest.
    #[command(group(ArgGroup::new("owner").required(true).args(["child", "quest"])))]
    List {
        /// Child ID.
        #[arg(long)]
        child: Option<Uuid>,
        /// Quest ID.
        #[arg(long)]
        quest: Option<Uuid>,
    },
    /// Get one assignment of a child.
    Get {
        /// Child ID.
        #[arg(long)]
        child: Uuid,
        /// Assignment ID.
        id: Uuid,
    },
    /// Complete an assignment and credit its rewards.
    Complete {
        /// Assignment ID.
        id: Uuid,
    },
}
