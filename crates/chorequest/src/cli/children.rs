//! Child CLI commands.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Child management commands.
#[derive(Debug, Parser)]
pub struct ChildrenCommand {
    #[command(subcommand)]
    pub action: ChildrenAction,
}

/// Available child actions.
#[derive(Debug, Subcommand)]
pub enum ChildrenAction {
    /// Create a child with zero XP and gold.
    Create {
        /// Parent ID.
        #[arg(long)]
        parent: String,
        /// Child name.
        #[arg(long)]
        name: String,
    },
    /// List a parent's children.
    List {
        /// Parent ID.
        #[arg(long)]
        parent: String,
    },
    /// Get child by ID.
    Get {
        /// Child ID.
        id: Uuid,
    },
}
