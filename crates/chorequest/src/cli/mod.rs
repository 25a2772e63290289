//! CLI command definitions.

pub mod assignments;
pub mod children;
pub mod quests;
pub mod rewards;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::config::StorageBackend;

/// Operator CLI for the chorequest store.
#[derive(Debug, Parser)]
#[command(name = "chorequest")]
#[command(version, about = "Operator CLI for the chorequest store", long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Storage backend, overrides CHOREQUEST_STORAGE.
    #[arg(long, value_parser = parse_backend)]
    pub storage: Option<StorageBackend>,

    /// DynamoDB table name.
    #[arg(long, env = "DYNAMODB_TABLE_NAME")]
    pub table_name: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Child management.
    Children(children::ChildrenCommand),
    /// Quest management.
    Quests(quests::QuestsCommand),
    /// Reward management.
    Rewards(rewards::RewardsCommand),
    /// Quest assignments and completion.
    Assignments(assignments::AssignmentsCommand),
    /// Spend a child's gold on an item.
    Purchase {
        /// Child ID.
        #[arg(long)]
        child: Uuid,
        /// Item name.
        #[arg(long)]
        item: String,
        /// Price in gold.
        #[arg(long)]
        price: u32,
    },
    /// Write the demo family: one child, two quests, one reward, one assignment.
    Seed {
        /// Parent to seed under.
        #[arg(long, env = "SEED_PARENT_ID")]
        parent: Option<String>,
    },
}

fn parse_backend(value: &str) -> Result<StorageBackend, String> {
    value.parse().map_err(|e: crate::config::UnknownBackend| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_purchase() {
        let child = Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "chorequest",
            "--format",
            "json",
            "purchase",
            "--child",
            &child.to_string(),
            "--item",
            "Ice Cream",
            "--price",
            "15",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Purchase { child: c, item, price } => {
                assert_eq!(c, child);
                assert_eq!(item, "Ice Cream");
                assert_eq!(price, 15);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_storage_override() {
        let cli = Cli::try_parse_from(["chorequest", "--storage", "memory", "seed"]).unwrap();
        assert_eq!(cli.storage, Some(StorageBackend::Memory));
    }
}
