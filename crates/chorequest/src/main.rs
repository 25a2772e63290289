mod cli;
mod commands;
mod config;
mod output;
mod seed;
mod storage;

use anyhow::{bail, Context, Result};
use chorequest_core::storage::{
    repository_error_to_status_code, ChoreRepository, EntityStore, InMemoryStore,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(storage) = cli.storage {
        config.storage = storage;
    }
    if let Some(table_name) = &cli.table_name {
        config.table_name = table_name.clone();
    }

    tracing::debug!(target = %config.target_display(), "Using store");

    match config.storage {
        StorageBackend::Memory => {
            let repo = ChoreRepository::new(InMemoryStore::new());
            run(&repo, cli, &config).await
        }
        #[cfg(feature = "dynamodb")]
        StorageBackend::DynamoDb => {
            let store = storage::DynamoDbStore::from_config(&config).await;
            tracing::debug!(table = store.table_name(), "DynamoDB client ready");
            let repo = ChoreRepository::new(store);
            run(&repo, cli, &config).await
        }
        #[cfg(not(feature = "dynamodb"))]
        StorageBackend::DynamoDb => {
            bail!("DynamoDB support is not compiled in, rebuild with the `dynamodb` feature")
        }
    }
}

/// Initialize the tracing subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chorequest=info,chorequest_core=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run<S: EntityStore>(repo: &ChoreRepository<S>, cli: Cli, config: &Config) -> Result<()> {
    match commands::execute(repo, cli.command, cli.format, &config.seed_parent_id).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) => {
            let status = repository_error_to_status_code(&err);
            tracing::error!(
                kind = ?err.kind(),
                status,
                transient = err.is_transient(),
                "{}",
                err
            );
            bail!("{} (status {})", err, status)
        }
    }
}
