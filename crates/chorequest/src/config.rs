use std::{env, fmt, str::FromStr};

use thiserror::Error;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local store, lost on exit.
    Memory,
    /// DynamoDB table (requires the `dynamodb` feature).
    DynamoDb,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::DynamoDb => "dynamodb",
        }
    }
}

impl Default for StorageBackend {
    fn default() -> Self {
        if cfg!(feature = "dynamodb") {
            StorageBackend::DynamoDb
        } else {
            StorageBackend::Memory
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown storage backend: {0} (expected \"memory\" or \"dynamodb\")")]
pub struct UnknownBackend(String);

impl FromStr for StorageBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" => Ok(StorageBackend::Memory),
            "dynamodb" | "dynamo" => Ok(StorageBackend::DynamoDb),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend (default: dynamodb when compiled in, memory otherwise)
    pub storage: StorageBackend,
    /// DynamoDB table name (default: "chorequest")
    pub table_name: String,
    /// Custom endpoint URL, e.g. a local DynamoDB (default: none)
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Parent that `seed` writes under (default: "parent-1")
    pub seed_parent_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CHOREQUEST_STORAGE` - `memory` or `dynamodb`
    /// - `DYNAMODB_TABLE_NAME` - Table name (default: "chorequest")
    /// - `AWS_ENDPOINT_URL` - Custom endpoint (default: none)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `SEED_PARENT_ID` - Seed parent (default: "parent-1")
    ///
    /// An unparsable `CHOREQUEST_STORAGE` is an error rather than a silent
    /// fallback, since it decides where writes go.
    pub fn from_env() -> Result<Self, UnknownBackend> {
        let storage = match env::var("CHOREQUEST_STORAGE") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::default(),
        };

        Ok(Self {
            storage,
            table_name: env::var("DYNAMODB_TABLE_NAME")
                .unwrap_or_else(|_| "chorequest".to_string()),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok().filter(|v| !v.is_empty()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            seed_parent_id: env::var("SEED_PARENT_ID")
                .unwrap_or_else(|_| "parent-1".to_string()),
        })
    }

    /// Returns a display string for the target store.
    pub fn target_display(&self) -> String {
        match (self.storage, &self.endpoint_url) {
            (StorageBackend::Memory, _) => "in-memory store".to_string(),
            (StorageBackend::DynamoDb, Some(url)) => {
                format!("local DynamoDB table {} ({})", self.table_name, url)
            }
            (StorageBackend::DynamoDb, None) => {
                format!("DynamoDB table {} (region: {})", self.table_name, self.region)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config(storage: StorageBackend) -> Config {
        Config {
            storage,
            table_name: "chorequest".to_string(),
            endpoint_url: None,
            region: "us-east-1".to_string(),
            seed_parent_id: "parent-1".to_string(),
        }
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("memory".parse(), Ok(StorageBackend::Memory));
        assert_eq!("DynamoDB".parse(), Ok(StorageBackend::DynamoDb));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_target_display() {
        let mut config = sample_config(StorageBackend::DynamoDb);
        assert_eq!(
            config.target_display(),
            "DynamoDB table chorequest (region: us-east-1)"
        );

        config.endpoint_url = Some("http://localhost:8000".to_string());
        assert_eq!(
            config.target_display(),
            "local DynamoDB table chorequest (http://localhost:8000)"
        );

        assert_eq!(
            sample_config(StorageBackend::Memory).target_display(),
            "in-memory store"
        );
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("CHOREQUEST_STORAGE");
        env::remove_var("DYNAMODB_TABLE_NAME");
        env::remove_var("AWS_ENDPOINT_URL");
        env::remove_var("AWS_REGION");
        env::remove_var("SEED_PARENT_ID");

        let config = Config::from_env().unwrap();

        assert_eq!(config.storage, StorageBackend::default());
        assert_eq!(config.table_name, "chorequest");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.seed_parent_id, "parent-1");
    }
}
