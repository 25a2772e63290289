//! DynamoDB entity store.
//!
//! Implements `EntityStore` from `chorequest_core::storage` over one table.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue, TransactWriteItem, Update};
use aws_sdk_dynamodb::Client;

use chorequest_core::storage::{
    ConditionalUpdate, EntityStore, IndexLookup, PrimaryKey, Record, SecondaryIndex, StoreError,
    StoreResult,
};

use super::conversions::{
    index_attribute_names, item_to_record, key_to_item, record_to_item, render_update, Item,
};
use super::error::{
    map_get_item_error, map_put_item_error, map_query_error, map_scan_error,
    map_transact_write_error, map_update_item_error,
};
use crate::config::Config;

/// DynamoDB-based entity store.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a new store from application configuration.
    ///
    /// Uses the AWS SDK default credential chain, the configured region and,
    /// when set, a custom endpoint such as a local DynamoDB.
    pub async fn from_config(config: &Config) -> Self {
        let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
        }

        let sdk_config = sdk_config_loader.load().await;
        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Runs a query page by page until `LastEvaluatedKey` is exhausted.
    async fn query_all(
        &self,
        index: Option<SecondaryIndex>,
        key_condition: String,
        values: Vec<(&str, String)>,
    ) -> StoreResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .set_index_name(index.map(|i| i.name().to_string()))
                .key_condition_expression(key_condition.clone())
                .set_exclusive_start_key(start_key.take());
            for (placeholder, value) in &values {
                request = request
                    .expression_attribute_values(*placeholder, AttributeValue::S(value.clone()));
            }

            let result = request.send().await.map_err(map_query_error)?;

            for item in result.items.unwrap_or_default() {
                records.push(item_to_record(&item)?);
            }
            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(records)
    }

    /// Scans an index with a filter, page by page.
    async fn scan_all(
        &self,
        index: SecondaryIndex,
        filter: String,
        values: Vec<(&str, String)>,
    ) -> StoreResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .index_name(index.name())
                .filter_expression(filter.clone())
                .set_exclusive_start_key(start_key.take());
            for (placeholder, value) in &values {
                request = request
                    .expression_attribute_values(*placeholder, AttributeValue::S(value.clone()));
            }

            let result = request.send().await.map_err(map_scan_error)?;

            for item in result.items.unwrap_or_default() {
                records.push(item_to_record(&item)?);
            }
            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl EntityStore for DynamoDbStore {
    async fn put_new(&self, record: Record) -> StoreResult<()> {
        let item = record_to_item(&record);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &record.key))?;

        tracing::debug!(
            pk = %record.key.pk,
            sk = %record.key.sk,
            kind = %record.kind,
            "Put item"
        );
        Ok(())
    }

    async fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Record>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_item(key)))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn query_by_prefix(
        &self,
        partition_key: &str,
        sort_prefix: &str,
    ) -> StoreResult<Vec<Record>> {
        let records = self
            .query_all(
                None,
                "PK = :pk AND begins_with(SK, :sk)".to_string(),
                vec![
                    (":pk", partition_key.to_string()),
                    (":sk", sort_prefix.to_string()),
                ],
            )
            .await?;

        tracing::debug!(
            pk = partition_key,
            prefix = sort_prefix,
            count = records.len(),
            "Query"
        );
        Ok(records)
    }

    async fn query_by_secondary_index(
        &self,
        index: SecondaryIndex,
        lookup: &IndexLookup,
    ) -> StoreResult<Vec<Record>> {
        let (pk_name, sk_name) = index_attribute_names(index);

        let records = match lookup {
            IndexLookup::Exact(key) => {
                self.query_all(
                    Some(index),
                    format!("{pk_name} = :pk AND {sk_name} = :sk"),
                    vec![(":pk", key.pk.clone()), (":sk", key.sk.clone())],
                )
                .await?
            }
            IndexLookup::Partition(pk) => {
                self.query_all(
                    Some(index),
                    format!("{pk_name} = :pk"),
                    vec![(":pk", pk.clone())],
                )
                .await?
            }
            // An index cannot be queried without its partition key.
            IndexLookup::SortKey(sk) => {
                self.scan_all(index, format!("{sk_name} = :sk"), vec![(":sk", sk.clone())])
                    .await?
            }
        };

        tracing::debug!(index = index.name(), count = records.len(), "Index lookup");
        Ok(records)
    }

    async fn conditional_update(&self, update: ConditionalUpdate) -> StoreResult<Record> {
        let rendered = render_update(&update)?;
        let values = rendered.values_or_none();

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_item(&update.key)))
            .update_expression(rendered.update_expression)
            .condition_expression(rendered.condition_expression)
            .set_expression_attribute_names(Some(rendered.names))
            .set_expression_attribute_values(values)
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(map_update_item_error)?;

        let item = result.attributes.ok_or_else(|| {
            StoreError::InvalidData(format!(
                "UpdateItem returned no attributes for {} / {}",
                update.key.pk, update.key.sk
            ))
        })?;
        item_to_record(&item)
    }

    async fn atomic_multi_update(&self, updates: Vec<ConditionalUpdate>) -> StoreResult<()> {
        let mut items = Vec::with_capacity(updates.len());
        for update in &updates {
            let rendered = render_update(update)?;
            let values = rendered.values_or_none();
            let entry = Update::builder()
                .table_name(&self.table_name)
                .set_key(Some(key_to_item(&update.key)))
                .update_expression(rendered.update_expression)
                .condition_expression(rendered.condition_expression)
                .set_expression_attribute_names(Some(rendered.names))
                .set_expression_attribute_values(values)
                .build()
                .map_err(|e| StoreError::InvalidData(format!("Invalid transaction item: {e}")))?;
            items.push(TransactWriteItem::builder().update(entry).build());
        }

        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
            .map_err(map_transact_write_error)?;

        tracing::debug!(count = updates.len(), "Transaction committed");
        Ok(())
    }
}
