//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! store records, and for rendering conditional updates into expressions.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chorequest_core::quest::AssignmentStatus;
use chorequest_core::storage::{
    Attributes, Condition, ConditionalUpdate, EntityKind, Field, IndexKey, PrimaryKey, Record,
    SecondaryIndex, StoreError, UpdateAction, Value,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A DynamoDB item.
pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Attribute names
// ============================================================================

pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_ENTITY_TYPE: &str = "Type";

/// Partition and sort key attribute names of a secondary index.
pub fn index_attribute_names(index: SecondaryIndex) -> (&'static str, &'static str) {
    match index {
        SecondaryIndex::ByQuest => ("GSI1PK", "GSI1SK"),
        SecondaryIndex::ById => ("GSI2PK", "GSI2SK"),
    }
}

fn field_attribute_name(field: Field) -> &'static str {
    match field {
        Field::Xp => "XP",
        Field::Gold => "Gold",
        Field::Status => "Status",
        Field::CompletedAt => "CompletedAt",
    }
}

// ============================================================================
// Record conversions
// ============================================================================

/// Primary key of a record as a DynamoDB key map.
pub fn key_to_item(key: &PrimaryKey) -> Item {
    let mut item = HashMap::new();
    item.insert(ATTR_PK.to_string(), AttributeValue::S(key.pk.clone()));
    item.insert(ATTR_SK.to_string(), AttributeValue::S(key.sk.clone()));
    item
}

/// Convert a Record to a DynamoDB item.
pub fn record_to_item(record: &Record) -> Item {
    // Keys
    let mut item = key_to_item(&record.key);
    for index in [SecondaryIndex::ByQuest, SecondaryIndex::ById] {
        if let Some(key) = record.index_key(index) {
            let (pk_name, sk_name) = index_attribute_names(index);
            item.insert(pk_name.to_string(), AttributeValue::S(key.pk.clone()));
            item.insert(sk_name.to_string(), AttributeValue::S(key.sk.clone()));
        }
    }

    // Entity type
    item.insert(
        ATTR_ENTITY_TYPE.to_string(),
        AttributeValue::S(record.kind.as_str().to_string()),
    );

    // Data
    let attrs = &record.attributes;
    put_string(&mut item, "ParentID", attrs.parent_id.clone());
    put_string(&mut item, "ChildID", attrs.child_id.map(|id| id.to_string()));
    put_string(&mut item, "QuestID", attrs.quest_id.map(|id| id.to_string()));
    put_string(&mut item, "Name", attrs.name.clone());
    put_string(&mut item, "Title", attrs.title.clone());
    put_string(&mut item, "Description", attrs.description.clone());
    put_number(&mut item, "XP", attrs.xp);
    put_number(&mut item, "Gold", attrs.gold);
    put_number(&mut item, "XPThreshold", attrs.xp_threshold);
    put_string(&mut item, "Status", attrs.status.map(|s| s.as_str().to_string()));
    put_string(&mut item, "CreatedAt", attrs.created_at.map(|t| t.to_rfc3339()));
    put_string(
        &mut item,
        "CompletedAt",
        attrs.completed_at.map(|t| t.to_rfc3339()),
    );

    item
}

/// Convert a DynamoDB item to a Record.
pub fn item_to_record(item: &Item) -> Result<Record, StoreError> {
    let key = PrimaryKey::new(get_string(item, ATTR_PK)?, get_string(item, ATTR_SK)?);
    let kind: EntityKind = get_string(item, ATTR_ENTITY_TYPE)?.parse()?;

    let status = get_optional_string(item, "Status")
        .map(|s| {
            s.parse::<AssignmentStatus>()
                .map_err(|e| StoreError::InvalidData(e.to_string()))
        })
        .transpose()?;

    Ok(Record {
        key,
        kind,
        by_quest: get_index_key(item, SecondaryIndex::ByQuest),
        by_id: get_index_key(item, SecondaryIndex::ById),
        attributes: Attributes {
            parent_id: get_optional_string(item, "ParentID"),
            child_id: get_optional_uuid(item, "ChildID")?,
            quest_id: get_optional_uuid(item, "QuestID")?,
            name: get_optional_string(item, "Name"),
            title: get_optional_string(item, "Title"),
            description: get_optional_string(item, "Description"),
            xp: get_optional_number(item, "XP")?,
            gold: get_optional_number(item, "Gold")?,
            xp_threshold: get_optional_number(item, "XPThreshold")?,
            status,
            created_at: get_optional_datetime(item, "CreatedAt")?,
            completed_at: get_optional_datetime(item, "CompletedAt")?,
        },
    })
}

// ============================================================================
// Update rendering
// ============================================================================

/// A conditional update rendered into DynamoDB expression syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedUpdate {
    pub update_expression: String,
    pub condition_expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl RenderedUpdate {
    /// Placeholder values, `None` when empty since DynamoDB rejects an
    /// empty map.
    pub fn values_or_none(&self) -> Option<HashMap<String, AttributeValue>> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.clone())
        }
    }
}

/// Render an update into `UpdateExpression` and `ConditionExpression`.
///
/// The condition always requires the item to exist, since `UpdateItem`
/// would otherwise create it.
pub fn render_update(update: &ConditionalUpdate) -> Result<RenderedUpdate, StoreError> {
    if update.actions.is_empty() {
        return Err(StoreError::InvalidData(format!(
            "Update of {} / {} has no actions",
            update.key.pk, update.key.sk
        )));
    }

    let mut renderer = Renderer::default();

    let mut sets = Vec::new();
    let mut adds = Vec::new();
    for action in &update.actions {
        match action {
            UpdateAction::Set(field, value) => {
                let name = renderer.name(*field);
                let value = renderer.value(value);
                sets.push(format!("{name} = {value}"));
            }
            UpdateAction::Add(field, delta) => {
                let name = renderer.name(*field);
                let value = renderer.value(&Value::Number(*delta));
                adds.push(format!("{name} {value}"));
            }
        }
    }

    let mut clauses = Vec::new();
    if !sets.is_empty() {
        clauses.push(format!("SET {}", sets.join(", ")));
    }
    if !adds.is_empty() {
        clauses.push(format!("ADD {}", adds.join(", ")));
    }

    let mut condition_expression = format!("attribute_exists({ATTR_PK})");
    if let Some(rendered) = update
        .condition
        .as_ref()
        .and_then(|c| renderer.condition(c))
    {
        condition_expression = format!("{condition_expression} AND {rendered}");
    }

    Ok(RenderedUpdate {
        update_expression: clauses.join(" "),
        condition_expression,
        names: renderer.names,
        values: renderer.values,
    })
}

#[derive(Default)]
struct Renderer {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl Renderer {
    fn name(&mut self, field: Field) -> String {
        let attribute = field_attribute_name(field);
        if let Some((placeholder, _)) = self.names.iter().find(|(_, name)| *name == attribute) {
            return placeholder.clone();
        }
        let placeholder = format!("#f{}", self.names.len());
        self.names.insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    fn value(&mut self, value: &Value) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value_to_attribute(value));
        placeholder
    }

    fn condition(&mut self, condition: &Condition) -> Option<String> {
        match condition {
            Condition::Absent(field) => {
                let name = self.name(*field);
                Some(format!("attribute_not_exists({name})"))
            }
            Condition::NotEqual(field, value) => {
                let name = self.name(*field);
                let value = self.value(value);
                Some(format!("(attribute_not_exists({name}) OR {name} <> {value})"))
            }
            Condition::AtLeast(field, amount) => {
                let name = self.name(*field);
                let value = self.value(&Value::Number(*amount));
                Some(format!("{name} >= {value}"))
            }
            Condition::All(conditions) => {
                let parts: Vec<String> = conditions
                    .iter()
                    .filter_map(|c| self.condition(c))
                    .collect();
                match parts.len() {
                    0 => None,
                    1 => parts.into_iter().next(),
                    _ => Some(format!("({})", parts.join(" AND "))),
                }
            }
        }
    }
}

fn value_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::Status(status) => AttributeValue::S(status.as_str().to_string()),
        Value::Timestamp(ts) => AttributeValue::S(ts.to_rfc3339()),
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn put_string(item: &mut Item, key: &str, value: Option<String>) {
    if let Some(value) = value {
        item.insert(key.to_string(), AttributeValue::S(value));
    }
}

fn put_number(item: &mut Item, key: &str, value: Option<i64>) {
    if let Some(value) = value {
        item.insert(key.to_string(), AttributeValue::N(value.to_string()));
    }
}

fn get_string(item: &Item, key: &str) -> Result<String, StoreError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))
}

fn get_optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn get_optional_uuid(item: &Item, key: &str) -> Result<Option<Uuid>, StoreError> {
    get_optional_string(item, key)
        .map(|s| {
            Uuid::parse_str(&s)
                .map_err(|e| StoreError::InvalidData(format!("Invalid UUID in {}: {}", key, e)))
        })
        .transpose()
}

fn get_optional_number(item: &Item, key: &str) -> Result<Option<i64>, StoreError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => {
            let raw = value
                .as_n()
                .map_err(|_| StoreError::InvalidData(format!("Expected number in {}", key)))?;
            raw.parse()
                .map(Some)
                .map_err(|e| StoreError::InvalidData(format!("Invalid number in {}: {}", key, e)))
        }
    }
}

fn get_optional_datetime(item: &Item, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    get_optional_string(item, key)
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| StoreError::InvalidData(format!("Invalid datetime in {}: {}", key, e)))
        })
        .transpose()
}

fn get_index_key(item: &Item, index: SecondaryIndex) -> Option<IndexKey> {
    let (pk_name, sk_name) = index_attribute_names(index);
    match (
        get_optional_string(item, pk_name),
        get_optional_string(item, sk_name),
    ) {
        (Some(pk), Some(sk)) => Some(IndexKey::new(pk, sk)),
        _ => None,
    }
}
