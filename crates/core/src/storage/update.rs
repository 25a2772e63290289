//! Conditional update language understood by every store.
//!
//! Updates touch a handful of mutable fields: XP and gold on children,
//! status and completion time on assignments. Backends either render these
//! into native expressions (DynamoDB) or evaluate them directly (in-memory).

use chrono::{DateTime, Utc};

use crate::quest::AssignmentStatus;

use super::keys::PrimaryKey;
use super::record::Attributes;

/// A mutable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Xp,
    Gold,
    Status,
    CompletedAt,
}

/// A value written to or compared against a [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(i64),
    Status(AssignmentStatus),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Overwrite the field.
    Set(Field, Value),
    /// Add to a numeric field, treating a missing value as zero.
    Add(Field, i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The field is not set.
    Absent(Field),
    /// The field is missing or holds a different value.
    NotEqual(Field, Value),
    /// The numeric field is set and at least the given amount.
    AtLeast(Field, i64),
    /// Every inner condition holds.
    All(Vec<Condition>),
}

/// Update of one record, applied only if its condition holds.
///
/// The target record must exist; updates never create items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalUpdate {
    pub key: PrimaryKey,
    pub actions: Vec<UpdateAction>,
    pub condition: Option<Condition>,
}

impl ConditionalUpdate {
    pub fn new(key: PrimaryKey) -> Self {
        Self {
            key,
            actions: Vec::new(),
            condition: None,
        }
    }

    pub fn set(mut self, field: Field, value: Value) -> Self {
        self.actions.push(UpdateAction::Set(field, value));
        self
    }

    pub fn add(mut self, field: Field, delta: i64) -> Self {
        self.actions.push(UpdateAction::Add(field, delta));
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

// ============================================================================
// Evaluation
// ============================================================================

impl Attributes {
    /// Current value of a mutable field.
    pub fn field(&self, field: Field) -> Option<Value> {
        match field {
            Field::Xp => self.xp.map(Value::Number),
            Field::Gold => self.gold.map(Value::Number),
            Field::Status => self.status.map(Value::Status),
            Field::CompletedAt => self.completed_at.map(Value::Timestamp),
        }
    }

    /// Applies one action in place.
    ///
    /// A `Set` whose value does not fit the field is ignored; the
    /// [`ConditionalUpdate`] builders never produce one.
    pub fn apply(&mut self, action: &UpdateAction) {
        match action {
            UpdateAction::Set(field, value) => match (field, value) {
                (Field::Xp, Value::Number(n)) => self.xp = Some(*n),
                (Field::Gold, Value::Number(n)) => self.gold = Some(*n),
                (Field::Status, Value::Status(s)) => self.status = Some(*s),
                (Field::CompletedAt, Value::Timestamp(t)) => self.completed_at = Some(*t),
                _ => {}
            },
            UpdateAction::Add(field, delta) => match field {
                Field::Xp => self.xp = Some(self.xp.unwrap_or(0) + delta),
                Field::Gold => self.gold = Some(self.gold.unwrap_or(0) + delta),
                Field::Status | Field::CompletedAt => {}
            },
        }
    }
}

impl Condition {
    /// Evaluates this condition against a record's attributes.
    pub fn evaluate(&self, attributes: &Attributes) -> bool {
        match self {
            Condition::Absent(field) => attributes.field(*field).is_none(),
            Condition::NotEqual(field, value) => attributes.field(*field).as_ref() != Some(value),
            Condition::AtLeast(field, amount) => {
                matches!(attributes.field(*field), Some(Value::Number(n)) if n >= *amount)
            }
            Condition::All(conditions) => conditions.iter().all(|c| c.evaluate(attributes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs_with_gold(gold: i64) -> Attributes {
        Attributes {
            xp: Some(0),
            gold: Some(gold),
            ..Attributes::default()
        }
    }

    #[test]
    fn test_at_least_condition() {
        let attrs = attrs_with_gold(10);
        assert!(Condition::AtLeast(Field::Gold, 10).evaluate(&attrs));
        assert!(!Condition::AtLeast(Field::Gold, 15).evaluate(&attrs));
        assert!(!Condition::AtLeast(Field::Gold, 0).evaluate(&Attributes::default()));
    }

    #[test]
    fn test_completion_guard() {
        let guard = Condition::All(vec![
            Condition::Absent(Field::CompletedAt),
            Condition::NotEqual(Field::Status, Value::Status(AssignmentStatus::Completed)),
        ]);

        let mut attrs = Attributes {
            status: Some(AssignmentStatus::Assigned),
            ..Attributes::default()
        };
        assert!(guard.evaluate(&attrs));

        attrs.apply(&UpdateAction::Set(
            Field::Status,
            Value::Status(AssignmentStatus::Completed),
        ));
        attrs.apply(&UpdateAction::Set(
            Field::CompletedAt,
            Value::Timestamp(Utc::now()),
        ));
        assert!(!guard.evaluate(&attrs));
    }

    #[test]
    fn test_add_treats_missing_as_zero() {
        let mut attrs = Attributes::default();
        attrs.apply(&UpdateAction::Add(Field::Xp, 50));
        attrs.apply(&UpdateAction::Add(Field::Gold, 10));
        attrs.apply(&UpdateAction::Add(Field::Gold, -4));
        assert_eq!(attrs.xp, Some(50));
        assert_eq!(attrs.gold, Some(6));
    }

    #[test]
    fn test_builder_collects_actions() {
        let update = ConditionalUpdate::new(PrimaryKey::new("PARENT#p", "CHILD#c"))
            .add(Field::Gold, -5)
            .when(Condition::AtLeast(Field::Gold, 5));
        assert_eq!(update.actions, vec![UpdateAction::Add(Field::Gold, -5)]);
        assert_eq!(update.condition, Some(Condition::AtLeast(Field::Gold, 5)));
    }
}
