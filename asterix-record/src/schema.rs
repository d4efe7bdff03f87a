//! Generic minimum-field-schema checking: a record "passes" a schema iff
//! every field in its mandatory list is present and every disjunctive list
//! has at least one present member.
//!
//! This is the language-neutral mapping-type approach to ASTERIX's
//! mandatory/disjunctive UAP (User Application Profile) tables: rather than
//! a struct per data item, a schema is just sets of item names checked
//! against `Record::has_item`.

use crate::record::Record;

/// A minimum-field schema for one (category, record-type) combination.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    mandatory: Vec<String>,
    disjunctive: Vec<Vec<String>>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mandatory(mut self, items: &[&str]) -> Self {
        self.mandatory = items.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add one disjunctive group: at least one of `items` must be present.
    pub fn disjunctive(mut self, items: &[&str]) -> Self {
        self.disjunctive
            .push(items.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Check `record` against this schema, returning the first missing
    /// mandatory item or unsatisfied disjunctive group, if any.
    pub fn check(&self, record: &Record) -> Result<(), SchemaViolation> {
        for item in &self.mandatory {
            if !record.has_item(item) {
                return Err(SchemaViolation::MissingMandatory(item.clone()));
            }
        }
        for group in &self.disjunctive {
            if !group.iter().any(|item| record.has_item(item)) {
                return Err(SchemaViolation::UnsatisfiedDisjunction(group.clone()));
            }
        }
        Ok(())
    }

    pub fn is_satisfied(&self, record: &Record) -> bool {
        self.check(record).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    MissingMandatory(String),
    UnsatisfiedDisjunction(Vec<String>),
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaViolation::MissingMandatory(item) => {
                write!(f, "missing mandatory item {item}")
            }
            SchemaViolation::UnsatisfiedDisjunction(group) => {
                write!(f, "none of disjunctive group {group:?} present")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DataItem;

    fn record_with_items(items: &[&str]) -> Record {
        let mut rec = Record::new(10);
        for item in items {
            rec = rec.with_item(*item, DataItem::new());
        }
        rec
    }

    #[test]
    fn mandatory_missing_is_rejected() {
        let schema = FieldSchema::new().mandatory(&["I010", "I140"]);
        let record = record_with_items(&["I010"]);
        assert_eq!(
            schema.check(&record),
            Err(SchemaViolation::MissingMandatory("I140".to_string()))
        );
    }

    #[test]
    fn disjunctive_satisfied_by_any_member() {
        let schema = FieldSchema::new().disjunctive(&["I040", "I041", "I042"]);
        let record = record_with_items(&["I041"]);
        assert!(schema.is_satisfied(&record));
    }

    #[test]
    fn disjunctive_unsatisfied_when_none_present() {
        let schema = FieldSchema::new().disjunctive(&["I041", "I042"]);
        let record = record_with_items(&["I010"]);
        assert!(!schema.is_satisfied(&record));
    }

    #[test]
    fn combined_schema_matching_cat10_smr() {
        let schema = FieldSchema::new()
            .mandatory(&["I000", "I010", "I020", "I140", "I161", "I270"])
            .disjunctive(&["I040", "I041", "I042"]);
        let full = record_with_items(&[
            "I000", "I010", "I020", "I140", "I161", "I270", "I042",
        ]);
        assert!(schema.is_satisfied(&full));

        let missing_position = record_with_items(&[
            "I000", "I010", "I020", "I140", "I161", "I270",
        ]);
        assert!(!schema.is_satisfied(&missing_position));
    }
}
