//! Entity analyzer
//!
//! Folds the values of one field, record by record, into a single field
//! descriptor. One analyzer is created per entity and carries the state that
//! spans records: the union of component sub-field names seen so far and the
//! string values seen per field (for uniqueness).

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::classify::{classify, classify_with_hint};
use super::merge::{merge_required, merge_type, merge_unique};
use crate::models::{Field, FieldType, ReservedFields};

/// Per-entity state for incremental field analysis
#[derive(Debug, Clone, Default)]
pub struct EntityAnalyzer {
    reserved: ReservedFields,
    /// Component field path -> sub-field names in order of discovery
    sub_field_keys: HashMap<String, Vec<String>>,
    /// Component field path -> number of component values seen
    component_observations: HashMap<String, usize>,
    /// Field path -> string values seen so far, whatever the field's type
    seen_values: HashMap<String, HashSet<String>>,
    /// Field paths that have repeated a string value
    repeated: HashSet<String>,
}

impl EntityAnalyzer {
    /// Create an analyzer that skips the given reserved component keys
    pub fn new(reserved: ReservedFields) -> Self {
        Self {
            reserved,
            ..Self::default()
        }
    }

    /// Fold one record's value for `field` into its descriptor
    ///
    /// `existing` is the descriptor built from the previous records, or `None`
    /// on the first observation. `value` is `None` when the record lacks the
    /// key; JSON `null` is treated the same way.
    pub fn analyze_field(&mut self, field: &str, existing: Option<Field>, value: Option<&Value>) -> Field {
        self.analyze_at(field, field, existing, value, false)
    }

    fn analyze_at(
        &mut self,
        path: &str,
        name: &str,
        existing: Option<Field>,
        value: Option<&Value>,
        nested: bool,
    ) -> Field {
        let value = value.filter(|v| !v.is_null());
        match existing {
            None => self.first_observation(path, name, value, nested),
            Some(field) => self.next_observation(path, field, value, nested),
        }
    }

    fn first_observation(&mut self, path: &str, name: &str, value: Option<&Value>, nested: bool) -> Field {
        let mut field = Field::new(name, classify(value));

        let Some(value) = value else {
            field.required = false;
            return field;
        };

        self.track_unique(path, &mut field, value);
        if field.field_type == FieldType::Component && !nested {
            self.discover_sub_fields(path, &mut field, value);
        }

        field
    }

    fn next_observation(&mut self, path: &str, mut field: Field, value: Option<&Value>, nested: bool) -> Field {
        // Absence demotes `required` but never says anything about the type
        let Some(value) = value else {
            field.required = merge_required(field.required, false);
            return field;
        };

        let observed = classify_with_hint(Some(value), Some(field.field_type));
        let merged = merge_type(field.field_type, observed);
        if merged != field.field_type {
            if merged.is_textual() && !field.field_type.is_textual() {
                // Uniqueness now covers every string value seen on this path
                field.unique = !self.repeated.contains(path);
            }
            if merged != FieldType::Component {
                field.sub_fields.clear();
            }
            field.field_type = merged;
        }

        self.track_unique(path, &mut field, value);
        if field.field_type == FieldType::Component && observed == FieldType::Component && !nested {
            self.discover_sub_fields(path, &mut field, value);
        }

        field
    }

    fn track_unique(&mut self, path: &str, field: &mut Field, value: &Value) {
        let Value::String(s) = value else {
            return;
        };

        let duplicate = !self
            .seen_values
            .entry(path.to_string())
            .or_default()
            .insert(s.clone());
        if duplicate {
            self.repeated.insert(path.to_string());
        }
        if field.field_type.is_textual() {
            field.unique = merge_unique(field.unique, duplicate);
        }
    }

    /// Extend the union of sub-field names with this value's keys, then fold
    /// every known sub-field with this value. Discovery is one level deep.
    fn discover_sub_fields(&mut self, path: &str, field: &mut Field, value: &Value) {
        let Value::Object(component) = value else {
            return;
        };

        let observations = self
            .component_observations
            .entry(path.to_string())
            .or_insert(0);
        let prior_observations = *observations;
        *observations += 1;

        let keys = self.sub_field_keys.entry(path.to_string()).or_default();
        for key in component.keys() {
            if self.reserved.is_reserved_sub_field(key) || keys.contains(key) {
                continue;
            }
            keys.push(key.clone());
        }
        let keys = keys.clone();

        for key in keys {
            let sub_path = format!("{}.{}", path, key);
            let sub_value = component.get(&key);

            match field.sub_fields.iter().position(|f| f.name == key) {
                Some(index) => {
                    let existing = field.sub_fields.remove(index);
                    let updated = self.analyze_at(&sub_path, &key, Some(existing), sub_value, true);
                    field.sub_fields.insert(index, updated);
                }
                None => {
                    let mut discovered = self.analyze_at(&sub_path, &key, None, sub_value, true);
                    if prior_observations > 0 {
                        // Earlier component values lacked this key
                        discovered.required = false;
                    }
                    field.sub_fields.push(discovered);
                }
            }
        }
    }
}
