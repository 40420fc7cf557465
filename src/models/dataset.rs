//! Source dataset model
//!
//! A dataset maps entity names to ordered lists of loosely-typed records.
//! Structure is validated once on construction so inference and compilation
//! can work with typed records.

use serde_json::{Map, Value};

use crate::inference::InferenceError;

/// One raw source record
pub type Record = Map<String, Value>;

/// Records of a single entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRecords {
    /// Entity name
    pub name: String,
    /// Records in source order
    pub records: Vec<Record>,
}

/// Validated source dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entities: Vec<EntityRecords>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a dataset from a JSON string
    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate a JSON value as a dataset
    ///
    /// The root must be an object whose values are arrays of objects.
    pub fn from_value(value: Value) -> Result<Self, InferenceError> {
        let Value::Object(root) = value else {
            return Err(InferenceError::MalformedDataset(
                value_type_name(&value).to_string(),
            ));
        };

        let mut dataset = Dataset::new();
        for (entity, data) in root {
            let Value::Array(items) = data else {
                return Err(InferenceError::MalformedEntity {
                    entity,
                    found: value_type_name(&data).to_string(),
                });
            };

            let mut records = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(record) => records.push(record),
                    other => {
                        return Err(InferenceError::MalformedRecord {
                            entity,
                            index,
                            found: value_type_name(&other).to_string(),
                        });
                    }
                }
            }

            dataset.insert(entity, records);
        }

        Ok(dataset)
    }

    /// Add or replace an entity's records
    pub fn insert(&mut self, entity: impl Into<String>, records: Vec<Record>) {
        let name = entity.into();
        match self.entities.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.records = records,
            None => self.entities.push(EntityRecords { name, records }),
        }
    }

    /// Records of an entity
    pub fn records(&self, entity: &str) -> Option<&[Record]> {
        self.entities
            .iter()
            .find(|e| e.name == entity)
            .map(|e| e.records.as_slice())
    }

    /// Iterate entities in source order
    pub fn entities(&self) -> impl Iterator<Item = &EntityRecords> {
        self.entities.iter()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the dataset has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
