//! Schema model: per-entity ordered field descriptors

use serde::{Deserialize, Serialize};

use super::field::Field;

/// Inferred fields of one entity, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySchema {
    /// Entity name (top-level key of the source dataset)
    pub name: String,
    /// Field descriptors
    pub fields: Vec<Field>,
}

impl EntitySchema {
    /// Create an entity with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by name for modification
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Index of a field within the entity
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Complete inferred schema for a dataset
///
/// Entities keep the order in which they appear in the source dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Per-entity field descriptors
    pub entities: Vec<EntitySchema>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Look up an entity by name for modification
    pub fn entity_mut(&mut self, name: &str) -> Option<&mut EntitySchema> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    /// Look up a field of an entity
    pub fn field(&self, entity: &str, field: &str) -> Option<&Field> {
        self.entity(entity).and_then(|e| e.field(field))
    }

    /// Insert an entity, replacing any entity with the same name in place
    pub fn insert_entity(&mut self, entity: EntitySchema) {
        match self.entities.iter_mut().find(|e| e.name == entity.name) {
            Some(existing) => *existing = entity,
            None => self.entities.push(entity),
        }
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the schema has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
