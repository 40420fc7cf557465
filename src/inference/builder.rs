//! Schema builder
//!
//! Runs the entity analyzer over every field of every entity in a dataset.

use serde_json::Value;
use tracing::debug;

use super::analyzer::EntityAnalyzer;
use super::config::InferenceConfig;
use super::error::InferenceError;
use crate::models::{Dataset, EntityRecords, EntitySchema, Field, Schema};

/// Builds a [`Schema`] from a dataset
///
/// Building is pure: the dataset is only read, and running the builder twice
/// on the same input yields the same schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    config: InferenceConfig,
}

impl SchemaBuilder {
    /// Create a new schema builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new schema builder with custom configuration
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Validate a raw JSON value as a dataset and build its schema
    pub fn build_value(&self, value: &Value) -> Result<Schema, InferenceError> {
        let dataset = Dataset::from_value(value.clone())?;
        Ok(self.build(&dataset))
    }

    /// Build the schema of an already validated dataset
    pub fn build(&self, dataset: &Dataset) -> Schema {
        let mut schema = Schema::new();
        for entity in dataset.entities() {
            schema.insert_entity(self.build_entity(entity));
        }
        schema
    }

    fn build_entity(&self, entity: &EntityRecords) -> EntitySchema {
        let records = match self.config.sample_size {
            0 => entity.records.as_slice(),
            n => &entity.records[..n.min(entity.records.len())],
        };

        // Union of field names, in order of first appearance
        let mut field_names: Vec<&str> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !field_names.contains(&key.as_str()) {
                    field_names.push(key);
                }
            }
        }

        let mut analyzer = EntityAnalyzer::new(self.config.reserved.clone());
        let mut fields: Vec<Field> = Vec::with_capacity(field_names.len());
        for name in field_names {
            let mut field = None;
            for record in records {
                field = Some(analyzer.analyze_field(name, field, record.get(name)));
            }
            if let Some(field) = field {
                fields.push(field);
            }
        }

        debug!(
            entity = %entity.name,
            records = records.len(),
            fields = fields.len(),
            "Inferred entity schema"
        );

        EntitySchema {
            name: entity.name.clone(),
            fields,
        }
    }
}
