//! Schema editing operations
//!
//! Small independent edits a user applies to an inferred schema before it is
//! exported or compiled. Each operation touches one entity and leaves every
//! other descriptor as it was.

use thiserror::Error;

use crate::models::{Field, FieldType, Schema};

/// Errors raised when an edit does not match the schema it is applied to
///
/// These indicate stale state on the caller's side (the UI and the schema are
/// out of sync), as opposed to bad input data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The entity does not exist in the schema
    #[error("Entity '{0}' not found in schema")]
    EntityNotFound(String),

    /// The field does not exist on the entity
    #[error("Field '{field}' not found on entity '{entity}'")]
    FieldNotFound { entity: String, field: String },

    /// The requested type change is not supported
    #[error("Cannot change field '{field}' to type '{target}'")]
    UnsupportedTypeChange { field: String, target: FieldType },
}

/// Record of a destructive type change
///
/// Payloads compiled before the change are stale for this field
/// (see `PayloadCompiler::apply_type_change`).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChange {
    /// Entity the field belongs to
    pub entity: String,
    /// Descriptor before the change
    pub previous: Field,
    /// Descriptor after the change
    pub current: Field,
}

impl TypeChange {
    /// Name of the changed field
    pub fn field(&self) -> &str {
        &self.current.name
    }
}

fn field_mut<'a>(schema: &'a mut Schema, entity: &str, field: &str) -> Result<&'a mut Field, EditError> {
    schema
        .entity_mut(entity)
        .ok_or_else(|| EditError::EntityNotFound(entity.to_string()))?
        .field_mut(field)
        .ok_or_else(|| EditError::FieldNotFound {
            entity: entity.to_string(),
            field: field.to_string(),
        })
}

/// Remove a field from an entity, returning the removed descriptor
///
/// Removing a field that does not exist is a no-op.
pub fn remove_field(schema: &mut Schema, entity: &str, field: &str) -> Option<Field> {
    let entity = schema.entity_mut(entity)?;
    let index = entity.position(field)?;
    Some(entity.fields.remove(index))
}

/// Set the `required` flag of a field
pub fn set_required(schema: &mut Schema, entity: &str, field: &str, required: bool) -> Result<(), EditError> {
    field_mut(schema, entity, field)?.required = required;
    Ok(())
}

/// Set the `unique` flag of a field
pub fn set_unique(schema: &mut Schema, entity: &str, field: &str, unique: bool) -> Result<(), EditError> {
    field_mut(schema, entity, field)?.unique = unique;
    Ok(())
}

/// Move the field at `source` to `destination`, shifting the fields between
///
/// A missing destination, equal indices, or an index past the end of the
/// field list leave the order untouched. Returns whether anything moved.
pub fn reorder_fields(
    schema: &mut Schema,
    entity: &str,
    source: usize,
    destination: Option<usize>,
) -> Result<bool, EditError> {
    let entity_schema = schema
        .entity_mut(entity)
        .ok_or_else(|| EditError::EntityNotFound(entity.to_string()))?;

    let Some(destination) = destination else {
        return Ok(false);
    };
    let len = entity_schema.fields.len();
    if source == destination || source >= len || destination >= len {
        return Ok(false);
    }

    let moved = entity_schema.fields.remove(source);
    entity_schema.fields.insert(destination, moved);
    Ok(true)
}

/// Change the declared type of a field
///
/// Only promotion to [`FieldType::RelationOneToOne`] is supported. The field's
/// descriptor is replaced by a fresh relation descriptor (not required, not
/// unique, no sub-fields); everything known about the previous type is lost.
pub fn change_field_type(
    schema: &mut Schema,
    entity: &str,
    field: &str,
    target: FieldType,
) -> Result<TypeChange, EditError> {
    if target != FieldType::RelationOneToOne {
        return Err(EditError::UnsupportedTypeChange {
            field: field.to_string(),
            target,
        });
    }

    let descriptor = field_mut(schema, entity, field)?;
    let current = Field::relation(field);
    let previous = std::mem::replace(descriptor, current.clone());

    Ok(TypeChange {
        entity: entity.to_string(),
        previous,
        current,
    })
}
