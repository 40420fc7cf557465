//! Compiled migration payloads

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::error::CompileError;
use crate::models::{EntitySchema, Field, FieldType, ReservedFields};

/// Placeholder foreign key written for one-to-one relation fields
pub fn relation_placeholder() -> Value {
    json!({ "id": null })
}

/// A downloaded media file attached to a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Field the media belongs to
    pub field: String,
    /// Original file name of the asset
    pub file_name: String,
    /// MIME type of the asset
    pub mime: String,
    /// File content
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Multipart form key of the attachment (`files.<field>`)
    pub fn form_key(&self) -> String {
        format!("files.{}", self.field)
    }
}

/// Submission payload for one source record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// JSON `data` part of the submission
    pub data: Map<String, Value>,
    /// Binary attachments
    pub files: Vec<Attachment>,
}

impl Payload {
    /// Attachment for a field, if any
    pub fn file(&self, field: &str) -> Option<&Attachment> {
        self.files.iter().find(|a| a.field == field)
    }
}

/// Compilation outcome of one source record
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRecord {
    /// Index of the record in the source entity
    pub index: usize,
    /// Payload, or the reason the record could not be compiled
    pub outcome: Result<Payload, CompileError>,
}

impl CompiledRecord {
    /// The payload, if compilation succeeded
    pub fn payload(&self) -> Option<&Payload> {
        self.outcome.as_ref().ok()
    }

    /// Whether compilation failed
    pub fn is_failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Compiled records of one entity, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPayloads {
    /// Entity name
    pub entity: String,
    /// One entry per source record
    pub records: Vec<CompiledRecord>,
}

/// Compiled payloads for a whole dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledPayloads {
    /// Per-entity payloads, in schema order
    pub entities: Vec<EntityPayloads>,
}

impl CompiledPayloads {
    /// Payloads of an entity
    pub fn entity(&self, name: &str) -> Option<&EntityPayloads> {
        self.entities.iter().find(|e| e.entity == name)
    }

    /// Every failed record as `(entity, index, error)`
    pub fn failures(&self) -> Vec<(&str, usize, &CompileError)> {
        self.entities
            .iter()
            .flat_map(|e| {
                e.records.iter().filter_map(move |r| match &r.outcome {
                    Err(err) => Some((e.entity.as_str(), r.index, err)),
                    Ok(_) => None,
                })
            })
            .collect()
    }

    /// Number of successfully compiled records
    pub fn compiled_count(&self) -> usize {
        self.entities
            .iter()
            .map(|e| e.records.iter().filter(|r| !r.is_failed()).count())
            .sum()
    }

    /// Require every record to have compiled
    pub fn into_complete(self) -> Result<Vec<(String, Vec<Payload>)>, CompileError> {
        let failures = self.failures();
        if let Some((entity, index, first)) = failures.first() {
            return Err(CompileError::Incomplete {
                failed: failures.len(),
                first: format!("{entity}[{index}]: {first}"),
            });
        }

        Ok(self
            .entities
            .into_iter()
            .map(|e| {
                let payloads = e
                    .records
                    .into_iter()
                    .filter_map(|r| r.outcome.ok())
                    .collect();
                (e.entity, payloads)
            })
            .collect())
    }
}

/// Fields of an entity grouped by how they are written into a payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPartition<'s> {
    /// Text fields, copied verbatim when the value is a string
    pub plain: Vec<&'s Field>,
    /// Stringified
    pub boolean: Vec<&'s Field>,
    /// Downloaded and attached
    pub media: Vec<&'s Field>,
    /// Flattened into the top level
    pub component: Vec<&'s Field>,
    /// Written as a placeholder foreign key
    pub relation: Vec<&'s Field>,
}

impl<'s> FieldPartition<'s> {
    /// Partition the non-reserved fields of an entity by declared type
    ///
    /// Only `String`/`RichText` and `Boolean` scalars are carried;
    /// `Date`, `Number`, `Unknown` and `Nullish` fields are left out.
    pub fn of(entity: &'s EntitySchema, reserved: &ReservedFields) -> Self {
        let mut partition = Self::default();
        for field in &entity.fields {
            if reserved.is_reserved_field(&field.name) {
                continue;
            }
            match field.field_type {
                FieldType::String | FieldType::RichText => partition.plain.push(field),
                FieldType::Boolean => partition.boolean.push(field),
                FieldType::Media => partition.media.push(field),
                FieldType::Component => partition.component.push(field),
                FieldType::RelationOneToOne => partition.relation.push(field),
                FieldType::Date
                | FieldType::Number
                | FieldType::Nullish
                | FieldType::Unknown => {}
            }
        }
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;

    #[test]
    fn test_partition() {
        let mut entity = EntitySchema::new("posts");
        entity.fields = vec![
            Field::new("id", FieldType::String),
            Field::new("title", FieldType::String),
            Field::new("body", FieldType::RichText),
            Field::new("publishedOn", FieldType::Date),
            Field::new("views", FieldType::Number),
            Field::new("featured", FieldType::Boolean),
            Field::new("cover", FieldType::Media),
            Field::new("social", FieldType::Component),
            Field::relation("author"),
            Field::new("legacy", FieldType::Unknown),
            Field::new("empty", FieldType::Nullish),
        ];

        let partition = FieldPartition::of(&entity, &ReservedFields::default());
        let names = |fields: &[&Field]| fields.iter().map(|f| f.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&partition.plain), vec!["title", "body"]);
        assert_eq!(names(&partition.boolean), vec!["featured"]);
        assert_eq!(names(&partition.media), vec!["cover"]);
        assert_eq!(names(&partition.component), vec!["social"]);
        assert_eq!(names(&partition.relation), vec!["author"]);
    }

    #[test]
    fn test_attachment_form_key() {
        let attachment = Attachment {
            field: "cover".to_string(),
            file_name: "cover.png".to_string(),
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(attachment.form_key(), "files.cover");
    }

    #[test]
    fn test_failures_and_into_complete() {
        let payloads = CompiledPayloads {
            entities: vec![EntityPayloads {
                entity: "posts".to_string(),
                records: vec![
                    CompiledRecord {
                        index: 0,
                        outcome: Ok(Payload::default()),
                    },
                    CompiledRecord {
                        index: 1,
                        outcome: Err(CompileError::MediaFetch {
                            field: "cover".to_string(),
                            url: "http://x/a.png".to_string(),
                            source: super::super::error::FetchError::Timeout(5),
                        }),
                    },
                ],
            }],
        };

        assert_eq!(payloads.compiled_count(), 1);
        let failures = payloads.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!((failures[0].0, failures[0].1), ("posts", 1));

        let err = payloads.into_complete().unwrap_err();
        assert!(matches!(err, CompileError::Incomplete { failed: 1, .. }));
    }
}
