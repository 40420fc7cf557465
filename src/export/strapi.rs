//! Strapi content-type exporter
//!
//! Converts a [`Schema`] into the `schema.json` documents Strapi expects for
//! collection types, plus one component definition per component field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::ExportError;
use super::naming::{component_collection_name, component_uid, display_name, singularize};
use crate::models::{EntitySchema, Field, FieldType, ReservedFields, Schema};

/// Configuration for the Strapi exporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Reserved names; reserved entity fields are not exported
    pub reserved: ReservedFields,
    /// Value of `options.draftAndPublish` on collection types
    pub draft_and_publish: bool,
    /// Icon assigned to generated components
    pub component_icon: String,
    /// `allowedTypes` of media attributes
    pub media_allowed_types: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            reserved: ReservedFields::default(),
            draft_and_publish: false,
            component_icon: "apps".to_string(),
            media_allowed_types: ["images", "files", "videos", "audios"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ExportConfig {
    /// Create a builder for custom configuration
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }
}

/// Builder for ExportConfig
#[derive(Debug, Default)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    /// Replace the reserved field names
    pub fn reserved(mut self, reserved: ReservedFields) -> Self {
        self.config.reserved = reserved;
        self
    }

    /// Enable or disable draft & publish on collection types
    pub fn draft_and_publish(mut self, enabled: bool) -> Self {
        self.config.draft_and_publish = enabled;
        self
    }

    /// Set the icon of generated components
    pub fn component_icon(mut self, icon: impl Into<String>) -> Self {
        self.config.component_icon = icon.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ExportConfig {
        self.config
    }
}

/// What an export document defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    /// A collection type generated from an entity
    Entity,
    /// A component generated from a component field
    Component,
}

/// A generated schema-definition document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Entity or component definition
    pub kind: DocumentKind,
    /// Entity the document was generated from
    pub entity: String,
    /// Singular entity name, or component field name
    pub name: String,
    /// Suggested file name (`schema.json` or `<component>.json`)
    pub file_name: String,
    /// Where the file belongs in a Strapi project
    pub hint: String,
    /// The definition itself
    pub content: Value,
}

impl ExportDocument {
    /// Path of the document relative to a Strapi project root
    ///
    /// Fails when a name would leave its directory (empty, `.`, `..`, or
    /// containing a path separator).
    pub fn relative_path(&self) -> Result<PathBuf, ExportError> {
        let name = path_segment(&self.name)?;
        let file_name = path_segment(&self.file_name)?;
        Ok(match self.kind {
            DocumentKind::Entity => PathBuf::from("src/api")
                .join(name)
                .join("content-types")
                .join(name)
                .join(file_name),
            DocumentKind::Component => PathBuf::from("src/components").join(name).join(file_name),
        })
    }

    /// Pretty-printed JSON content
    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(&self.content)
            .map_err(|e| ExportError::SerializationError(e.to_string()))
    }

    /// Write the document below `root`, creating directories as needed
    pub fn write_to(&self, root: &Path) -> Result<PathBuf, ExportError> {
        let path = root.join(self.relative_path()?);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

fn path_segment(name: &str) -> Result<&str, ExportError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(ExportError::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Strapi schema exporter
#[derive(Debug, Clone, Default)]
pub struct StrapiExporter {
    config: ExportConfig,
}

impl StrapiExporter {
    /// Create a new exporter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new exporter with custom configuration
    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Export every entity of the schema
    ///
    /// Each entity yields its collection-type document followed by one
    /// document per component field, before the next entity starts.
    pub fn export(&self, schema: &Schema) -> Vec<ExportDocument> {
        let mut documents = Vec::new();
        for entity in &schema.entities {
            documents.extend(self.export_entity(entity));
        }
        documents
    }

    /// Export one entity and its components
    pub fn export_entity(&self, entity: &EntitySchema) -> Vec<ExportDocument> {
        let singular = singularize(&entity.name);
        let exported: Vec<&Field> = entity
            .fields
            .iter()
            .filter(|f| f.field_type.has_signal() && !self.config.reserved.is_reserved_field(&f.name))
            .collect();

        let mut attributes = Map::new();
        for field in &exported {
            attributes.insert(field.name.clone(), self.attribute(field));
        }

        let mut documents = vec![ExportDocument {
            kind: DocumentKind::Entity,
            entity: entity.name.clone(),
            name: singular.clone(),
            file_name: "schema.json".to_string(),
            hint: format!("Place in src/api/{singular}/content-types/{singular}/schema.json"),
            content: json!({
                "kind": "collectionType",
                "collectionName": entity.name,
                "info": {
                    "singularName": singular,
                    "displayName": display_name(&singular),
                    "pluralName": entity.name,
                    "description": ""
                },
                "options": {
                    "draftAndPublish": self.config.draft_and_publish
                },
                "pluginOptions": {},
                "attributes": attributes
            }),
        }];

        documents.extend(
            exported
                .iter()
                .filter(|f| f.field_type == FieldType::Component)
                .map(|f| self.component_document(&entity.name, f)),
        );

        debug!(
            entity = %entity.name,
            attributes = exported.len(),
            documents = documents.len(),
            "Exported entity"
        );

        documents
    }

    fn component_document(&self, entity: &str, field: &Field) -> ExportDocument {
        let mut attributes = Map::new();
        for sub_field in &field.sub_fields {
            if !sub_field.field_type.has_signal()
                || self.config.reserved.is_reserved_sub_field(&sub_field.name)
            {
                continue;
            }
            let attribute = match sub_field.field_type {
                // Deeper nesting is opaque
                FieldType::Component => base_attribute("json", sub_field),
                _ => self.attribute(sub_field),
            };
            attributes.insert(sub_field.name.clone(), attribute);
        }

        ExportDocument {
            kind: DocumentKind::Component,
            entity: entity.to_string(),
            name: field.name.clone(),
            file_name: format!("{}.json", field.name),
            hint: format!("Place in src/components/{0}/{0}.json", field.name),
            content: json!({
                "collectionName": component_collection_name(&field.name),
                "info": {
                    "displayName": display_name(&field.name),
                    "icon": self.config.component_icon
                },
                "options": {},
                "attributes": attributes
            }),
        }
    }

    fn attribute(&self, field: &Field) -> Value {
        match field.field_type {
            FieldType::RelationOneToOne => json!({
                "type": "relation",
                "relation": "oneToOne",
                "target": format!("api::{0}.{0}", field.name)
            }),
            FieldType::Media => {
                let mut attribute = base_attribute("media", field);
                attribute["multiple"] = json!(false);
                attribute["allowedTypes"] = json!(self.config.media_allowed_types);
                attribute
            }
            FieldType::Component => {
                let mut attribute = base_attribute("component", field);
                attribute["repeatable"] = json!(false);
                attribute["component"] = json!(component_uid(&field.name));
                attribute
            }
            other => base_attribute(attribute_type(other), field),
        }
    }
}

fn base_attribute(type_name: &str, field: &Field) -> Value {
    json!({
        "type": type_name,
        "required": field.required,
        "unique": field.unique
    })
}

/// Strapi attribute type for a scalar field type
fn attribute_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Date => "datetime",
        FieldType::Number => "decimal",
        other => other.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, fields: Vec<Field>) -> Schema {
        let mut entity_schema = EntitySchema::new(name);
        entity_schema.fields = fields;
        let mut schema = Schema::new();
        schema.insert_entity(entity_schema);
        schema
    }

    #[test]
    fn test_entity_document() {
        let schema = entity(
            "categories",
            vec![
                Field::new("id", FieldType::String),
                Field::new("name", FieldType::String),
                Field::new("published", FieldType::Date).with_required(false),
                Field::new("legacy", FieldType::Unknown),
                Field::new("cover", FieldType::Nullish),
            ],
        );

        let docs = StrapiExporter::new().export(&schema);
        assert_eq!(docs.len(), 1);

        let doc = &docs[0];
        assert_eq!(doc.kind, DocumentKind::Entity);
        assert_eq!(doc.file_name, "schema.json");
        assert_eq!(
            doc.relative_path().unwrap(),
            PathBuf::from("src/api/category/content-types/category/schema.json")
        );

        let content = &doc.content;
        assert_eq!(content["kind"], "collectionType");
        assert_eq!(content["collectionName"], "categories");
        assert_eq!(content["info"]["singularName"], "category");
        assert_eq!(content["info"]["displayName"], "Category");
        assert_eq!(content["info"]["pluralName"], "categories");

        let attributes = content["attributes"].as_object().unwrap();
        let keys: Vec<_> = attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "published"]);
        assert_eq!(attributes["name"]["type"], "string");
        assert_eq!(attributes["name"]["unique"], true);
        assert_eq!(attributes["published"]["type"], "datetime");
        assert_eq!(attributes["published"]["required"], false);
    }

    #[test]
    fn test_media_attribute() {
        let schema = entity(
            "posts",
            vec![Field::new("cover", FieldType::Media).with_required(false)],
        );
        let docs = StrapiExporter::new().export(&schema);
        let cover = &docs[0].content["attributes"]["cover"];
        assert_eq!(cover["type"], "media");
        assert_eq!(cover["multiple"], false);
        assert_eq!(cover["required"], false);
        assert_eq!(cover["allowedTypes"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_relation_attribute() {
        let schema = entity("posts", vec![Field::relation("author")]);
        let docs = StrapiExporter::new().export(&schema);
        assert_eq!(
            docs[0].content["attributes"]["author"],
            json!({
                "type": "relation",
                "relation": "oneToOne",
                "target": "api::author.author"
            })
        );
    }

    #[test]
    fn test_component_documents_follow_entity() {
        let social = Field::new("social", FieldType::Component).with_sub_fields(vec![
            Field::new("facebook", FieldType::String),
            Field::new("twitter", FieldType::String).with_required(false),
            Field::new("geo", FieldType::Component),
            Field::new("gone", FieldType::Nullish),
        ]);
        let mut schema = entity("posts", vec![Field::new("title", FieldType::String), social]);
        schema.insert_entity(EntitySchema::new("pages"));

        let docs = StrapiExporter::new().export(&schema);
        let kinds: Vec<_> = docs.iter().map(|d| (d.kind, d.entity.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (DocumentKind::Entity, "posts"),
                (DocumentKind::Component, "posts"),
                (DocumentKind::Entity, "pages"),
            ]
        );

        let attribute = &docs[0].content["attributes"]["social"];
        assert_eq!(attribute["type"], "component");
        assert_eq!(attribute["component"], "social.social");
        assert!(attribute.get("subFields").is_none());

        let component = &docs[1];
        assert_eq!(component.file_name, "social.json");
        assert_eq!(
            component.relative_path().unwrap(),
            PathBuf::from("src/components/social/social.json")
        );
        assert_eq!(component.content["collectionName"], "components_social.social");
        let attributes = component.content["attributes"].as_object().unwrap();
        let keys: Vec<_> = attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["facebook", "twitter", "geo"]);
        assert_eq!(attributes["geo"]["type"], "json");
        assert_eq!(attributes["twitter"]["required"], false);
    }

    #[test]
    fn test_draft_and_publish_option() {
        let config = ExportConfig::builder().draft_and_publish(true).build();
        let docs = StrapiExporter::with_config(config).export(&entity("posts", vec![]));
        assert_eq!(docs[0].content["options"]["draftAndPublish"], true);
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let docs = StrapiExporter::new().export(&entity(
            "posts",
            vec![Field::new("title", FieldType::String)],
        ));
        let path = docs[0].write_to(dir.path()).unwrap();
        assert!(path.ends_with("src/api/post/content-types/post/schema.json"));

        let written: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["attributes"]["title"]["type"], "string");
    }

    #[test]
    fn test_names_escaping_the_project_are_rejected() {
        let escaping = Field::new("../../../escaped", FieldType::Component)
            .with_sub_fields(vec![Field::new("x", FieldType::String)]);
        let docs = StrapiExporter::new().export(&entity("posts", vec![escaping]));
        let component = &docs[1];
        assert_eq!(component.kind, DocumentKind::Component);

        assert!(matches!(
            component.relative_path(),
            Err(ExportError::InvalidName(name)) if name == "../../../escaped"
        ));

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("project");
        assert!(matches!(
            component.write_to(&root),
            Err(ExportError::InvalidName(_))
        ));
        assert!(!root.exists());
        assert!(!dir.path().join("escaped.json").exists());

        for name in ["", ".", "..", "a\\b", "nul\0"] {
            assert!(path_segment(name).is_err(), "{name:?} should be rejected");
        }
        assert_eq!(path_segment("..hidden").unwrap(), "..hidden");
    }
}
