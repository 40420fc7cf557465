//! Field descriptor model
//!
//! A field descriptor is the inferred type/required/unique/sub-field metadata
//! for one field of one entity.

use serde::{Deserialize, Serialize};

/// Semantic field type assigned to a field of an entity
///
/// `Nullish` and `Unknown` are both "no useful signal" states: `Nullish` means
/// every value seen so far was absent or null, `Unknown` means a present value
/// matched no recognized shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// String containing markup
    RichText,
    /// Plain string
    String,
    /// Calendar date or date-time string
    Date,
    /// Nested object with its own sub-fields
    Component,
    /// Manually assigned one-to-one relation to another entity
    #[serde(rename = "relation")]
    RelationOneToOne,
    /// Uploaded media asset
    Media,
    /// Numeric value
    Number,
    /// Boolean value
    Boolean,
    /// Absent or null in every observed record
    Nullish,
    /// Present, but matching no recognized shape
    Unknown,
}

impl FieldType {
    /// Every variant, in display order
    pub const ALL: [FieldType; 10] = [
        FieldType::RichText,
        FieldType::String,
        FieldType::Date,
        FieldType::Component,
        FieldType::RelationOneToOne,
        FieldType::Media,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Nullish,
        FieldType::Unknown,
    ];

    /// Get the serialized tag of this type
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::RichText => "richtext",
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::Component => "component",
            FieldType::RelationOneToOne => "relation",
            FieldType::Media => "media",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Nullish => "nullish",
            FieldType::Unknown => "unknown",
        }
    }

    /// String-valued types whose uniqueness is tracked during inference
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::String | FieldType::RichText)
    }

    /// Whether the type carries enough information to be exported
    pub fn has_signal(&self) -> bool {
        !matches!(self, FieldType::Nullish | FieldType::Unknown)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.type_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field type '{}'", s))
    }
}

/// Inferred descriptor for a single field
///
/// `sub_fields` is only ever non-empty when `field_type` is
/// [`FieldType::Component`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name as it appears in the source records
    pub name: String,
    /// Inferred (or user-assigned) type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether every observed record carried a value
    pub required: bool,
    /// Whether every observed string value was distinct
    pub unique: bool,
    /// Component sub-fields, in order of discovery
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_fields: Vec<Field>,
}

impl Field {
    /// Create a new required field; uniqueness is assumed for string types only
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            unique: field_type.is_textual(),
            sub_fields: Vec::new(),
        }
    }

    /// Fresh one-to-one relation descriptor with no inherited metadata
    pub fn relation(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::RelationOneToOne,
            required: false,
            unique: false,
            sub_fields: Vec::new(),
        }
    }

    /// Set the required flag
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the unique flag
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Attach component sub-fields
    pub fn with_sub_fields(mut self, sub_fields: Vec<Field>) -> Self {
        self.sub_fields = sub_fields;
        self
    }

    /// Look up a component sub-field by name
    pub fn sub_field(&self, name: &str) -> Option<&Field> {
        self.sub_fields.iter().find(|f| f.name == name)
    }
}
