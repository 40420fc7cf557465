//! Reserved field names
//!
//! Identifier and bookkeeping keys the target system manages itself. They are
//! kept in the inferred schema but excluded from export and migration.

use serde::{Deserialize, Serialize};

/// Reserved field names, passed explicitly to the analyzer, compiler and exporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedFields {
    /// Top-level entity fields managed by the target system
    pub fields: Vec<String>,
    /// Component keys that identify the component rather than describe it
    pub sub_fields: Vec<String>,
}

impl Default for ReservedFields {
    fn default() -> Self {
        Self {
            fields: [
                "id",
                "_id",
                "createdAt",
                "updatedAt",
                "published_at",
                "__v",
                "created_by",
                "updated_by",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            sub_fields: ["id", "_id", "__v"].into_iter().map(String::from).collect(),
        }
    }
}

impl ReservedFields {
    /// A reserved set with nothing in it
    pub fn none() -> Self {
        Self {
            fields: Vec::new(),
            sub_fields: Vec::new(),
        }
    }

    /// Whether a top-level field is reserved
    pub fn is_reserved_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Whether a component key is reserved
    pub fn is_reserved_sub_field(&self, name: &str) -> bool {
        self.sub_fields.iter().any(|f| f == name)
    }
}
