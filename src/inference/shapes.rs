//! Structural validators for object-shaped values
//!
//! A media asset and a component are recognized by checking a closed set of
//! required (and optional) keys with their expected value kinds. Validation
//! either yields a typed view of the value or a rejection naming the first
//! offending key.

use serde_json::{Map, Value};
use thiserror::Error;

use super::formats::is_date_like;
use crate::models::dataset::value_type_name;

/// Why a value did not match an expected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeRejection {
    /// The value is not an object
    #[error("expected object, found {0}")]
    NotAnObject(String),

    /// A required key is missing or null
    #[error("missing required key '{0}'")]
    MissingKey(String),

    /// A key holds a value of the wrong kind
    #[error("key '{key}' should be {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: String,
    },
}

/// One rendition of an uploaded image (`formats.thumbnail`, `formats.small`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFormat {
    pub name: String,
    pub hash: String,
    pub ext: String,
    pub mime: String,
    pub width: f64,
    pub height: f64,
    pub size: f64,
    pub url: String,
}

/// Typed view of a media asset value
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub id: String,
    pub name: String,
    pub alternative_text: String,
    pub caption: String,
    pub hash: String,
    pub ext: String,
    pub mime: String,
    pub size: f64,
    pub width: f64,
    pub height: f64,
    pub url: String,
    pub provider: String,
    pub created_at: String,
    pub updated_at: String,
    pub version: f64,
    pub thumbnail: MediaFormat,
    pub medium: Option<MediaFormat>,
    pub small: Option<MediaFormat>,
}

/// Key-by-key checker over one object, prefixing key paths for rejections
struct ObjectCheck<'a> {
    object: &'a Map<String, Value>,
    prefix: &'a str,
}

impl<'a> ObjectCheck<'a> {
    fn new(value: &'a Value, prefix: &'a str) -> Result<Self, ShapeRejection> {
        match value {
            Value::Object(object) => Ok(Self { object, prefix }),
            other => Err(ShapeRejection::NotAnObject(
                value_type_name(other).to_string(),
            )),
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    fn required(&self, key: &str) -> Result<&'a Value, ShapeRejection> {
        match self.object.get(key) {
            Some(Value::Null) | None => Err(ShapeRejection::MissingKey(self.path(key))),
            Some(value) => Ok(value),
        }
    }

    fn wrong_type(&self, key: &str, expected: &'static str, found: &Value) -> ShapeRejection {
        ShapeRejection::WrongType {
            key: self.path(key),
            expected,
            found: value_type_name(found).to_string(),
        }
    }

    fn string(&self, key: &str) -> Result<String, ShapeRejection> {
        match self.required(key)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(self.wrong_type(key, "a string", other)),
        }
    }

    fn number(&self, key: &str) -> Result<f64, ShapeRejection> {
        let value = self.required(key)?;
        value
            .as_f64()
            .ok_or_else(|| self.wrong_type(key, "a number", value))
    }

    fn date(&self, key: &str) -> Result<String, ShapeRejection> {
        match self.required(key)? {
            Value::String(s) if is_date_like(s) => Ok(s.clone()),
            other => Err(self.wrong_type(key, "a date", other)),
        }
    }

    fn nested(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|v| !v.is_null())
    }
}

fn validate_format(value: &Value, prefix: &str) -> Result<MediaFormat, ShapeRejection> {
    let check = ObjectCheck::new(value, prefix)?;
    Ok(MediaFormat {
        name: check.string("name")?,
        hash: check.string("hash")?,
        ext: check.string("ext")?,
        mime: check.string("mime")?,
        width: check.number("width")?,
        height: check.number("height")?,
        size: check.number("size")?,
        url: check.string("url")?,
    })
}

/// Validate a value against the media asset shape
pub fn validate_media(value: &Value) -> Result<MediaAsset, ShapeRejection> {
    let check = ObjectCheck::new(value, "")?;

    let formats = check.required("formats")?;
    let formats_check = ObjectCheck::new(formats, "formats")
        .map_err(|_| check.wrong_type("formats", "an object", formats))?;
    let thumbnail = validate_format(formats_check.required("thumbnail")?, "formats.thumbnail")?;
    let medium = formats_check
        .nested("medium")
        .map(|v| validate_format(v, "formats.medium"))
        .transpose()?;
    let small = formats_check
        .nested("small")
        .map(|v| validate_format(v, "formats.small"))
        .transpose()?;

    Ok(MediaAsset {
        id: check.string("id")?,
        name: check.string("name")?,
        alternative_text: check.string("alternativeText")?,
        caption: check.string("caption")?,
        hash: check.string("hash")?,
        ext: check.string("ext")?,
        mime: check.string("mime")?,
        size: check.number("size")?,
        width: check.number("width")?,
        height: check.number("height")?,
        url: check.string("url")?,
        provider: check.string("provider")?,
        created_at: check.date("createdAt")?,
        updated_at: check.date("updatedAt")?,
        version: check.number("__v")?,
        thumbnail,
        medium,
        small,
    })
}

/// Validate a value against the component shape (`{id, ...}` or `{id, _id, ...}`)
///
/// Returns the component object on success.
pub fn validate_component(value: &Value) -> Result<&Map<String, Value>, ShapeRejection> {
    let check = ObjectCheck::new(value, "")?;
    match check.required("id")? {
        Value::String(_) | Value::Number(_) => Ok(check.object),
        other => Err(check.wrong_type("id", "a string or number", other)),
    }
}
