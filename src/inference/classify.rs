//! Type classifier: maps a single raw value to a [`FieldType`]

use serde_json::Value;

use super::formats::{contains_markup, is_date_like};
use super::shapes::{validate_component, validate_media};
use crate::models::FieldType;

/// Classify a raw value; `None` stands for an absent key
///
/// Categories overlap structurally, so the first matching rule wins:
/// date, markup string, plain string, media asset, component, number,
/// boolean, absent/null, and finally `Unknown`.
pub fn classify(value: Option<&Value>) -> FieldType {
    classify_with_hint(value, None)
}

/// Classify a raw value, taking the field's previous type into account
///
/// A field already classified as `Component` keeps accepting any non-media
/// object, even one without an `id`.
pub fn classify_with_hint(value: Option<&Value>, previous: Option<FieldType>) -> FieldType {
    let Some(value) = value else {
        return FieldType::Nullish;
    };

    match value {
        Value::String(s) if is_date_like(s) => FieldType::Date,
        Value::String(s) if contains_markup(s) => FieldType::RichText,
        Value::String(_) => FieldType::String,
        Value::Object(_) if validate_media(value).is_ok() => FieldType::Media,
        Value::Object(_)
            if previous == Some(FieldType::Component) || validate_component(value).is_ok() =>
        {
            FieldType::Component
        }
        Value::Number(_) => FieldType::Number,
        Value::Bool(_) => FieldType::Boolean,
        Value::Null => FieldType::Nullish,
        _ => FieldType::Unknown,
    }
}
