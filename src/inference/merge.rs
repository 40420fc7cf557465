//! Lattice merges for field descriptors
//!
//! All one-way promotions applied while folding records live here, so every
//! fold step moves a descriptor monotonically:
//!
//! - `required` only ever goes from `true` to `false`
//! - `unique` only ever goes from `true` to `false`
//! - `RichText` absorbs any other type, and `Nullish` yields to any other type

use crate::models::FieldType;

/// Merge an existing field type with a newly observed classification
///
/// - Equal types are unchanged
/// - If either side is `RichText`, the result is `RichText`
/// - A `Nullish` field takes the first type that carries a signal
/// - Any other disagreement keeps the existing type
pub fn merge_type(existing: FieldType, observed: FieldType) -> FieldType {
    match (existing, observed) {
        (a, b) if a == b => a,
        (FieldType::RichText, _) | (_, FieldType::RichText) => FieldType::RichText,
        (FieldType::Nullish, observed) => observed,
        (existing, _) => existing,
    }
}

/// Merge the required flag with whether the current record carried a value
pub fn merge_required(required: bool, present: bool) -> bool {
    required && present
}

/// Merge the unique flag with whether the current value was a duplicate
pub fn merge_unique(unique: bool, duplicate: bool) -> bool {
    unique && !duplicate
}
