//! Identifier naming heuristics for generated content types

/// Derive a singular name from a plural entity name
///
/// `...ies` becomes `...y`; otherwise a single trailing `s` is stripped.
/// Irregular plurals are not handled.
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    name.strip_suffix('s').unwrap_or(name).to_string()
}

/// Human-readable display name: the input with its first letter capitalized
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reference identifier of the component generated for a field (`<field>.<field>`)
pub fn component_uid(field: &str) -> String {
    format!("{}.{}", field, field)
}

/// Collection name of the component generated for a field
pub fn component_collection_name(field: &str) -> String {
    format!("components_{}", component_uid(field))
}
