//! Output formatting for CLI

use crate::export::{DocumentKind, ExportDocument};
use crate::migration::{CompiledPayloads, SubmitOutcome};
use crate::models::Schema;

/// Format an inferred schema as a field table per entity
pub fn format_schema_summary(schema: &Schema) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n✅ Inferred {} entit(ies):\n", schema.len()));
    for entity in &schema.entities {
        output.push_str(&format!("\n{} ({} field(s))\n", entity.name, entity.fields.len()));
        for field in &entity.fields {
            let mut flags = Vec::new();
            if field.required {
                flags.push("required");
            }
            if field.unique {
                flags.push("unique");
            }
            output.push_str(&format!("  - {}: {}", field.name, field.field_type));
            if !flags.is_empty() {
                output.push_str(&format!(" [{}]", flags.join(", ")));
            }
            output.push('\n');
            for sub_field in &field.sub_fields {
                output.push_str(&format!(
                    "      {}: {}\n",
                    sub_field.name, sub_field.field_type
                ));
            }
        }
    }

    output
}

/// Format the list of written export documents
pub fn format_export_summary(documents: &[ExportDocument]) -> String {
    let mut output = String::new();

    let components = documents
        .iter()
        .filter(|d| d.kind == DocumentKind::Component)
        .count();
    output.push_str(&format!(
        "\n✅ Exported {} collection type(s) and {} component(s):\n",
        documents.len() - components,
        components
    ));
    for document in documents {
        output.push_str(&format!("  - {}\n", document.hint));
    }

    output
}

/// Format per-entity compile counts and failures
pub fn format_compile_summary(compiled: &CompiledPayloads) -> String {
    let mut output = String::new();

    for entity in &compiled.entities {
        let attachments: usize = entity
            .records
            .iter()
            .filter_map(|r| r.payload())
            .map(|p| p.files.len())
            .sum();
        let failed = entity.records.iter().filter(|r| r.is_failed()).count();
        output.push_str(&format!(
            "  {}: {} record(s), {} attachment(s), {} failed\n",
            entity.entity,
            entity.records.len(),
            attachments,
            failed
        ));
    }

    let failures = compiled.failures();
    if failures.is_empty() {
        output.push_str(&format!(
            "\n✅ Compiled {} payload(s)\n",
            compiled.compiled_count()
        ));
    } else {
        output.push_str(&format!("\n⚠️  {} record(s) failed:\n", failures.len()));
        for (entity, index, error) in failures {
            output.push_str(&format!("  - {}[{}]: {}\n", entity, index, error));
        }
    }

    output
}

/// Format submission outcomes
pub fn format_submit_summary(outcomes: &[SubmitOutcome]) -> String {
    let mut output = String::new();

    let failed: Vec<&SubmitOutcome> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    output.push_str(&format!(
        "\n✅ Submitted {}/{} record(s)\n",
        outcomes.len() - failed.len(),
        outcomes.len()
    ));
    if !failed.is_empty() {
        output.push_str("\n⚠️  Rejected:\n");
        for outcome in failed {
            if let Err(e) = &outcome.result {
                output.push_str(&format!("  - {}[{}]: {}\n", outcome.entity, outcome.index, e));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntitySchema, Field, FieldType};

    #[test]
    fn test_format_schema_summary() {
        let mut entity = EntitySchema::new("posts");
        entity.fields = vec![
            Field::new("title", FieldType::String),
            Field::new("views", FieldType::Number).with_required(false),
        ];
        let mut schema = Schema::new();
        schema.insert_entity(entity);

        let output = format_schema_summary(&schema);
        assert!(output.contains("posts (2 field(s))"));
        assert!(output.contains("  - title: string [required, unique]\n"));
        assert!(output.contains("  - views: number\n"));
    }

    #[test]
    fn test_format_compile_summary_empty() {
        let output = format_compile_summary(&CompiledPayloads::default());
        assert!(output.contains("Compiled 0 payload(s)"));
    }
}
