//! Editable variable skeletons.
//!
//! A skeleton is the TOML document a user fills in before a template is
//! rendered: one empty scalar slot per plain variable, a `[table]` per
//! record-shaped variable, and a `[[array-of-tables]]` per loop-iterated
//! collection. Scalars come first, then tables, then arrays, each group
//! sorted by variable name so repeated runs produce identical documents.

use crate::error::{Result, StencilError};
use crate::template::inspect::Inspection;
use crate::template::{inspect, parser};
use crate::ui::UserInterface;

const HEADER_COMMENT: &str = "# Update the values below and save to render the template.";

/// Build the skeleton document for a template, merging an optional preset of
/// concrete values over the empty slots. Returns an empty string when the
/// template has no free variables at all.
pub fn build_skeleton(source: &str, preset: Option<&toml::Table>) -> Result<String> {
    let template =
        parser::parse(source).map_err(|message| StencilError::TemplateSyntax { message })?;
    let inspection = inspect(&template);

    if inspection.free.is_empty() {
        return Ok(String::new());
    }

    let mut doc = build_document(&inspection);
    if let Some(preset) = preset {
        apply_preset(&mut doc, preset);
    }

    let body = serialize_document(&doc)?;
    Ok(format!("{}\n{}", HEADER_COMMENT, body.trim_end()).trim().to_string() + "\n")
}

/// Collect a resolved context for a template: build the skeleton, hand it to
/// the user's editor, and parse what comes back. When the template needs no
/// input the preset (or an empty table) is used directly with no editor
/// session.
pub fn collect_context(
    ui: &mut dyn UserInterface,
    source: &str,
    preset: Option<toml::Table>,
) -> Result<toml::Table> {
    let seed = build_skeleton(source, preset.as_ref())?;
    if seed.trim().is_empty() {
        return Ok(preset.unwrap_or_default());
    }

    match ui.edit(&seed, ".toml")? {
        None => Err(StencilError::EditorClosed { what: "variables" }),
        Some(edited) => toml::from_str(&edited).map_err(|e| StencilError::InvalidToml {
            message: e.to_string(),
        }),
    }
}

fn build_document(inspection: &Inspection) -> toml::Table {
    let mut doc = toml::Table::new();

    // Free variables classified as list fields never show up as scalars or
    // tables; the array classification wins.
    let mut scalar_vars = Vec::new();
    let mut table_vars = Vec::new();
    for name in &inspection.free {
        if inspection.list_fields.contains_key(name) {
            continue;
        }
        match inspection.nested_fields.get(name) {
            Some(attrs) => table_vars.push((name, attrs)),
            None => scalar_vars.push(name),
        }
    }

    for var in scalar_vars {
        doc.insert(var.clone(), toml::Value::String(String::new()));
    }

    for (var, attrs) in table_vars {
        let mut table = toml::Table::new();
        for attr in attrs {
            table.insert(attr.clone(), toml::Value::String(String::new()));
        }
        doc.insert(var.clone(), toml::Value::Table(table));
    }

    for (var, attrs) in &inspection.list_fields {
        let mut entry = toml::Table::new();
        if attrs.is_empty() {
            entry.insert("value".to_string(), toml::Value::String(String::new()));
        } else {
            for attr in attrs {
                entry.insert(attr.clone(), toml::Value::String(String::new()));
            }
        }
        doc.insert(
            var.clone(),
            toml::Value::Array(vec![toml::Value::Table(entry)]),
        );
    }

    doc
}

/// Merge preset values into the skeleton. Tables merge recursively, sequences
/// replace an existing array-of-tables wholesale (rebuilding each row), and
/// anything else overwrites the slot directly.
fn apply_preset(target: &mut toml::Table, preset: &toml::Table) {
    for (key, value) in preset {
        match value {
            toml::Value::Table(preset_table) => match target.get_mut(key) {
                Some(toml::Value::Table(existing)) => apply_preset(existing, preset_table),
                _ => {
                    let mut table = toml::Table::new();
                    apply_preset(&mut table, preset_table);
                    target.insert(key.clone(), toml::Value::Table(table));
                }
            },
            toml::Value::Array(sequence) => {
                if is_array_of_tables(target.get(key)) {
                    let mut rows = Vec::with_capacity(sequence.len());
                    for item in sequence {
                        match item {
                            toml::Value::Table(item_table) => {
                                let mut row = toml::Table::new();
                                apply_preset(&mut row, item_table);
                                rows.push(toml::Value::Table(row));
                            }
                            other => rows.push(other.clone()),
                        }
                    }
                    target.insert(key.clone(), toml::Value::Array(rows));
                } else {
                    target.insert(key.clone(), value.clone());
                }
            }
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

fn is_array_of_tables(value: Option<&toml::Value>) -> bool {
    match value {
        Some(toml::Value::Array(items)) => {
            !items.is_empty() && items.iter().all(|i| matches!(i, toml::Value::Table(_)))
        }
        _ => false,
    }
}

/// Serialize with scalar-valued keys ahead of `[table]`/`[[array]]` sections;
/// a preset can overwrite a table slot with a scalar, and TOML forbids plain
/// keys after a section header.
fn serialize_document(doc: &toml::Table) -> Result<String> {
    let mut ordered = toml::Table::new();
    let mut sections = toml::Table::new();

    for (key, value) in doc {
        let is_section =
            matches!(value, toml::Value::Table(_)) || is_array_of_tables(Some(value));
        if is_section {
            sections.insert(key.clone(), value.clone());
        } else {
            ordered.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in sections {
        ordered.insert(key, value);
    }

    toml::to_string(&ordered).map_err(|e| StencilError::Other(e.into()))
}
