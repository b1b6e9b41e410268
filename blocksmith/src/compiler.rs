//! Folds loaded content blocks into the aggregate schema.
//!
//! The loader guarantees the input list is validated, uniqueness-checked and
//! sorted by priority, and presents every block exactly once. Folding is
//! first-contribution-wins: a later (lower priority) block never silently
//! overwrites a column, palette or variant contributed by an earlier one.
//! The only sanctioned reuse is `use_existing_field`, which points several
//! blocks at one shared bare column and routes per-block configuration into
//! that block's variant overrides.

use crate::declaration::{Extras, FieldDefinition, FieldKind};
use crate::definition::{ContentBlock, ContentType};
use crate::error::{LoadError, Result};
use crate::schema::{ColumnSchema, PaletteSchema, SchemaCollection, ShowItem, TypeVariant};
use indexmap::IndexMap;

/// Variant key used for single-type child tables compiled from collections.
const CHILD_TABLE_TYPE: &str = "1";

/// Compile the ordered block list into a schema collection.
pub fn compile(blocks: &[ContentBlock]) -> Result<SchemaCollection> {
    let mut schema = SchemaCollection::new();
    for block in blocks {
        compile_block(&mut schema, block)?;
    }
    tracing::debug!(
        "Compiled {} block(s) into {} table(s)",
        blocks.len(),
        schema.len()
    );
    Ok(schema)
}

fn compile_block(schema: &mut SchemaCollection, block: &ContentBlock) -> Result<()> {
    let table_name = block.declaration.table.clone().ok_or_else(|| {
        LoadError::MissingRequiredField {
            name: block.name.as_str().to_string(),
            field: "table",
        }
    })?;
    let prefix = block.name.type_identifier();
    // The numeric type_name keys the variant only for page types. On other
    // categories it is inert passthrough data; keying by it would let two
    // unrelated blocks collide on one variant slot.
    let variant_key = match (block.content_type, block.declaration.type_name) {
        (ContentType::PageType, Some(type_name)) => type_name.to_string(),
        _ => prefix.clone(),
    };

    {
        let table = schema.table_mut(&table_name);
        if table.type_field.is_none() {
            table.type_field = block.declaration.type_field.clone();
        }
    }

    let mut overrides = IndexMap::new();
    let show_items = compile_fields(
        schema,
        &table_name,
        Some(&prefix),
        &block.declaration.fields,
        &mut overrides,
        block,
    )?;

    let icon = block.icon.path.display().to_string();
    let table = schema.table_mut(&table_name);
    if table.types.contains_key(&variant_key) {
        tracing::warn!(
            "Type '{}' in table '{}' already compiled, keeping the first contribution",
            variant_key,
            table_name
        );
        return Ok(());
    }
    table.types.insert(
        variant_key,
        TypeVariant {
            block: block.name.as_str().to_string(),
            show_items,
            column_overrides: overrides,
            icon,
        },
    );
    Ok(())
}

/// Compile a field list into show items, creating columns, palettes and
/// child tables along the way. `prefix` is `None` inside child tables, where
/// column names stay bare.
fn compile_fields(
    schema: &mut SchemaCollection,
    table: &str,
    prefix: Option<&str>,
    fields: &[FieldDefinition],
    overrides: &mut IndexMap<String, Extras>,
    block: &ContentBlock,
) -> Result<Vec<ShowItem>> {
    let mut items = Vec::new();
    for field in fields {
        match field.kind {
            FieldKind::Tab => {
                items.push(ShowItem::Tab(field.identifier().to_string()));
            }
            FieldKind::Linebreak => {
                // Only meaningful inside palettes; handled there.
                tracing::warn!(
                    "Ignoring linebreak outside a palette in '{}'",
                    block.name
                );
            }
            FieldKind::Basic => {
                // Basics are expanded before compiling; a leftover reference
                // was unknown at expansion time.
                tracing::warn!(
                    "Ignoring unexpanded basic '{}' in '{}'",
                    field.identifier(),
                    block.name
                );
            }
            FieldKind::Palette => {
                let palette_name = prefixed(prefix, field.identifier());
                let mut palette_items = Vec::new();
                for child in &field.fields {
                    match child.kind {
                        FieldKind::Linebreak => palette_items.push(ShowItem::Linebreak),
                        FieldKind::Palette | FieldKind::Tab => {
                            tracing::warn!(
                                "Ignoring nested {:?} inside palette '{}'",
                                child.kind,
                                palette_name
                            );
                        }
                        _ => {
                            let nested = compile_fields(
                                schema,
                                table,
                                prefix,
                                std::slice::from_ref(child),
                                overrides,
                                block,
                            )?;
                            palette_items.extend(nested);
                        }
                    }
                }
                schema
                    .table_mut(table)
                    .palettes
                    .entry(palette_name.clone())
                    .or_insert(PaletteSchema {
                        show_items: palette_items,
                    });
                items.push(ShowItem::Palette(palette_name));
            }
            FieldKind::Collection => {
                let column_name = prefixed(prefix, field.identifier());
                let child_table = column_name.clone();

                let parent = schema.table_mut(table);
                if !parent.columns.contains_key(&column_name) {
                    parent.columns.insert(
                        column_name.clone(),
                        ColumnSchema {
                            column_type: "inline".to_string(),
                            config: field.properties.clone(),
                            shared: false,
                            foreign_table: Some(child_table.clone()),
                        },
                    );
                }

                let mut child_overrides = IndexMap::new();
                let child_items = compile_fields(
                    schema,
                    &child_table,
                    None,
                    &field.fields,
                    &mut child_overrides,
                    block,
                )?;
                let child = schema.table_mut(&child_table);
                child.hidden = true;
                if child.label_field.is_none() {
                    child.label_field = label_field_for(field);
                }
                child
                    .types
                    .entry(CHILD_TABLE_TYPE.to_string())
                    .or_insert(TypeVariant {
                        block: block.name.as_str().to_string(),
                        show_items: child_items,
                        column_overrides: child_overrides,
                        icon: block.icon.path.display().to_string(),
                    });

                items.push(ShowItem::Field(column_name));
            }
            _ => {
                let column_name = if field.use_existing_field {
                    field.identifier().to_string()
                } else {
                    prefixed(prefix, field.identifier())
                };
                let column_type = field
                    .kind
                    .column_type()
                    .unwrap_or("input")
                    .to_string();

                let table_schema = schema.table_mut(table);
                if !table_schema.columns.contains_key(&column_name) {
                    table_schema.columns.insert(
                        column_name.clone(),
                        ColumnSchema {
                            column_type,
                            config: if field.use_existing_field {
                                Extras::new()
                            } else {
                                field.properties.clone()
                            },
                            shared: field.use_existing_field,
                            foreign_table: None,
                        },
                    );
                } else {
                    tracing::trace!(
                        "Column '{}' in table '{}' already exists, keeping the first contribution",
                        column_name,
                        table
                    );
                }
                // Shared columns carry per-block configuration as variant
                // overrides so blocks never fight over the base column.
                if field.use_existing_field && !field.properties.is_empty() {
                    overrides.insert(column_name.clone(), field.properties.clone());
                }
                if field.kind.is_searchable() {
                    table_schema.add_search_field(&column_name);
                }
                items.push(ShowItem::Field(column_name));
            }
        }
    }
    Ok(items)
}

fn prefixed(prefix: Option<&str>, identifier: &str) -> String {
    match prefix {
        Some(p) => format!("{}_{}", p, identifier),
        None => identifier.to_string(),
    }
}

/// Label column of a child table: explicit `use_as_label` property, else the
/// first text field.
fn label_field_for(collection: &FieldDefinition) -> Option<String> {
    collection
        .properties
        .get("use_as_label")
        .and_then(|v| v.as_str())
        .map(String::from)
        .or_else(|| {
            collection
                .fields
                .iter()
                .find(|f| f.kind == FieldKind::Text)
                .and_then(|f| f.identifier.clone())
        })
}
