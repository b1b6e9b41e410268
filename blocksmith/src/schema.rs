//! The aggregate schema artifact compiled from all content blocks.
//!
//! Built once per load cycle by folding loaded blocks in priority order and
//! exposed read-only to consumers. All maps preserve insertion order because
//! fold order decides which block's contributions come first in
//! order-sensitive output such as the combined search-field list.

use crate::declaration::Extras;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entry of a type variant's ordered show-item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowItem {
    /// A plain column reference.
    Field(String),
    /// A named palette reference.
    Palette(String),
    /// A tab divider labelled by its identifier.
    Tab(String),
    /// A line break inside a palette.
    Linebreak,
}

/// A compiled column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column type tag, e.g. `input`, `text`, `inline`.
    pub column_type: String,
    /// Kind-specific configuration passed through from the declaration.
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub config: Extras,
    /// Whether this is a shared column reused across blocks.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shared: bool,
    /// Child table for `inline` columns compiled from collections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_table: Option<String>,
}

/// One type variant of a table, contributed by exactly one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeVariant {
    /// Qualified name of the contributing block.
    pub block: String,
    /// Ordered editing layout.
    pub show_items: Vec<ShowItem>,
    /// Per-variant configuration of shared columns.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub column_overrides: IndexMap<String, Extras>,
    /// Resolved icon path for this variant.
    pub icon: String,
}

/// A named palette: a reusable row of columns within a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteSchema {
    pub show_items: Vec<ShowItem>,
}

/// A compiled table: columns, type variants, palettes and search fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSchema {
    /// Type discriminator field, absent for single-type tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,
    /// Child tables compiled from collections are hidden from listings.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Column used as record label, for child tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_field: Option<String>,
    pub columns: IndexMap<String, ColumnSchema>,
    pub types: IndexMap<String, TypeVariant>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub palettes: IndexMap<String, PaletteSchema>,
    /// Searchable columns in fold (priority) order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_fields: Vec<String>,
}

impl TableSchema {
    /// Append a search field once, preserving first-contribution order.
    pub(crate) fn add_search_field(&mut self, column: &str) {
        if !self.search_fields.iter().any(|f| f == column) {
            self.search_fields.push(column.to_string());
        }
    }
}

/// The fully merged schema built from all loaded definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaCollection {
    tables: IndexMap<String, TableSchema>,
}

impl SchemaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Resolve a block's compiled type variant by table and variant key.
    pub fn variant(&self, table: &str, type_identifier: &str) -> Option<&TypeVariant> {
        self.tables.get(table)?.types.get(type_identifier)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableSchema)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> &mut TableSchema {
        self.tables.entry(name.to_string()).or_default()
    }
}
