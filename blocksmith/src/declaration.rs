//! Parsed declaration documents (`block.yaml`).
//!
//! A declaration is the structured document describing one content block:
//! its name, priority, category metadata and field list. Fields are a closed
//! tagged set validated at parse time, so downstream consumers never probe a
//! dynamic tree.

use serde::{Deserialize, Serialize};

/// Passthrough key-value data consumed by the schema compiler.
pub type Extras = serde_json::Map<String, serde_json::Value>;

/// The closed set of field kinds a declaration may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Email,
    Checkbox,
    Color,
    DateTime,
    Select,
    Link,
    Radio,
    File,
    Reference,
    Collection,
    Palette,
    Tab,
    Linebreak,
    /// Placeholder expanded from a shared basics definition before compiling.
    Basic,
}

impl FieldKind {
    /// Column type tag this kind compiles to, if it produces a column.
    ///
    /// Palettes, tabs, linebreaks and unexpanded basics are structural only.
    pub fn column_type(&self) -> Option<&'static str> {
        match self {
            FieldKind::Text => Some("input"),
            FieldKind::Textarea => Some("text"),
            FieldKind::Number => Some("number"),
            FieldKind::Email => Some("email"),
            FieldKind::Checkbox => Some("check"),
            FieldKind::Color => Some("color"),
            FieldKind::DateTime => Some("datetime"),
            FieldKind::Select => Some("select"),
            FieldKind::Link => Some("link"),
            FieldKind::Radio => Some("radio"),
            FieldKind::File => Some("file"),
            FieldKind::Reference => Some("group"),
            FieldKind::Collection => Some("inline"),
            FieldKind::Palette | FieldKind::Tab | FieldKind::Linebreak | FieldKind::Basic => None,
        }
    }

    /// Whether columns of this kind contribute to the table's search fields.
    pub fn is_searchable(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Textarea | FieldKind::Email)
    }

    /// Whether this kind carries a nested `fields` list.
    pub fn is_structural(&self) -> bool {
        matches!(self, FieldKind::Palette | FieldKind::Collection)
    }
}

/// One field descriptor within a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field identifier; absent only for linebreaks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Reuse a pre-existing shared column instead of creating a prefixed one.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub use_existing_field: bool,

    /// Kind-specific configuration passed through to the compiler.
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub properties: Extras,

    /// Nested fields, for palettes and collections.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
}

impl FieldDefinition {
    /// Validate the structural rules for this field and its children.
    ///
    /// Returns a human-readable reason on failure; the caller attaches the
    /// declaration path.
    pub fn validate(&self) -> Result<(), String> {
        match self.kind {
            FieldKind::Linebreak => {
                if self.identifier.is_some() {
                    return Err("a Linebreak field must not carry an identifier".to_string());
                }
            }
            _ => {
                if self.identifier.as_deref().is_none_or(str::is_empty) {
                    return Err(format!(
                        "a {:?} field requires a non-empty identifier",
                        self.kind
                    ));
                }
            }
        }
        if !self.fields.is_empty() && !self.kind.is_structural() {
            return Err(format!(
                "a {:?} field must not carry nested fields",
                self.kind
            ));
        }
        for child in &self.fields {
            child.validate()?;
        }
        Ok(())
    }

    /// The identifier, for fields where validation guarantees one.
    pub fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or_default()
    }
}

/// A parsed `block.yaml` document.
///
/// `table` and `type_field` are overwritten by the loader with
/// category-determined defaults for content elements and page types; authors
/// only control them for record types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Qualified name in the form `vendor/slug`.
    pub name: String,

    /// Numeric page type identifier; mandatory for page types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<i64>,

    /// Merge precedence; higher priorities are folded first.
    #[serde(default)]
    pub priority: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,

    /// Names of shared basics appended to `fields` before compiling.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub basics: Vec<String>,

    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    /// Passthrough keys consumed by the compiler.
    #[serde(flatten)]
    pub extra: Extras,
}

impl Declaration {
    /// Validate the structural rules of every declared field.
    pub fn validate_fields(&self) -> Result<(), String> {
        for field in &self.fields {
            field.validate()?;
        }
        Ok(())
    }
}
