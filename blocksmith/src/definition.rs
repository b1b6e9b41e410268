//! Core content block types

use crate::declaration::Declaration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Error produced when a qualified block name fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is too short or not shaped like `vendor/slug`.
    #[error("'{0}' is not a valid name in format \"vendor/slug\"")]
    Shape(String),

    /// One of the two segments violates the naming rule.
    #[error("invalid {segment} '{value}': must be lowercase and consist of words separated by '-'")]
    Segment {
        segment: &'static str,
        value: String,
    },
}

/// A validated qualified block name in the form `vendor/slug`.
///
/// Both segments are validated independently: lowercase ascii words separated
/// by hyphens, starting with a letter. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockName {
    full: String,
    slash: usize,
}

impl BlockName {
    /// Create a new BlockName, validating shape and both segments.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let full = name.into();
        if full.len() < 3 || full.matches('/').count() != 1 {
            return Err(NameError::Shape(full));
        }
        let slash = full.find('/').unwrap_or(0);
        let (vendor, slug) = (&full[..slash], &full[slash + 1..]);
        if vendor.is_empty() || slug.is_empty() {
            return Err(NameError::Shape(full));
        }
        for (segment, value) in [("vendor", vendor), ("slug", slug)] {
            if !Self::segment_is_valid(value) {
                return Err(NameError::Segment {
                    segment,
                    value: value.to_string(),
                });
            }
        }
        Ok(Self { full, slash })
    }

    /// Whether a single segment satisfies the lowercase-hyphenated-word rule.
    pub fn segment_is_valid(segment: &str) -> bool {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_ascii_lowercase() => {}
            _ => return false,
        }
        segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    /// The full qualified name.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// The vendor segment.
    pub fn vendor(&self) -> &str {
        &self.full[..self.slash]
    }

    /// The slug segment.
    pub fn slug(&self) -> &str {
        &self.full[self.slash + 1..]
    }

    /// Identifier used for compiled schema entries: `/` and `-` become `_`.
    pub fn type_identifier(&self) -> String {
        self.full.replace(['/', '-'], "_")
    }
}

impl std::fmt::Display for BlockName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full)
    }
}

impl TryFrom<String> for BlockName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlockName> for String {
    fn from(name: BlockName) -> Self {
        name.full
    }
}

/// The category a content block belongs to.
///
/// Fixed at creation and determines the default table and type field the
/// loader enforces regardless of author input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// A renderable content element.
    ContentElement,
    /// A page type, identified by a mandatory numeric `type_name`.
    PageType,
    /// A standalone record type with an author-declared table.
    RecordType,
}

impl ContentType {
    /// All categories, in scan order.
    pub const ALL: [ContentType; 3] = [
        ContentType::ContentElement,
        ContentType::PageType,
        ContentType::RecordType,
    ];

    /// The fixed table this category compiles into, if category-determined.
    pub fn default_table(&self) -> Option<&'static str> {
        match self {
            ContentType::ContentElement => Some("content_elements"),
            ContentType::PageType => Some("pages"),
            ContentType::RecordType => None,
        }
    }

    /// The fixed type discriminator field, if category-determined.
    pub fn default_type_field(&self) -> Option<&'static str> {
        match self {
            ContentType::ContentElement => Some("element_type"),
            ContentType::PageType => Some("page_type"),
            ContentType::RecordType => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::ContentElement => write!(f, "content-element"),
            ContentType::PageType => write!(f, "page-type"),
            ContentType::RecordType => write!(f, "record-type"),
        }
    }
}

/// Which mechanism renders a block's icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconProvider {
    /// Vector icon, rendered from an SVG file.
    Svg,
    /// Raster icon (png, gif).
    Bitmap,
}

/// A resolved icon: file path plus provider tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockIcon {
    pub path: PathBuf,
    pub provider: IconProvider,
}

/// One loaded content block definition.
///
/// Created once per discovered source directory during a cold load, immutable
/// afterward, serializable to a flat record for the persisted cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Globally unique qualified name.
    pub name: BlockName,
    /// Category, fixed at creation.
    pub content_type: ContentType,
    /// Parsed and basics-expanded declaration.
    pub declaration: Declaration,
    /// Resolved icon.
    pub icon: BlockIcon,
    /// Logical path used for asset resolution and templating lookups.
    pub path: String,
    /// Absolute source directory on disk.
    pub source_dir: PathBuf,
}

impl ContentBlock {
    /// Merge precedence declared in the declaration (default 0).
    pub fn priority(&self) -> i64 {
        self.declaration.priority
    }
}
