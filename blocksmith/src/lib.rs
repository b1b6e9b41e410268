//! # Blocksmith
//!
//! Discovers declarative content block definitions scattered across installed
//! package roots, validates and merges them into a unified schema, caches the
//! compiled result and publishes static assets.
//!
//! ## Overview
//!
//! Each package root may ship content blocks in three categories (content
//! elements, page types, record types), one directory per block with a
//! `block.yaml` declaration. A [`BlockLoader`] walks all roots, validates
//! every declaration, enforces name uniqueness, orders blocks by priority and
//! folds them into a [`SchemaCollection`]. The loaded list is persisted under
//! a fixed cache key so subsequent loads skip discovery entirely.
//!
//! ```no_run
//! use blocksmith::BlockLoader;
//!
//! # fn main() -> Result<(), blocksmith::LoadError> {
//! let mut loader = BlockLoader::builder()
//!     .root("/srv/app/packages/site-package")
//!     .publish_to("/srv/app/public/_assets/blocks")
//!     .build()?;
//!
//! let schema = loader.load(true)?;
//! for (table, _) in schema.tables() {
//!     println!("compiled table: {table}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod basics;
pub mod cache;
pub mod compiler;
pub mod declaration;
pub mod definition;
pub mod error;
pub mod icon;
pub mod loader;
pub mod paths;
pub mod publish;
pub mod registry;
pub mod scanner;
pub mod schema;

// Re-export the primary API surface.
pub use basics::{BasicDefinition, BasicsRegistry};
pub use cache::{DefinitionCache, CACHE_KEY};
pub use declaration::{Declaration, Extras, FieldDefinition, FieldKind};
pub use definition::{BlockIcon, BlockName, ContentBlock, ContentType, IconProvider, NameError};
pub use error::{LoadError, Result};
pub use loader::{BlockLoader, BlockLoaderBuilder, CacheLookup};
pub use publish::{AssetPublisher, NoopAssetPublisher, SymlinkAssetPublisher};
pub use registry::{BlockRegistry, LanguageFileRegistry, PageTypeRegistry};
pub use schema::{ColumnSchema, PaletteSchema, SchemaCollection, ShowItem, TableSchema, TypeVariant};
