//! Registries populated during a load cycle.
//!
//! All registries are explicit state owned by the loader context and
//! constructed fresh per load cycle; nothing here is ambient or global.
//! Downstream consumers (template helpers, renderers) query them by
//! qualified name.

use crate::definition::{BlockName, ContentBlock};
use crate::error::{LoadError, Result};
use crate::paths;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Maps qualified names to loaded content blocks.
#[derive(Debug, Default)]
pub struct BlockRegistry {
    blocks: IndexMap<String, ContentBlock>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one block. The loader guarantees uniqueness beforehand.
    pub fn register(&mut self, block: ContentBlock) {
        tracing::trace!("Registered content block '{}'", block.name);
        self.blocks.insert(block.name.as_str().to_string(), block);
    }

    pub fn get(&self, name: &str) -> Option<&ContentBlock> {
        self.blocks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    /// Resolve a qualified name to its logical source path.
    ///
    /// This is the query surface templating collaborators use to locate a
    /// block's templates and assets.
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.blocks.get(name).map(|b| b.path.as_str())
    }

    /// Resolve a qualified name to its absolute source directory.
    pub fn source_dir_of(&self, name: &str) -> Option<&Path> {
        self.blocks.get(name).map(|b| b.source_dir.as_path())
    }

    /// All blocks in registration (priority) order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Maps qualified names to the translation files shipped with a block.
#[derive(Debug, Default)]
pub struct LanguageFileRegistry {
    files: IndexMap<String, Vec<PathBuf>>,
}

impl LanguageFileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a block's `language/` folder and record its files.
    ///
    /// Blocks without a language folder register an empty list; that is the
    /// common case, not an error.
    pub fn register(&mut self, block: &ContentBlock) -> Result<()> {
        let folder = block.source_dir.join(paths::LANGUAGE_FOLDER);
        let mut files = Vec::new();
        if folder.is_dir() {
            let entries =
                std::fs::read_dir(&folder).map_err(|e| LoadError::file_read(&folder, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| LoadError::file_read(&folder, e))?;
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                }
            }
            files.sort();
        }
        tracing::trace!(
            "Registered {} language file(s) for '{}'",
            files.len(),
            block.name
        );
        self.files.insert(block.name.as_str().to_string(), files);
        Ok(())
    }

    pub fn get(&self, name: &str) -> &[PathBuf] {
        self.files.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Tracks numeric page type identifiers for collision detection.
///
/// Fresh per load cycle, so the check always runs; there is no suppressed
/// validation path.
#[derive(Debug, Default)]
pub struct PageTypeRegistry {
    types: IndexMap<i64, BlockName>,
}

impl PageTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page type number for a block, failing on collision.
    pub fn register(&mut self, type_name: i64, name: &BlockName) -> Result<()> {
        if let Some(existing) = self.types.get(&type_name) {
            if existing != name {
                return Err(LoadError::ConflictingPageType {
                    type_name,
                    name: name.as_str().to_string(),
                    existing: existing.as_str().to_string(),
                });
            }
            return Ok(());
        }
        self.types.insert(type_name, name.clone());
        Ok(())
    }

    pub fn get(&self, type_name: i64) -> Option<&BlockName> {
        self.types.get(&type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
