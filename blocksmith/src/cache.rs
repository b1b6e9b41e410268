//! Persisted cache for the loaded content block list.
//!
//! The store is one opaque JSON blob under a fixed logical key; invalidation
//! is all-or-nothing. A persisted entry that deserializes to a non-empty
//! block list lets the loader skip discovery, validation and publishing
//! entirely. The blob is only ever written after a fully successful cold
//! load, so a broken state is never persisted.

use crate::definition::ContentBlock;
use crate::error::{LoadError, Result};
use std::fs;
use std::path::PathBuf;

/// Fixed logical key the block list is stored under.
pub const CACHE_KEY: &str = "content-blocks";

/// File-backed definition cache.
///
/// Defaults to `~/.cache/blocksmith/`; tests point it at a temp dir.
#[derive(Debug, Clone)]
pub struct DefinitionCache {
    cache_dir: PathBuf,
}

impl DefinitionCache {
    /// Create a cache in the user's cache directory, creating it if needed.
    pub fn new() -> Result<Self> {
        let cache_root = dirs::cache_dir()
            .ok_or_else(|| LoadError::Cache("failed to determine cache directory".to_string()))?;
        Ok(Self::with_dir(cache_root.join("blocksmith")))
    }

    /// Create a cache rooted at an explicit directory.
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    fn entry_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", CACHE_KEY))
    }

    /// Read the persisted block list.
    ///
    /// Returns `None` when no entry exists or the entry is empty. An entry
    /// that exists but cannot be read or parsed is an error, not a miss.
    pub fn read(&self) -> Result<Option<Vec<ContentBlock>>> {
        let path = self.entry_path();
        if !path.exists() {
            tracing::trace!("Cache miss for key '{}'", CACHE_KEY);
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| LoadError::Cache(format!("failed to read cache entry: {}", e)))?;
        let blocks: Vec<ContentBlock> = serde_json::from_str(&content)
            .map_err(|e| LoadError::Cache(format!("failed to parse cache entry: {}", e)))?;

        if blocks.is_empty() {
            tracing::trace!("Cache entry for '{}' is empty, treating as miss", CACHE_KEY);
            return Ok(None);
        }
        tracing::debug!("Cache hit for '{}' with {} block(s)", CACHE_KEY, blocks.len());
        Ok(Some(blocks))
    }

    /// Persist the full block list under the fixed key.
    pub fn write(&self, blocks: &[ContentBlock]) -> Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir)
                .map_err(|e| LoadError::Cache(format!("failed to create cache directory: {}", e)))?;
        }
        let content = serde_json::to_string(blocks)
            .map_err(|e| LoadError::Cache(format!("failed to serialize cache entry: {}", e)))?;
        fs::write(self.entry_path(), content)
            .map_err(|e| LoadError::Cache(format!("failed to write cache entry: {}", e)))?;
        tracing::debug!("Cached {} block(s) under '{}'", blocks.len(), CACHE_KEY);
        Ok(())
    }

    /// Remove the persisted entry. Returns whether an entry existed.
    pub fn clear(&self) -> Result<bool> {
        let path = self.entry_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .map_err(|e| LoadError::Cache(format!("failed to remove cache entry: {}", e)))?;
        tracing::info!("Cleared cache entry '{}'", CACHE_KEY);
        Ok(true)
    }
}
