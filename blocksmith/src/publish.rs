//! Publishes block asset folders into a shared output location.
//!
//! The target directory name is a content hash of the qualified block name,
//! so the mapping is deterministic and collision free. Publishing is
//! idempotent: an existing target is left alone. The trait exists so that
//! environments without symlink support (or deployment modes where
//! publishing is handled elsewhere) can swap in a different strategy.

use crate::definition::ContentBlock;
use crate::error::{LoadError, Result};
use crate::paths;
use std::path::Path;

/// Strategy for materializing block assets below a target root.
pub trait AssetPublisher {
    /// Publish every block's `assets/` folder. Must be idempotent.
    fn publish(&self, blocks: &[ContentBlock], target_root: &Path) -> Result<()>;
}

/// Hashed target directory name for a block.
pub fn asset_dir_name(block: &ContentBlock) -> String {
    format!("{:x}", md5::compute(block.name.as_str()))
}

/// Publishes assets as relative symbolic links, one per block.
#[derive(Debug, Default)]
pub struct SymlinkAssetPublisher;

impl SymlinkAssetPublisher {
    pub fn new() -> Self {
        Self
    }
}

impl AssetPublisher for SymlinkAssetPublisher {
    fn publish(&self, blocks: &[ContentBlock], target_root: &Path) -> Result<()> {
        if !target_root.exists() {
            std::fs::create_dir_all(target_root)
                .map_err(|e| LoadError::directory_creation(target_root, e))?;
        }
        for block in blocks {
            let assets = block.source_dir.join(paths::ASSETS_FOLDER);
            if !assets.is_dir() {
                tracing::trace!("'{}' ships no assets, skipping", block.name);
                continue;
            }
            let target = target_root.join(asset_dir_name(block));
            // symlink_metadata also detects dangling links left by a
            // previous deployment.
            if target.symlink_metadata().is_ok() {
                tracing::trace!("Assets of '{}' already published", block.name);
                continue;
            }
            let link_source = pathdiff::diff_paths(&assets, target_root)
                .unwrap_or_else(|| assets.clone());
            symlink_dir(&link_source, &target).map_err(|e| LoadError::Publish {
                path: target.clone(),
                source: e,
            })?;
            tracing::debug!(
                "Published assets of '{}' to '{}'",
                block.name,
                target.display()
            );
        }
        Ok(())
    }
}

#[cfg(unix)]
fn symlink_dir(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn symlink_dir(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(source, target)
}

/// Publisher for environments where asset publishing is disabled.
#[derive(Debug, Default)]
pub struct NoopAssetPublisher;

impl NoopAssetPublisher {
    pub fn new() -> Self {
        Self
    }
}

impl AssetPublisher for NoopAssetPublisher {
    fn publish(&self, _blocks: &[ContentBlock], _target_root: &Path) -> Result<()> {
        Ok(())
    }
}
