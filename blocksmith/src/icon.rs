//! Resolves a block's icon to a path and provider tag.

use crate::definition::{BlockIcon, ContentType, IconProvider};
use crate::paths;
use std::path::{Path, PathBuf};

/// Extensions probed for a conventional icon file, in preference order.
const ICON_EXTENSIONS: [(&str, IconProvider); 3] = [
    ("svg", IconProvider::Svg),
    ("png", IconProvider::Bitmap),
    ("gif", IconProvider::Bitmap),
];

/// Built-in fallback icon identifier per category.
fn default_icon(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::ContentElement => "icons/default-content-element.svg",
        ContentType::PageType => "icons/default-page-type.svg",
        ContentType::RecordType => "icons/default-record-type.svg",
    }
}

/// Resolve the icon for a block source directory.
///
/// Looks for `assets/icon.{svg,png,gif}`; when none exists, falls back to the
/// category's built-in default with the svg provider.
pub fn resolve(source_dir: &Path, content_type: ContentType) -> BlockIcon {
    for (ext, provider) in ICON_EXTENSIONS {
        let candidate = source_dir
            .join(paths::ASSETS_FOLDER)
            .join(format!("{}.{}", paths::ICON_BASENAME, ext));
        if candidate.is_file() {
            tracing::trace!("Resolved icon '{}'", candidate.display());
            return BlockIcon {
                path: candidate,
                provider,
            };
        }
    }
    BlockIcon {
        path: PathBuf::from(default_icon(content_type)),
        provider: IconProvider::Svg,
    }
}
