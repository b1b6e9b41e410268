//! Filesystem conventions for content block sources.
//!
//! Every installed package keeps its content blocks under a fixed layout:
//!
//! ```text
//! <package root>/content-blocks/content-elements/<block dir>/block.yaml
//! <package root>/content-blocks/page-types/<block dir>/block.yaml
//! <package root>/content-blocks/record-types/<block dir>/block.yaml
//! <package root>/content-blocks/basics/<basic>.yaml
//! ```
//!
//! Inside a block directory, public assets live under `assets/` (with an
//! optional `assets/icon.svg` or `assets/icon.png`) and translation files
//! under `language/`.

use crate::definition::ContentType;
use std::path::{Path, PathBuf};

/// Fixed file name of a block's declaration document.
pub const DECLARATION_FILE: &str = "block.yaml";

/// Folder under each package root holding all content block categories.
pub const BLOCKS_FOLDER: &str = "content-blocks";

/// Folder under [`BLOCKS_FOLDER`] holding shared basics definitions.
pub const BASICS_FOLDER: &str = "basics";

/// Public asset subfolder inside a block directory.
pub const ASSETS_FOLDER: &str = "assets";

/// Translation file subfolder inside a block directory.
pub const LANGUAGE_FOLDER: &str = "language";

/// Base name (without extension) of a block's conventional icon file.
pub const ICON_BASENAME: &str = "icon";

/// Category folder name for a content type.
pub fn category_folder(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::ContentElement => "content-elements",
        ContentType::PageType => "page-types",
        ContentType::RecordType => "record-types",
    }
}

/// Absolute path of a category folder under a package root.
pub fn category_path(root: &Path, content_type: ContentType) -> PathBuf {
    root.join(BLOCKS_FOLDER).join(category_folder(content_type))
}

/// Absolute path of the basics folder under a package root.
pub fn basics_path(root: &Path) -> PathBuf {
    root.join(BLOCKS_FOLDER).join(BASICS_FOLDER)
}

/// Logical path of a block source, relative to the package root's parent.
///
/// Used for templating lookups and asset resolution, e.g.
/// `my-package/content-blocks/content-elements/example`.
pub fn logical_path(root: &Path, content_type: ContentType, dir_name: &str) -> String {
    let package = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{}/{}/{}/{}",
        package,
        BLOCKS_FOLDER,
        category_folder(content_type),
        dir_name
    )
}
