//! Discovers content block source directories under package roots.

use crate::definition::ContentType;
use crate::error::{LoadError, Result};
use crate::paths;
use std::path::{Path, PathBuf};

/// One candidate source directory found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCandidate {
    /// Name of the immediate subdirectory.
    pub dir_name: String,
    /// Absolute path of the block directory.
    pub dir: PathBuf,
    /// Conventional location of the declaration file within it.
    pub declaration_file: PathBuf,
}

/// Scan one category folder below a package root.
///
/// Yields one candidate per immediate subdirectory, sorted by directory name
/// so discovery order is deterministic across platforms. A missing category
/// folder means the category is simply absent and yields an empty list.
pub fn scan_category(root: &Path, content_type: ContentType) -> Result<Vec<SourceCandidate>> {
    let folder = paths::category_path(root, content_type);
    if !folder.is_dir() {
        tracing::trace!(
            "No {} folder in '{}', skipping",
            content_type,
            root.display()
        );
        return Ok(Vec::new());
    }

    let entries =
        std::fs::read_dir(&folder).map_err(|e| LoadError::file_read(&folder, e))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::file_read(&folder, e))?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let declaration_file = dir.join(paths::DECLARATION_FILE);
        candidates.push(SourceCandidate {
            dir_name,
            dir,
            declaration_file,
        });
    }
    candidates.sort_by(|a, b| a.dir_name.cmp(&b.dir_name));

    tracing::debug!(
        "Found {} {} candidate(s) in '{}'",
        candidates.len(),
        content_type,
        folder.display()
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_block(root: &Path, category: &str, name: &str) {
        let dir = root.join("content-blocks").join(category).join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("block.yaml"), "name: vendor/x\n").unwrap();
    }

    #[test]
    fn test_missing_root_yields_empty() {
        let candidates =
            scan_category(Path::new("/does/not/exist"), ContentType::ContentElement).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_missing_category_folder_is_skipped() {
        let temp = TempDir::new().unwrap();
        make_block(temp.path(), "content-elements", "example");

        let candidates = scan_category(temp.path(), ContentType::PageType).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_immediate_children_only_sorted() {
        let temp = TempDir::new().unwrap();
        make_block(temp.path(), "content-elements", "zeta");
        make_block(temp.path(), "content-elements", "alpha");
        // A nested directory inside a block must not become a candidate.
        fs::create_dir_all(
            temp.path()
                .join("content-blocks/content-elements/alpha/nested"),
        )
        .unwrap();
        // Stray files are ignored.
        fs::write(
            temp.path().join("content-blocks/content-elements/README.md"),
            "",
        )
        .unwrap();

        let candidates = scan_category(temp.path(), ContentType::ContentElement).unwrap();
        let names: Vec<_> = candidates.iter().map(|c| c.dir_name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert!(candidates[0]
            .declaration_file
            .ends_with("alpha/block.yaml"));
    }
}
