//! Shared "basics": reusable field groups referenced by declarations.
//!
//! Basics live as standalone YAML files under `content-blocks/basics/` in any
//! package root and are loaded once per cold load, before any category scan.
//! A declaration pulls them in two ways: a top-level `basics:` list appends
//! the named groups after its own fields, and an inline field of kind `Basic`
//! is replaced in place by the group's fields.

use crate::declaration::{Declaration, FieldDefinition, FieldKind};
use crate::error::{LoadError, Result};
use crate::paths;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One named reusable field group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicDefinition {
    pub identifier: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// All basics discovered across package roots, keyed by identifier.
///
/// Constructed fresh per load cycle. Registering the same identifier twice
/// overwrites the earlier entry.
#[derive(Debug, Default)]
pub struct BasicsRegistry {
    basics: IndexMap<String, BasicDefinition>,
}

impl BasicsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.yaml` file in a root's basics folder.
    ///
    /// A missing basics folder is not an error.
    pub fn load_from_root(&mut self, root: &Path) -> Result<()> {
        let folder = paths::basics_path(root);
        if !folder.is_dir() {
            return Ok(());
        }

        let entries =
            std::fs::read_dir(&folder).map_err(|e| LoadError::file_read(&folder, e))?;
        let mut files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e == "yaml" || e == "yml")
            })
            .collect();
        files.sort();

        for file in files {
            let content =
                std::fs::read_to_string(&file).map_err(|e| LoadError::file_read(&file, e))?;
            let basic: BasicDefinition = serde_yaml_ng::from_str(&content)
                .map_err(|e| LoadError::malformed(&file, e.to_string()))?;
            for field in &basic.fields {
                field
                    .validate()
                    .map_err(|reason| LoadError::malformed(&file, reason))?;
            }
            self.register(basic);
        }
        Ok(())
    }

    /// Register one basic, overwriting any earlier one with the same name.
    pub fn register(&mut self, basic: BasicDefinition) {
        tracing::debug!("Registered basic '{}'", basic.identifier);
        if self
            .basics
            .insert(basic.identifier.clone(), basic)
            .is_some()
        {
            tracing::debug!("Basic overwrote an earlier registration");
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&BasicDefinition> {
        self.basics.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.basics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basics.is_empty()
    }

    /// Expand a declaration's basics references into concrete fields.
    ///
    /// Inline `Basic` fields are replaced in place; the top-level `basics:`
    /// list is appended afterwards. Unknown references are logged and
    /// dropped, matching how authors iterate on declarations before the
    /// referenced basic ships.
    pub fn apply(&self, declaration: &mut Declaration) {
        let mut expanded = Vec::with_capacity(declaration.fields.len());
        for field in declaration.fields.drain(..) {
            if field.kind == FieldKind::Basic {
                match self.get(field.identifier()) {
                    Some(basic) => expanded.extend(basic.fields.iter().cloned()),
                    None => {
                        tracing::warn!(
                            "Unknown basic '{}' referenced by '{}'",
                            field.identifier(),
                            declaration.name
                        );
                    }
                }
            } else {
                expanded.push(field);
            }
        }
        for name in &declaration.basics {
            match self.get(name) {
                Some(basic) => expanded.extend(basic.fields.iter().cloned()),
                None => {
                    tracing::warn!(
                        "Unknown basic '{}' listed by '{}'",
                        name,
                        declaration.name
                    );
                }
            }
        }
        declaration.fields = expanded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn text_field(identifier: &str) -> FieldDefinition {
        FieldDefinition {
            identifier: Some(identifier.to_string()),
            kind: FieldKind::Text,
            use_existing_field: false,
            properties: Default::default(),
            fields: Vec::new(),
        }
    }

    fn registry_with(identifier: &str, fields: Vec<FieldDefinition>) -> BasicsRegistry {
        let mut registry = BasicsRegistry::new();
        registry.register(BasicDefinition {
            identifier: identifier.to_string(),
            fields,
        });
        registry
    }

    #[test]
    fn test_load_from_root() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("content-blocks/basics");
        fs::create_dir_all(&folder).unwrap();
        fs::write(
            folder.join("seo.yaml"),
            r#"
identifier: seo
fields:
  - identifier: meta_title
    type: Text
  - identifier: meta_description
    type: Textarea
"#,
        )
        .unwrap();

        let mut registry = BasicsRegistry::new();
        registry.load_from_root(temp.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("seo").unwrap().fields.len(), 2);
    }

    #[test]
    fn test_invalid_basic_fails() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("content-blocks/basics");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("broken.yaml"), "identifier: [nope\n").unwrap();

        let mut registry = BasicsRegistry::new();
        assert!(matches!(
            registry.load_from_root(temp.path()),
            Err(LoadError::MalformedDeclaration { .. })
        ));
    }

    #[test]
    fn test_apply_appends_listed_basics() {
        let registry = registry_with("seo", vec![text_field("meta_title")]);
        let mut declaration: Declaration =
            serde_yaml_ng::from_str("name: vendor/example\nbasics: [seo]\n").unwrap();
        declaration.fields = vec![text_field("header")];

        registry.apply(&mut declaration);
        let ids: Vec<_> = declaration.fields.iter().map(|f| f.identifier()).collect();
        assert_eq!(ids, ["header", "meta_title"]);
    }

    #[test]
    fn test_apply_replaces_inline_basic() {
        let registry = registry_with("dates", vec![text_field("start"), text_field("end")]);
        let mut declaration: Declaration =
            serde_yaml_ng::from_str("name: vendor/example\n").unwrap();
        declaration.fields = vec![
            text_field("header"),
            FieldDefinition {
                identifier: Some("dates".to_string()),
                kind: FieldKind::Basic,
                use_existing_field: false,
                properties: Default::default(),
                fields: Vec::new(),
            },
            text_field("footer"),
        ];

        registry.apply(&mut declaration);
        let ids: Vec<_> = declaration.fields.iter().map(|f| f.identifier()).collect();
        assert_eq!(ids, ["header", "start", "end", "footer"]);
    }

    #[test]
    fn test_unknown_basic_is_dropped() {
        let registry = BasicsRegistry::new();
        let mut declaration: Declaration =
            serde_yaml_ng::from_str("name: vendor/example\nbasics: [missing]\n").unwrap();
        declaration.fields = vec![FieldDefinition {
            identifier: Some("missing".to_string()),
            kind: FieldKind::Basic,
            use_existing_field: false,
            properties: Default::default(),
            fields: Vec::new(),
        }];

        registry.apply(&mut declaration);
        assert!(declaration.fields.is_empty());
    }
}
