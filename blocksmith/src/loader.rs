//! The content block loader: cache gateway, discovery, validation and
//! compilation in one load cycle.
//!
//! A load cycle either returns the memoized in-process schema, rehydrates
//! registries from the persisted cache, or performs a full cold load:
//! basics first, then per-category scans over every package root, parse and
//! validate, uniqueness check, stable priority sort, registration, asset
//! publishing, compilation and finally the cache write. Every validation
//! failure aborts the whole load; nothing is registered or persisted on
//! failure.

use crate::basics::BasicsRegistry;
use crate::cache::DefinitionCache;
use crate::compiler;
use crate::declaration::Declaration;
use crate::definition::{BlockName, ContentBlock, ContentType, NameError};
use crate::error::{LoadError, Result};
use crate::icon;
use crate::paths;
use crate::publish::{AssetPublisher, NoopAssetPublisher, SymlinkAssetPublisher};
use crate::registry::{BlockRegistry, LanguageFileRegistry, PageTypeRegistry};
use crate::scanner::{self, SourceCandidate};
use crate::schema::SchemaCollection;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of the cache gateway's three-state lookup.
#[derive(Debug)]
pub enum CacheLookup {
    /// A previously built in-process artifact; no I/O happened.
    Memory(Arc<SchemaCollection>),
    /// A persisted non-empty block list; discovery can be skipped.
    Persisted(Vec<ContentBlock>),
    /// Nothing cached; a full cold load is required.
    Miss,
}

/// Builder for [`BlockLoader`].
pub struct BlockLoaderBuilder {
    roots: Vec<PathBuf>,
    cache: Option<DefinitionCache>,
    publisher: Box<dyn AssetPublisher>,
    publish_root: Option<PathBuf>,
}

impl BlockLoaderBuilder {
    /// Add one package root to scan.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push(path.into());
        self
    }

    /// Add several package roots.
    pub fn roots<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Store the persisted cache below an explicit directory.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache = Some(DefinitionCache::with_dir(dir));
        self
    }

    /// Publish assets as symlinks below the given target root on cold loads.
    pub fn publish_to(mut self, target_root: impl Into<PathBuf>) -> Self {
        self.publisher = Box::new(SymlinkAssetPublisher::new());
        self.publish_root = Some(target_root.into());
        self
    }

    /// Use a custom publishing strategy.
    pub fn publisher(
        mut self,
        publisher: Box<dyn AssetPublisher>,
        target_root: impl Into<PathBuf>,
    ) -> Self {
        self.publisher = publisher;
        self.publish_root = Some(target_root.into());
        self
    }

    pub fn build(self) -> Result<BlockLoader> {
        let cache = match self.cache {
            Some(cache) => cache,
            None => DefinitionCache::new()?,
        };
        Ok(BlockLoader {
            roots: self.roots,
            cache,
            publisher: self.publisher,
            publish_root: self.publish_root,
            basics: BasicsRegistry::new(),
            registry: BlockRegistry::new(),
            language_files: LanguageFileRegistry::new(),
            page_types: PageTypeRegistry::new(),
            schema: None,
        })
    }
}

/// Loads content blocks from package roots and compiles the aggregate schema.
///
/// Owns all registries as explicit per-load state; consumers query them
/// through the accessors instead of any ambient lookup.
pub struct BlockLoader {
    roots: Vec<PathBuf>,
    cache: DefinitionCache,
    publisher: Box<dyn AssetPublisher>,
    publish_root: Option<PathBuf>,
    basics: BasicsRegistry,
    registry: BlockRegistry,
    language_files: LanguageFileRegistry,
    page_types: PageTypeRegistry,
    schema: Option<Arc<SchemaCollection>>,
}

impl BlockLoader {
    pub fn builder() -> BlockLoaderBuilder {
        BlockLoaderBuilder {
            roots: Vec::new(),
            cache: None,
            publisher: Box::new(NoopAssetPublisher::new()),
            publish_root: None,
        }
    }

    /// Load the aggregate schema, using caches when `allow_cache` is set.
    pub fn load(&mut self, allow_cache: bool) -> Result<Arc<SchemaCollection>> {
        match self.lookup(allow_cache)? {
            CacheLookup::Memory(schema) => {
                tracing::trace!("Returning memoized schema");
                Ok(schema)
            }
            CacheLookup::Persisted(blocks) => self.hydrate(blocks),
            CacheLookup::Miss => self.cold_load(),
        }
    }

    /// The cache gateway: decide which of the three load paths applies.
    pub fn lookup(&self, allow_cache: bool) -> Result<CacheLookup> {
        if !allow_cache {
            return Ok(CacheLookup::Miss);
        }
        if let Some(schema) = &self.schema {
            return Ok(CacheLookup::Memory(schema.clone()));
        }
        match self.cache.read()? {
            Some(blocks) => Ok(CacheLookup::Persisted(blocks)),
            None => Ok(CacheLookup::Miss),
        }
    }

    /// Rebuild registries and schema from the persisted block list.
    ///
    /// Discovery, validation and publishing are skipped entirely: the list
    /// was fully validated before it was ever written.
    fn hydrate(&mut self, blocks: Vec<ContentBlock>) -> Result<Arc<SchemaCollection>> {
        tracing::debug!("Hydrating {} block(s) from the persisted cache", blocks.len());
        self.reset_registries();
        for block in &blocks {
            if block.content_type == ContentType::PageType {
                if let Some(type_name) = block.declaration.type_name {
                    self.page_types.register(type_name, &block.name)?;
                }
            }
            self.language_files.register(block)?;
            self.registry.register(block.clone());
        }
        let schema = Arc::new(compiler::compile(&blocks)?);
        self.schema = Some(schema.clone());
        Ok(schema)
    }

    /// Full cold load over every package root.
    fn cold_load(&mut self) -> Result<Arc<SchemaCollection>> {
        let roots = self.roots.clone();
        tracing::debug!("Cold load across {} package root(s)", roots.len());
        self.reset_registries();

        // Basics must be complete before any category scan.
        self.basics = BasicsRegistry::new();
        for root in &roots {
            self.basics.load_from_root(root)?;
        }

        let mut blocks = Vec::new();
        for root in &roots {
            for content_type in ContentType::ALL {
                blocks.extend(self.load_category(root, content_type)?);
            }
        }

        check_for_uniqueness(&blocks)?;
        // Stable sort: equal priorities keep discovery order, which decides
        // who wins in order-sensitive merge output.
        blocks.sort_by_key(|b| std::cmp::Reverse(b.priority()));

        for block in &blocks {
            self.language_files.register(block)?;
            self.registry.register(block.clone());
        }

        if let Some(target_root) = self.publish_root.clone() {
            self.publisher.publish(&blocks, &target_root)?;
        }

        let schema = Arc::new(compiler::compile(&blocks)?);
        self.cache.write(&blocks)?;
        self.schema = Some(schema.clone());
        Ok(schema)
    }

    fn reset_registries(&mut self) {
        self.registry = BlockRegistry::new();
        self.language_files = LanguageFileRegistry::new();
        self.page_types = PageTypeRegistry::new();
    }

    fn load_category(
        &mut self,
        root: &Path,
        content_type: ContentType,
    ) -> Result<Vec<ContentBlock>> {
        let mut blocks = Vec::new();
        for candidate in scanner::scan_category(root, content_type)? {
            blocks.push(self.load_candidate(root, content_type, &candidate)?);
        }
        Ok(blocks)
    }

    fn load_candidate(
        &mut self,
        root: &Path,
        content_type: ContentType,
        candidate: &SourceCandidate,
    ) -> Result<ContentBlock> {
        let file = &candidate.declaration_file;
        let content = std::fs::read_to_string(file)
            .map_err(|e| LoadError::malformed(file, format!("cannot read declaration: {}", e)))?;

        let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(&content)
            .map_err(|e| LoadError::malformed(file, e.to_string()))?;
        if value.as_mapping().is_none_or(|m| m.is_empty()) {
            return Err(LoadError::malformed(
                file,
                "declaration must be a non-empty mapping",
            ));
        }
        let raw_name = value
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let name = BlockName::new(raw_name).map_err(|e| match e {
            NameError::Shape(value) => LoadError::malformed(
                file,
                format!("cannot find a valid name in format \"vendor/slug\", got '{}'", value),
            ),
            NameError::Segment { segment, value } => {
                LoadError::InvalidIdentifier { segment, value }
            }
        })?;

        let mut declaration: Declaration = serde_yaml_ng::from_str(&content)
            .map_err(|e| LoadError::malformed(file, e.to_string()))?;
        declaration
            .validate_fields()
            .map_err(|reason| LoadError::malformed(file, reason))?;

        match content_type {
            ContentType::PageType => {
                let type_name = declaration.type_name.ok_or_else(|| {
                    LoadError::MissingRequiredField {
                        name: name.as_str().to_string(),
                        field: "type_name",
                    }
                })?;
                self.page_types.register(type_name, &name)?;
            }
            ContentType::RecordType => {
                if declaration.table.is_none() {
                    return Err(LoadError::MissingRequiredField {
                        name: name.as_str().to_string(),
                        field: "table",
                    });
                }
            }
            ContentType::ContentElement => {}
        }

        // Table and type field are never author-controlled for content
        // elements and page types.
        if let Some(table) = content_type.default_table() {
            declaration.table = Some(table.to_string());
        }
        if let Some(type_field) = content_type.default_type_field() {
            declaration.type_field = Some(type_field.to_string());
        }

        self.basics.apply(&mut declaration);

        self.finalize(name, content_type, declaration, root, candidate)
    }

    /// Build the immutable block, re-checking the source directory exists.
    fn finalize(
        &self,
        name: BlockName,
        content_type: ContentType,
        declaration: Declaration,
        root: &Path,
        candidate: &SourceCandidate,
    ) -> Result<ContentBlock> {
        if !candidate.dir.exists() {
            return Err(LoadError::SourceNotFound {
                name: name.as_str().to_string(),
                path: candidate.dir.clone(),
            });
        }
        let icon = icon::resolve(&candidate.dir, content_type);
        let path = paths::logical_path(root, content_type, &candidate.dir_name);
        tracing::debug!("Loaded {} '{}'", content_type, name);
        Ok(ContentBlock {
            name,
            content_type,
            declaration,
            icon,
            path,
            source_dir: candidate.dir.clone(),
        })
    }

    /// Registry of loaded blocks, in priority order.
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Registry of translation files per block.
    pub fn language_files(&self) -> &LanguageFileRegistry {
        &self.language_files
    }

    /// Registry of numeric page types seen during the last load.
    pub fn page_types(&self) -> &PageTypeRegistry {
        &self.page_types
    }

    /// The compiled schema, if a load has completed.
    pub fn schema(&self) -> Option<&Arc<SchemaCollection>> {
        self.schema.as_ref()
    }

    /// The persisted cache backing this loader.
    pub fn cache(&self) -> &DefinitionCache {
        &self.cache
    }
}

/// Verify no two blocks share a qualified name.
fn check_for_uniqueness(blocks: &[ContentBlock]) -> Result<()> {
    let mut seen = HashSet::new();
    for block in blocks {
        if !seen.insert(block.name.as_str()) {
            return Err(LoadError::DuplicateName {
                name: block.name.as_str().to_string(),
            });
        }
    }
    Ok(())
}
