//! End-to-end tests for the full load cycle: discovery, validation,
//! priority ordering, caching, publishing and schema compilation.

use blocksmith::{BlockLoader, CacheLookup, LoadError, ShowItem};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_block(root: &Path, category: &str, dir: &str, yaml: &str) {
    let block_dir = root.join("content-blocks").join(category).join(dir);
    fs::create_dir_all(&block_dir).unwrap();
    fs::write(block_dir.join("block.yaml"), yaml).unwrap();
}

fn write_assets(root: &Path, category: &str, dir: &str, file: &str) {
    let assets = root
        .join("content-blocks")
        .join(category)
        .join(dir)
        .join("assets");
    fs::create_dir_all(&assets).unwrap();
    fs::write(assets.join(file), "/* asset */").unwrap();
}

#[test_log::test]
fn priority_decides_merge_order_in_search_fields() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    // Discovered first ("example" sorts before "testblock") but also higher
    // priority; its fields must come first in order-sensitive output.
    write_block(
        &pkg,
        "content-elements",
        "example",
        r#"
name: vendor-a/example
priority: 10
fields:
  - identifier: text
    type: Text
"#,
    );
    write_block(
        &pkg,
        "content-elements",
        "testblock",
        r#"
name: vendor-b/testblock
priority: 0
fields:
  - identifier: text
    type: Text
"#,
    );

    let mut loader = BlockLoader::builder()
        .root(&pkg)
        .cache_dir(temp.path().join("cache"))
        .build()
        .unwrap();
    let schema = loader.load(false).unwrap();
    let table = schema.table("content_elements").unwrap();
    assert_eq!(
        table.search_fields,
        ["vendor_a_example_text", "vendor_b_testblock_text"]
    );
}

#[test_log::test]
fn schema_from_cache_equals_schema_from_cold_load() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    write_block(
        &pkg,
        "content-elements",
        "example",
        r#"
name: vendor/example
fields:
  - identifier: header
    type: Text
  - identifier: meta
    type: Palette
    fields:
      - identifier: date
        type: DateTime
      - type: Linebreak
      - identifier: count
        type: Number
"#,
    );
    write_block(
        &pkg,
        "page-types",
        "landing",
        "name: vendor/landing\ntype_name: 1701\n",
    );
    write_block(
        &pkg,
        "record-types",
        "faq",
        r#"
name: vendor/faq
table: faq_entries
fields:
  - identifier: question
    type: Text
"#,
    );

    let cache_dir = temp.path().join("cache");
    let cold_schema = {
        let mut loader = BlockLoader::builder()
            .root(&pkg)
            .cache_dir(&cache_dir)
            .build()
            .unwrap();
        loader.load(true).unwrap()
    };

    let mut cached = BlockLoader::builder()
        .root(&pkg)
        .cache_dir(&cache_dir)
        .build()
        .unwrap();
    assert!(matches!(
        cached.lookup(true).unwrap(),
        CacheLookup::Persisted(_)
    ));
    let cached_schema = cached.load(true).unwrap();

    assert_eq!(*cached_schema, *cold_schema);
    // Registries rebuilt from the cache answer the same queries.
    assert!(cached.registry().contains("vendor/example"));
    assert!(cached.registry().contains("vendor/faq"));
    assert_eq!(
        cached.page_types().get(1701).map(|n| n.as_str()),
        Some("vendor/landing")
    );
}

#[test_log::test]
fn stray_type_name_on_content_elements_survives_the_cache_round_trip() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    // Two content elements carrying the same numeric type_name. The number
    // is inert outside page types: it must not occupy the page type registry
    // and must not key the compiled variants.
    write_block(
        &pkg,
        "content-elements",
        "first",
        "name: vendor/first\ntype_name: 5\n",
    );
    write_block(
        &pkg,
        "content-elements",
        "second",
        "name: vendor/second\ntype_name: 5\n",
    );

    let cache_dir = temp.path().join("cache");
    let cold_schema = {
        let mut loader = BlockLoader::builder()
            .root(&pkg)
            .cache_dir(&cache_dir)
            .build()
            .unwrap();
        loader.load(true).unwrap()
    };
    let table = cold_schema.table("content_elements").unwrap();
    assert_eq!(table.types.len(), 2);
    assert!(table.types.contains_key("vendor_first"));
    assert!(table.types.contains_key("vendor_second"));

    // A fresh loader hydrates from the persisted list without tripping the
    // page type collision check.
    let mut cached = BlockLoader::builder()
        .root(&pkg)
        .cache_dir(&cache_dir)
        .build()
        .unwrap();
    assert!(matches!(
        cached.lookup(true).unwrap(),
        CacheLookup::Persisted(_)
    ));
    let cached_schema = cached.load(true).unwrap();
    assert_eq!(*cached_schema, *cold_schema);
    assert!(cached.page_types().is_empty());
}

#[test_log::test]
fn cache_bypass_recomputes_but_stays_identical() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    write_block(&pkg, "content-elements", "example", "name: vendor/example\n");

    let mut loader = BlockLoader::builder()
        .root(&pkg)
        .cache_dir(temp.path().join("cache"))
        .build()
        .unwrap();
    let first = loader.load(true).unwrap();
    let second = loader.load(false).unwrap();
    assert_eq!(*first, *second);
}

#[test_log::test]
fn failed_load_leaves_no_cache_behind() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    write_block(&pkg, "content-elements", "good", "name: vendor/good\n");
    write_block(&pkg, "page-types", "broken", "name: vendor/broken\n");

    let mut loader = BlockLoader::builder()
        .root(&pkg)
        .cache_dir(temp.path().join("cache"))
        .build()
        .unwrap();
    let err = loader.load(true).unwrap_err();
    assert!(matches!(
        err,
        LoadError::MissingRequiredField {
            field: "type_name",
            ..
        }
    ));
    assert!(loader.schema().is_none());
    assert!(matches!(loader.lookup(true).unwrap(), CacheLookup::Miss));
}

#[test_log::test]
fn publishing_runs_on_cold_load_and_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    write_block(&pkg, "content-elements", "example", "name: vendor/example\n");
    write_assets(&pkg, "content-elements", "example", "frontend.css");
    let target_root = temp.path().join("public/_assets");

    let links = |root: &Path| -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    };

    let mut loader = BlockLoader::builder()
        .root(&pkg)
        .cache_dir(temp.path().join("cache"))
        .publish_to(&target_root)
        .build()
        .unwrap();
    loader.load(false).unwrap();
    let first = links(&target_root);
    assert_eq!(first.len(), 1);

    // A second cold load re-publishes without any new mutation.
    loader.load(false).unwrap();
    assert_eq!(links(&target_root), first);

    // A warm load skips publishing entirely; the link set is untouched.
    loader.load(true).unwrap();
    assert_eq!(links(&target_root), first);
}

#[test_log::test]
fn multiple_roots_merge_into_one_schema() {
    let temp = TempDir::new().unwrap();
    let pkg_a = temp.path().join("pkg-a");
    let pkg_b = temp.path().join("pkg-b");
    write_block(
        &pkg_a,
        "content-elements",
        "hero",
        "name: vendor-a/hero\nfields:\n  - identifier: headline\n    type: Text\n",
    );
    write_block(
        &pkg_b,
        "content-elements",
        "quote",
        "name: vendor-b/quote\nfields:\n  - identifier: body\n    type: Textarea\n",
    );

    let mut loader = BlockLoader::builder()
        .roots([&pkg_a, &pkg_b])
        .cache_dir(temp.path().join("cache"))
        .build()
        .unwrap();
    let schema = loader.load(false).unwrap();
    let table = schema.table("content_elements").unwrap();
    assert_eq!(table.types.len(), 2);
    assert!(loader.registry().contains("vendor-a/hero"));
    assert!(loader.registry().contains("vendor-b/quote"));
    assert_eq!(
        loader.registry().path_of("vendor-a/hero"),
        Some("pkg-a/content-blocks/content-elements/hero")
    );
}

#[test_log::test]
fn shared_basics_work_across_roots() {
    let temp = TempDir::new().unwrap();
    let pkg_a = temp.path().join("pkg-a");
    let pkg_b = temp.path().join("pkg-b");
    // The basic ships in one package, a block in another uses it.
    let basics = pkg_a.join("content-blocks/basics");
    fs::create_dir_all(&basics).unwrap();
    fs::write(
        basics.join("seo.yaml"),
        "identifier: seo\nfields:\n  - identifier: meta_title\n    type: Text\n",
    )
    .unwrap();
    write_block(
        &pkg_b,
        "content-elements",
        "article",
        "name: vendor/article\nbasics: [seo]\n",
    );

    let mut loader = BlockLoader::builder()
        .roots([&pkg_a, &pkg_b])
        .cache_dir(temp.path().join("cache"))
        .build()
        .unwrap();
    let schema = loader.load(false).unwrap();
    let table = schema.table("content_elements").unwrap();
    assert!(table.columns.contains_key("vendor_article_meta_title"));
    let variant = schema.variant("content_elements", "vendor_article").unwrap();
    assert_eq!(
        variant.show_items,
        [ShowItem::Field("vendor_article_meta_title".to_string())]
    );
}

#[test_log::test]
fn language_files_are_registered_per_block() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    write_block(&pkg, "content-elements", "example", "name: vendor/example\n");
    let language = pkg
        .join("content-blocks/content-elements/example/language");
    fs::create_dir_all(&language).unwrap();
    fs::write(language.join("labels.yaml"), "header: Header\n").unwrap();

    let mut loader = BlockLoader::builder()
        .root(&pkg)
        .cache_dir(temp.path().join("cache"))
        .build()
        .unwrap();
    loader.load(false).unwrap();
    let files = loader.language_files().get("vendor/example");
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("language/labels.yaml"));
}
