//! Integration tests for the fact cache and the caching indexer.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vocabcheck::cache::{cache_key, CacheOptions, CachingIndexer, FactCache};
use vocabcheck::extract::{HeuristicExtractor, ScopeConfig};
use vocabcheck::facts::{AstFact, DeclarationKind, FactIndex, FactKind, MutationTag};
use vocabcheck::pipeline::{AstIndexer, FactFileIndexer, SourceSet};

fn fixture_facts() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("sample_project")
        .join("build")
        .join("ast_facts.json")
}

/// Copy the fixture facts into a scratch project and describe its sources.
fn scratch_project(dir: &Path) -> SourceSet {
    let build = dir.join("build");
    fs::create_dir_all(&build).unwrap();
    fs::copy(fixture_facts(), build.join("ast_facts.json")).unwrap();
    SourceSet {
        project_root: dir.to_path_buf(),
        build_directory: build,
        files: vec![dir.join("src/ledger.cpp"), dir.join("src/orders.cpp")],
    }
}

fn caching_indexer(cache_dir: &Path) -> CachingIndexer {
    CachingIndexer::new(
        Box::new(FactFileIndexer::new(None, Some("clang 17".to_string()))),
        CacheOptions::enabled().with_directory(cache_dir),
    )
}

#[test]
fn test_store_and_load_preserves_escaped_fields() {
    let dir = TempDir::new().unwrap();
    let cache = FactCache::new(CacheOptions::enabled().with_directory(dir.path()));

    let mut declaration = AstFact::new("Parser::Feed", FactKind::Declaration(DeclarationKind::Function));
    declaration.source_location = "src\\parser.cpp:12".to_string();
    declaration.signature = "void Parser::Feed(const char *buf,\tsize_t len)".to_string();
    declaration.descriptor = "splits on\nnewlines".to_string();
    declaration.range = "12:1-30:2".to_string();

    let mut call = AstFact::new("Parser::Feed", FactKind::call("Lexer::Push"));
    call.source_location = "src\\parser.cpp:14".to_string();

    let mut assignment = AstFact::new("Parser::Feed", FactKind::mutation(MutationTag::Assignment));
    assignment.source_location = "src\\parser.cpp:15".to_string();

    let index = FactIndex::new(vec![declaration, call, assignment]);
    cache.store("roundtrip", &index);

    let loaded = cache.load("roundtrip").expect("stored entry should load");
    assert_eq!(loaded.facts, index.facts);
}

#[test]
fn test_disabled_cache_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache");
    let cache = FactCache::new(CacheOptions::default().with_directory(&cache_dir));

    cache.store("key", &FactIndex::new(vec![AstFact::new("A", FactKind::call("B"))]));

    assert!(!cache_dir.exists());
    assert!(cache.load("key").is_none());
}

#[test]
fn test_caching_indexer_serves_second_run_from_cache() {
    let project = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let sources = scratch_project(project.path());
    let indexer = caching_indexer(cache_dir.path());

    let fresh = indexer.build_index(&sources).unwrap();
    assert_eq!(fresh.len(), 12);

    let key = cache_key("clang 17", &sources.project_root, &sources.build_directory, &sources.files);
    assert!(indexer.cache().cache_path(&key).exists());

    // The fact file is gone, so only the cache can answer.
    fs::remove_file(sources.build_directory.join("ast_facts.json")).unwrap();
    let cached = indexer.build_index(&sources).unwrap();
    assert_eq!(cached.len(), fresh.len());
    assert!(cached.facts.iter().all(|f| f.subject_in_project));

    let extractor = HeuristicExtractor::new();
    let scope = ScopeConfig::default();
    let fresh_result = extractor.extract(&fresh, &scope);
    let cached_result = extractor.extract(&cached, &scope);
    assert_eq!(cached_result.relationships, fresh_result.relationships);
    for term in &cached_result.terms {
        assert!(
            fresh_result.find_term(&term.name).is_some(),
            "{} only appears after a cache hit",
            term.name
        );
    }
}

#[test]
fn test_changed_inputs_miss_the_cache() {
    let project = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let mut sources = scratch_project(project.path());
    let indexer = caching_indexer(cache_dir.path());

    indexer.build_index(&sources).unwrap();
    fs::remove_file(sources.build_directory.join("ast_facts.json")).unwrap();

    // A new file changes the key; the miss falls through to the deleted file.
    sources.files.push(project.path().join("src/extra.cpp"));
    let err = indexer.build_index(&sources).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to load AST facts"));
}

#[test]
fn test_clean_option_removes_existing_cache() {
    let project = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let sources = scratch_project(project.path());

    caching_indexer(cache_dir.path()).build_index(&sources).unwrap();
    assert_eq!(fs::read_dir(cache_dir.path()).unwrap().count(), 1);

    let options = CacheOptions {
        enabled: false,
        clean: true,
        directory: Some(cache_dir.path().to_path_buf()),
    };
    let cleaning = CachingIndexer::new(
        Box::new(FactFileIndexer::new(None, Some("clang 17".to_string()))),
        options,
    );
    let index = cleaning.build_index(&sources).unwrap();

    assert_eq!(index.len(), 12);
    assert!(!cache_dir.path().exists());
}
