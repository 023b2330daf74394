//! Indexer wrapper that serves facts from the cache when the inputs match.

use std::path::Path;

use crate::facts::{FactIndex, TargetScope};
use crate::pipeline::{AstIndexer, SourceSet};

use super::key::cache_key;
use super::store::{CacheOptions, FactCache};

/// Wraps another [`AstIndexer`] with a [`FactCache`].
pub struct CachingIndexer {
    inner: Box<dyn AstIndexer>,
    cache: FactCache,
}

impl CachingIndexer {
    pub fn new(inner: Box<dyn AstIndexer>, options: CacheOptions) -> Self {
        Self {
            inner,
            cache: FactCache::new(options),
        }
    }

    pub fn cache(&self) -> &FactCache {
        &self.cache
    }
}

impl AstIndexer for CachingIndexer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn toolchain_version(&self) -> String {
        self.inner.toolchain_version()
    }

    fn build_index(&self, sources: &SourceSet) -> anyhow::Result<FactIndex> {
        if self.cache.options().clean {
            self.cache.clean();
        }
        if !self.cache.is_enabled() {
            return self.inner.build_index(sources);
        }

        let toolchain = self.inner.toolchain_version();
        let key = cache_key(
            &toolchain,
            &sources.project_root,
            &sources.build_directory,
            &sources.files,
        );

        if let Some(index) = self.cache.load(&key) {
            tracing::info!(key = %key, toolchain = %toolchain, "fact cache hit");
            return Ok(restore_scope(index, &sources.project_root));
        }

        tracing::info!(key = %key, toolchain = %toolchain, "fact cache miss");
        let index = self.inner.build_index(sources)?;
        self.cache.store(&key, &index);
        Ok(index)
    }
}

/// Re-derive the scope data the cache format does not keep.
///
/// A subject is in the project when its source file is relative or lives
/// under `project_root`. Target scope becomes [`TargetScope::Unknown`], so
/// targets are checked against project declarations.
pub fn restore_scope(mut index: FactIndex, project_root: &Path) -> FactIndex {
    for fact in &mut index.facts {
        fact.subject_in_project = location_in_project(&fact.source_location, project_root);
        fact.target_scope = TargetScope::Unknown;
    }
    index.project_root = project_root.to_string_lossy().into_owned();
    index
}

/// File part of a `path[:line[:column]]` location.
fn location_file(location: &str) -> &str {
    let mut path = location.trim();
    while let Some((head, tail)) = path.rsplit_once(':') {
        if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
            break;
        }
        path = head;
    }
    path
}

fn location_in_project(location: &str, project_root: &Path) -> bool {
    let file = location_file(location);
    if file.is_empty() {
        return false;
    }
    let path = Path::new(file);
    path.is_relative() || path.starts_with(project_root)
}
