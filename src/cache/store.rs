//! File-backed fact cache.
//!
//! One file per key, `ast_cache_<key>.dat`, holding a comment header and one
//! tab-separated record per fact. Every failure is logged and degrades to a
//! miss or a no-op; nothing here aborts a run.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::facts::{decode_kind, AstFact, FactIndex};

use super::escape::{join_escaped, split_escaped};

/// Directory name used under the working directory when none is given.
pub const DEFAULT_CACHE_DIR_NAME: &str = ".vocabcheck_cache";

const FIELD_COUNT: usize = 7;
const HEADER: &str = "# vocabcheck fact cache: name, kind, source_location, signature, descriptor, target, range";

/// How the fact cache behaves for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Read and write cache files.
    #[serde(default)]
    pub enabled: bool,
    /// Remove the cache directory before indexing.
    #[serde(default)]
    pub clean: bool,
    /// Cache directory; defaults to `<cwd>/.vocabcheck_cache`.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl CacheOptions {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }
}

/// Resolve the cache directory for `options`.
pub fn resolve_cache_directory(options: &CacheOptions) -> PathBuf {
    match &options.directory {
        Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
        _ => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CACHE_DIR_NAME),
    }
}

/// Line-oriented cache of [`FactIndex`] values keyed by input hash.
#[derive(Debug, Clone)]
pub struct FactCache {
    options: CacheOptions,
    directory: PathBuf,
}

impl FactCache {
    pub fn new(options: CacheOptions) -> Self {
        let directory = resolve_cache_directory(&options);
        Self { options, directory }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File path for a cache key.
    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("ast_cache_{}.dat", key))
    }

    /// Load the index stored under `key`, or `None` on a miss.
    ///
    /// Malformed records are skipped with a warning.
    pub fn load(&self, key: &str) -> Option<FactIndex> {
        if !self.options.enabled {
            return None;
        }
        let path = self.cache_path(key);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "fact cache miss");
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read fact cache");
                return None;
            }
        };

        let mut facts = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_record(line) {
                Some(fact) => facts.push(fact),
                None => tracing::warn!(
                    path = %path.display(),
                    line = line_no + 1,
                    "ignoring malformed cache record"
                ),
            }
        }

        tracing::info!(path = %path.display(), fact_count = facts.len(), "loaded facts from cache");
        Some(FactIndex::new(facts))
    }

    /// Write `index` under `key`, replacing any previous entry.
    pub fn store(&self, key: &str, index: &FactIndex) {
        if !self.options.enabled {
            return;
        }
        let path = self.cache_path(key);
        if let Err(e) = write_records(&path, index) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write fact cache");
            return;
        }
        tracing::info!(path = %path.display(), fact_count = index.len(), "persisted fact cache");
    }

    /// Remove the whole cache directory. Runs whether or not caching is
    /// enabled.
    pub fn clean(&self) {
        if !self.directory.exists() {
            return;
        }
        match fs::remove_dir_all(&self.directory) {
            Ok(()) => {
                tracing::info!(directory = %self.directory.display(), "cleared fact cache")
            }
            Err(e) => tracing::warn!(
                directory = %self.directory.display(),
                error = %e,
                "failed to clear fact cache"
            ),
        }
    }
}

fn write_records(path: &Path, index: &FactIndex) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(fs::File::create(path)?);
    writeln!(writer, "{}", HEADER)?;
    for fact in &index.facts {
        writeln!(writer, "{}", format_record(fact))?;
    }
    writer.flush()
}

fn format_record(fact: &AstFact) -> String {
    join_escaped([
        fact.name.as_str(),
        fact.kind.tag(),
        fact.source_location.as_str(),
        fact.signature.as_str(),
        fact.descriptor.as_str(),
        fact.target(),
        fact.range.as_str(),
    ])
}

fn parse_record(line: &str) -> Option<AstFact> {
    let fields = split_escaped(line);
    if fields.len() != FIELD_COUNT {
        return None;
    }
    let [name, kind, source_location, signature, descriptor, target, range]: [String; FIELD_COUNT] =
        fields.try_into().ok()?;

    let (kind, packed_descriptor) = decode_kind(&kind, &target);
    let mut fact = AstFact::new(name, kind);
    fact.source_location = source_location;
    fact.signature = signature;
    fact.descriptor = if descriptor.is_empty() {
        packed_descriptor.unwrap_or_default()
    } else {
        descriptor
    };
    fact.range = range;
    Some(fact)
}
