//! Source discovery by walking the project directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::config::AnalysisConfig;

use super::traits::{SourceAcquirer, SourceSet};

/// Extensions treated as C/C++ sources and headers.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cxx", "cpp", "h", "hh", "hpp", "hxx", "ixx"];

/// Collects C/C++ files under the project root.
///
/// Hidden directories, the build directory and `ignored_paths` are skipped.
/// An ignored path containing glob metacharacters is matched against the
/// root-relative path; anything else is a root-relative prefix.
#[derive(Debug, Clone, Default)]
pub struct DirectorySourceAcquirer;

impl DirectorySourceAcquirer {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAcquirer for DirectorySourceAcquirer {
    fn name(&self) -> &str {
        "directory"
    }

    fn acquire(&self, config: &AnalysisConfig) -> anyhow::Result<SourceSet> {
        let root = config
            .root
            .canonicalize()
            .with_context(|| format!("cannot access project root {}", config.root.display()))?;
        if !root.is_dir() {
            anyhow::bail!("project root is not a directory: {}", root.display());
        }

        let build_directory = resolve_under(&root, &config.build);
        let ignored = IgnoredPaths::new(&root, &config.ignored_paths)?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&root).follow_links(false).into_iter();
        for entry in walker.filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let path = e.path();
            if e.file_type().is_dir() {
                let hidden = e.file_name().to_string_lossy().starts_with('.');
                if hidden || path == build_directory {
                    return false;
                }
            }
            !ignored.matches(path)
        }) {
            let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();

        tracing::debug!(root = %root.display(), file_count = files.len(), "discovered sources");
        Ok(SourceSet {
            project_root: root,
            build_directory,
            files,
        })
    }
}

/// Returns true if the path has a C/C++ source or header extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Join a relative path onto `root`, canonicalizing when it exists.
fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_relative() {
        root.join(path)
    } else {
        path.to_path_buf()
    };
    joined.canonicalize().unwrap_or(joined)
}

struct IgnoredPaths {
    root: PathBuf,
    globs: GlobSet,
    prefixes: Vec<PathBuf>,
}

impl IgnoredPaths {
    fn new(root: &Path, patterns: &[String]) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut prefixes = Vec::new();
        for pattern in patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            if pattern.contains(['*', '?', '[', '{']) {
                let glob = Glob::new(pattern)
                    .map_err(|e| anyhow::anyhow!("invalid ignored_paths pattern {:?}: {}", pattern, e))?;
                builder.add(glob);
            } else {
                prefixes.push(resolve_under(root, Path::new(pattern)));
            }
        }
        Ok(Self {
            root: root.to_path_buf(),
            globs: builder.build()?,
            prefixes,
        })
    }

    fn matches(&self, path: &Path) -> bool {
        if self.prefixes.iter().any(|p| path.starts_with(p)) {
            return true;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.globs.is_match(relative)
    }
}
