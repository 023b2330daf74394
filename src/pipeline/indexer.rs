//! Indexer that reads facts emitted by an external compiler-based tool.

use std::path::PathBuf;

use anyhow::Context;

use crate::config::AnalysisConfig;
use crate::facts::{FactDocument, FactIndex};

use super::traits::{AstIndexer, SourceSet};

/// File name looked up in the build directory when no fact file is set.
pub const DEFAULT_FACTS_FILE: &str = "ast_facts.json";

const UNKNOWN_TOOLCHAIN: &str = "unknown";

/// Loads a JSON fact document.
#[derive(Debug, Clone, Default)]
pub struct FactFileIndexer {
    facts_file: Option<PathBuf>,
    toolchain: Option<String>,
}

impl FactFileIndexer {
    pub fn new(facts_file: Option<PathBuf>, toolchain: Option<String>) -> Self {
        Self {
            facts_file,
            toolchain,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.facts_file.clone(), config.toolchain.clone())
    }

    /// The fact file used for `sources`.
    pub fn facts_path(&self, sources: &SourceSet) -> PathBuf {
        match &self.facts_file {
            Some(path) if path.is_relative() => sources.project_root.join(path),
            Some(path) => path.clone(),
            None => sources.build_directory.join(DEFAULT_FACTS_FILE),
        }
    }
}

impl AstIndexer for FactFileIndexer {
    fn name(&self) -> &str {
        "fact-file"
    }

    fn toolchain_version(&self) -> String {
        self.toolchain
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TOOLCHAIN.to_string())
    }

    fn build_index(&self, sources: &SourceSet) -> anyhow::Result<FactIndex> {
        let path = self.facts_path(sources);
        let document = FactDocument::parse_file(&path)
            .with_context(|| format!("failed to load AST facts from {}", path.display()))?;

        let mut index = document.into_index();
        if index.project_root.is_empty() {
            index.project_root = sources.project_root.to_string_lossy().into_owned();
        }
        tracing::info!(path = %path.display(), fact_count = index.len(), "loaded AST facts");
        Ok(index)
    }
}
