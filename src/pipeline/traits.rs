//! Strategy interfaces for each pipeline stage.

use std::path::PathBuf;

use crate::coherence::CoherenceResult;
use crate::config::AnalysisConfig;
use crate::extract::{DslExtractionResult, ScopeConfig};
use crate::facts::FactIndex;
use crate::report::Report;

/// The inputs to indexing: where the project lives and which files to index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    pub project_root: PathBuf,
    pub build_directory: PathBuf,
    /// Source files in a stable order.
    pub files: Vec<PathBuf>,
}

/// Discovers the source files of a project.
pub trait SourceAcquirer {
    fn name(&self) -> &str;

    fn acquire(&self, config: &AnalysisConfig) -> anyhow::Result<SourceSet>;
}

/// Produces the fact stream for a source set.
pub trait AstIndexer {
    fn name(&self) -> &str;

    /// Version string of the toolchain that produced the facts. Part of the
    /// cache key.
    fn toolchain_version(&self) -> String;

    fn build_index(&self, sources: &SourceSet) -> anyhow::Result<FactIndex>;
}

/// Turns facts into a vocabulary model.
///
/// Extraction is total: any fact stream yields a result, possibly empty.
pub trait DslExtractor {
    fn name(&self) -> &str;

    fn extract(&self, index: &FactIndex, scope: &ScopeConfig) -> DslExtractionResult;
}

/// Checks a vocabulary model for naming inconsistencies.
pub trait CoherenceAnalyzer {
    fn name(&self) -> &str;

    fn analyze(&self, extraction: &DslExtractionResult) -> CoherenceResult;
}

/// Renders the analysis outcome.
pub trait Reporter {
    fn name(&self) -> &str;

    fn render(
        &self,
        extraction: &DslExtractionResult,
        coherence: &CoherenceResult,
        config: &AnalysisConfig,
    ) -> Report;
}
