//! Runs the analysis stages in order.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::coherence::CoherenceResult;
use crate::config::AnalysisConfig;
use crate::extract::DslExtractionResult;
use crate::report::{self, Report};

use super::traits::{AstIndexer, CoherenceAnalyzer, DslExtractor, Reporter, SourceAcquirer, SourceSet};

/// Source → index → extract → analyze → report.
///
/// Build one with [`PipelineBuilder`](super::PipelineBuilder).
pub struct Pipeline {
    pub(super) source_acquirer: Box<dyn SourceAcquirer>,
    pub(super) indexer: Box<dyn AstIndexer>,
    pub(super) extractor: Box<dyn DslExtractor>,
    pub(super) analyzer: Box<dyn CoherenceAnalyzer>,
    pub(super) reporter: Box<dyn Reporter>,
}

/// Everything one run produced.
#[derive(Debug)]
pub struct PipelineResult {
    pub sources: SourceSet,
    pub fact_count: usize,
    pub extraction: DslExtractionResult,
    pub coherence: CoherenceResult,
    pub report: Report,
    /// Report files written to the output directory.
    pub written: Vec<PathBuf>,
    pub duration: Duration,
}

impl Pipeline {
    pub fn source_acquirer(&self) -> &dyn SourceAcquirer {
        self.source_acquirer.as_ref()
    }

    pub fn indexer(&self) -> &dyn AstIndexer {
        self.indexer.as_ref()
    }

    pub fn extractor(&self) -> &dyn DslExtractor {
        self.extractor.as_ref()
    }

    pub fn analyzer(&self) -> &dyn CoherenceAnalyzer {
        self.analyzer.as_ref()
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn run(&self, config: &AnalysisConfig) -> anyhow::Result<PipelineResult> {
        let started = Instant::now();

        let sources = self
            .source_acquirer
            .acquire(config)
            .context("source acquisition failed")?;
        tracing::info!(
            stage = "sources",
            component = self.source_acquirer.name(),
            file_count = sources.files.len(),
            "acquired sources"
        );

        let index = self
            .indexer
            .build_index(&sources)
            .context("AST indexing failed")?;
        tracing::info!(
            stage = "index",
            component = self.indexer.name(),
            fact_count = index.len(),
            "indexed facts"
        );

        let extraction = self.extractor.extract(&index, &config.scope);
        tracing::info!(
            stage = "extract",
            component = self.extractor.name(),
            terms = extraction.terms.len(),
            relationships = extraction.relationships.len(),
            workflows = extraction.workflows.len(),
            "extracted vocabulary"
        );

        let coherence = self.analyzer.analyze(&extraction);
        tracing::info!(
            stage = "analyze",
            component = self.analyzer.name(),
            findings = coherence.findings.len(),
            severity = %coherence.severity,
            "analyzed coherence"
        );

        let report = self.reporter.render(&extraction, &coherence, config);
        let written = report::write_reports(&config.out, &report)?;
        tracing::info!(
            stage = "report",
            component = self.reporter.name(),
            files = written.len(),
            out = %config.out.display(),
            "wrote reports"
        );

        let duration = started.elapsed();
        tracing::info!(duration_ms = duration.as_millis() as u64, "pipeline finished");

        Ok(PipelineResult {
            fact_count: index.len(),
            sources,
            extraction,
            coherence,
            report,
            written,
            duration,
        })
    }
}
