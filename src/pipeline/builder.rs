//! Assembles a [`Pipeline`] from explicit components and registry names.

use crate::cache::{CacheOptions, CachingIndexer};
use crate::config::{AnalysisConfig, HeuristicsConfig};

use super::indexer::FactFileIndexer;
use super::registry::{ComponentRegistry, RegistryError};
use super::runner::Pipeline;
use super::sources::DirectorySourceAcquirer;
use super::traits::{AstIndexer, CoherenceAnalyzer, DslExtractor, Reporter, SourceAcquirer};

/// Builder for [`Pipeline`].
///
/// Components set with `with_<stage>` are used as given. The rest come from
/// the registry by the names set with `with_<stage>_name`, or its defaults.
pub struct PipelineBuilder {
    registry: ComponentRegistry,
    heuristics: HeuristicsConfig,
    cache_options: CacheOptions,
    source_acquirer: Option<Box<dyn SourceAcquirer>>,
    indexer: Option<Box<dyn AstIndexer>>,
    extractor: Option<Box<dyn DslExtractor>>,
    analyzer: Option<Box<dyn CoherenceAnalyzer>>,
    reporter: Option<Box<dyn Reporter>>,
    extractor_name: String,
    analyzer_name: String,
    reporter_name: String,
}

impl PipelineBuilder {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            heuristics: HeuristicsConfig::default(),
            cache_options: CacheOptions::default(),
            source_acquirer: None,
            indexer: None,
            extractor: None,
            analyzer: None,
            reporter: None,
            extractor_name: String::new(),
            analyzer_name: String::new(),
            reporter_name: String::new(),
        }
    }

    /// A builder preloaded with component names, heuristics, cache options
    /// and the fact-file indexer from `config`.
    pub fn from_config(registry: ComponentRegistry, config: &AnalysisConfig) -> Self {
        let mut builder = Self::new(registry)
            .with_heuristics(config.heuristics.clone())
            .with_cache_options(config.cache.clone())
            .with_indexer(Box::new(FactFileIndexer::from_config(config)));
        if let Some(name) = &config.extractor {
            builder = builder.with_extractor_name(name);
        }
        if let Some(name) = &config.analyzer {
            builder = builder.with_analyzer_name(name);
        }
        if let Some(name) = &config.reporter {
            builder = builder.with_reporter_name(name);
        }
        builder
    }

    pub fn with_heuristics(mut self, heuristics: HeuristicsConfig) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn with_cache_options(mut self, options: CacheOptions) -> Self {
        self.cache_options = options;
        self
    }

    pub fn with_source_acquirer(mut self, acquirer: Box<dyn SourceAcquirer>) -> Self {
        self.source_acquirer = Some(acquirer);
        self
    }

    pub fn with_indexer(mut self, indexer: Box<dyn AstIndexer>) -> Self {
        self.indexer = Some(indexer);
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn DslExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_analyzer(mut self, analyzer: Box<dyn CoherenceAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_extractor_name(mut self, name: impl Into<String>) -> Self {
        self.extractor_name = name.into();
        self
    }

    pub fn with_analyzer_name(mut self, name: impl Into<String>) -> Self {
        self.analyzer_name = name.into();
        self
    }

    pub fn with_reporter_name(mut self, name: impl Into<String>) -> Self {
        self.reporter_name = name.into();
        self
    }

    pub fn build(self) -> Result<Pipeline, RegistryError> {
        let extractor = match self.extractor {
            Some(extractor) => extractor,
            None => self
                .registry
                .create_extractor(&self.extractor_name, &self.heuristics)?,
        };
        let analyzer = match self.analyzer {
            Some(analyzer) => analyzer,
            None => self
                .registry
                .create_analyzer(&self.analyzer_name, &self.heuristics)?,
        };
        let reporter = match self.reporter {
            Some(reporter) => reporter,
            None => self
                .registry
                .create_reporter(&self.reporter_name, &self.heuristics)?,
        };

        let source_acquirer = self
            .source_acquirer
            .unwrap_or_else(|| Box::new(DirectorySourceAcquirer::new()));
        let mut indexer = self
            .indexer
            .unwrap_or_else(|| Box::new(FactFileIndexer::default()));
        if self.cache_options.enabled || self.cache_options.clean {
            indexer = Box::new(CachingIndexer::new(indexer, self.cache_options));
        }

        Ok(Pipeline {
            source_acquirer,
            indexer,
            extractor,
            analyzer,
            reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{DslExtractionResult, ScopeConfig};
    use crate::facts::FactIndex;

    struct FixedExtractor;

    impl DslExtractor for FixedExtractor {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract(&self, _index: &FactIndex, _scope: &ScopeConfig) -> DslExtractionResult {
            DslExtractionResult::default()
        }
    }

    #[test]
    fn test_defaults_from_registry() {
        let pipeline = PipelineBuilder::new(ComponentRegistry::with_defaults())
            .build()
            .unwrap();
        assert_eq!(pipeline.source_acquirer().name(), "directory");
        assert_eq!(pipeline.indexer().name(), "fact-file");
        assert_eq!(pipeline.extractor().name(), "heuristic");
        assert_eq!(pipeline.analyzer().name(), "rule-based");
        assert_eq!(pipeline.reporter().name(), "markdown");
    }

    #[test]
    fn test_explicit_component_wins_over_name() {
        let pipeline = PipelineBuilder::new(ComponentRegistry::with_defaults())
            .with_extractor_name("does-not-exist")
            .with_extractor(Box::new(FixedExtractor))
            .build()
            .unwrap();
        assert_eq!(pipeline.extractor().name(), "fixed");
    }

    #[test]
    fn test_unknown_name_fails_build() {
        let result = PipelineBuilder::new(ComponentRegistry::with_defaults())
            .with_analyzer_name("llm")
            .build();
        assert!(matches!(result, Err(RegistryError::Unknown { .. })));
    }

    #[test]
    fn test_from_config_uses_configured_names() {
        let mut config = AnalysisConfig::new("/proj");
        config.reporter = Some("nope".to_string());
        let result = PipelineBuilder::from_config(ComponentRegistry::with_defaults(), &config).build();
        assert!(matches!(
            result,
            Err(RegistryError::Unknown { kind: "reporter", .. })
        ));
    }
}
