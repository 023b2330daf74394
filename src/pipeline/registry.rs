//! Name-to-constructor registry for pluggable components.
//!
//! A registry is an ordinary value handed to [`PipelineBuilder`]; there is
//! no process-wide registration.
//!
//! [`PipelineBuilder`]: super::PipelineBuilder

use std::collections::BTreeMap;

use thiserror::Error;

use crate::coherence::RuleBasedAnalyzer;
use crate::config::HeuristicsConfig;
use crate::extract::HeuristicExtractor;
use crate::report::MarkdownReporter;

use super::traits::{CoherenceAnalyzer, DslExtractor, Reporter};

/// Errors from registering or creating components.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    #[error("{kind} '{name}' is already registered")]
    Duplicate { kind: &'static str, name: String },

    #[error("unknown {kind} '{name}' (registered: {registered})")]
    Unknown {
        kind: &'static str,
        name: String,
        registered: String,
    },

    #[error("no default {kind} registered")]
    NoDefault { kind: &'static str },
}

type Factory<T> = Box<dyn Fn(&HeuristicsConfig) -> Box<T>>;

struct Table<T: ?Sized> {
    kind: &'static str,
    factories: BTreeMap<String, Factory<T>>,
    default: Option<String>,
}

impl<T: ?Sized> Table<T> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            factories: BTreeMap::new(),
            default: None,
        }
    }

    fn register(&mut self, name: &str, factory: Factory<T>) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName { kind: self.kind });
        }
        if self.factories.contains_key(name) {
            return Err(RegistryError::Duplicate {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        self.factories.insert(name.to_string(), factory);
        if self.default.is_none() {
            self.default = Some(name.to_string());
        }
        Ok(())
    }

    fn set_default(&mut self, name: &str) -> Result<(), RegistryError> {
        if !self.factories.contains_key(name) {
            return Err(self.unknown(name));
        }
        self.default = Some(name.to_string());
        Ok(())
    }

    fn create(&self, name: &str, heuristics: &HeuristicsConfig) -> Result<Box<T>, RegistryError> {
        let name = if name.is_empty() {
            self.default
                .as_deref()
                .ok_or(RegistryError::NoDefault { kind: self.kind })?
        } else {
            name
        };
        let factory = self.factories.get(name).ok_or_else(|| self.unknown(name))?;
        Ok(factory(heuristics))
    }

    fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    fn unknown(&self, name: &str) -> RegistryError {
        RegistryError::Unknown {
            kind: self.kind,
            name: name.to_string(),
            registered: if self.factories.is_empty() {
                "none".to_string()
            } else {
                self.names().join(", ")
            },
        }
    }
}

/// Constructors for extractors, analyzers and reporters, keyed by name.
///
/// The first component registered of each kind is the default until
/// another is chosen with the matching `set_default_*` call.
pub struct ComponentRegistry {
    extractors: Table<dyn DslExtractor>,
    analyzers: Table<dyn CoherenceAnalyzer>,
    reporters: Table<dyn Reporter>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            extractors: Table::new("extractor"),
            analyzers: Table::new("analyzer"),
            reporters: Table::new("reporter"),
        }
    }

    /// A registry holding the built-in `heuristic` extractor, `rule-based`
    /// analyzer and `markdown` reporter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        // Fresh tables with distinct non-empty names cannot fail.
        let _ = registry.register_extractor("heuristic", |h: &HeuristicsConfig| {
            Box::new(HeuristicExtractor::with_relevance(h.relevance())) as Box<dyn DslExtractor>
        });
        let _ = registry.register_analyzer("rule-based", |h: &HeuristicsConfig| {
            Box::new(RuleBasedAnalyzer::with_config(h.analyzer())) as Box<dyn CoherenceAnalyzer>
        });
        let _ = registry.register_reporter("markdown", |_: &HeuristicsConfig| {
            Box::new(MarkdownReporter::new()) as Box<dyn Reporter>
        });
        registry
    }

    pub fn register_extractor<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&HeuristicsConfig) -> Box<dyn DslExtractor> + 'static,
    {
        self.extractors.register(name, Box::new(factory))
    }

    pub fn register_analyzer<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&HeuristicsConfig) -> Box<dyn CoherenceAnalyzer> + 'static,
    {
        self.analyzers.register(name, Box::new(factory))
    }

    pub fn register_reporter<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&HeuristicsConfig) -> Box<dyn Reporter> + 'static,
    {
        self.reporters.register(name, Box::new(factory))
    }

    pub fn set_default_extractor(&mut self, name: &str) -> Result<(), RegistryError> {
        self.extractors.set_default(name)
    }

    pub fn set_default_analyzer(&mut self, name: &str) -> Result<(), RegistryError> {
        self.analyzers.set_default(name)
    }

    pub fn set_default_reporter(&mut self, name: &str) -> Result<(), RegistryError> {
        self.reporters.set_default(name)
    }

    /// Create an extractor by name; an empty name selects the default.
    pub fn create_extractor(
        &self,
        name: &str,
        heuristics: &HeuristicsConfig,
    ) -> Result<Box<dyn DslExtractor>, RegistryError> {
        self.extractors.create(name, heuristics)
    }

    /// Create an analyzer by name; an empty name selects the default.
    pub fn create_analyzer(
        &self,
        name: &str,
        heuristics: &HeuristicsConfig,
    ) -> Result<Box<dyn CoherenceAnalyzer>, RegistryError> {
        self.analyzers.create(name, heuristics)
    }

    /// Create a reporter by name; an empty name selects the default.
    pub fn create_reporter(
        &self,
        name: &str,
        heuristics: &HeuristicsConfig,
    ) -> Result<Box<dyn Reporter>, RegistryError> {
        self.reporters.create(name, heuristics)
    }

    pub fn extractor_names(&self) -> Vec<String> {
        self.extractors.names()
    }

    pub fn analyzer_names(&self) -> Vec<String> {
        self.analyzers.names()
    }

    pub fn reporter_names(&self) -> Vec<String> {
        self.reporters.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{DslExtractionResult, ScopeConfig};
    use crate::facts::FactIndex;

    struct NullExtractor;

    impl DslExtractor for NullExtractor {
        fn name(&self) -> &str {
            "null"
        }

        fn extract(&self, _index: &FactIndex, _scope: &ScopeConfig) -> DslExtractionResult {
            DslExtractionResult::default()
        }
    }

    fn null_factory(_: &HeuristicsConfig) -> Box<dyn DslExtractor> {
        Box::new(NullExtractor)
    }

    #[test]
    fn test_defaults_are_registered() {
        let registry = ComponentRegistry::with_defaults();
        let heuristics = HeuristicsConfig::default();

        assert_eq!(registry.create_extractor("", &heuristics).unwrap().name(), "heuristic");
        assert_eq!(registry.create_analyzer("", &heuristics).unwrap().name(), "rule-based");
        assert_eq!(registry.create_reporter("", &heuristics).unwrap().name(), "markdown");
    }

    #[test]
    fn test_first_registration_is_default() {
        let mut registry = ComponentRegistry::with_defaults();
        registry.register_extractor("null", null_factory).unwrap();
        let heuristics = HeuristicsConfig::default();

        assert_eq!(registry.create_extractor("", &heuristics).unwrap().name(), "heuristic");
        registry.set_default_extractor("null").unwrap();
        assert_eq!(registry.create_extractor("", &heuristics).unwrap().name(), "null");
        assert_eq!(registry.extractor_names(), vec!["heuristic", "null"]);
    }

    #[test]
    fn test_registration_errors() {
        let mut registry = ComponentRegistry::with_defaults();
        assert_eq!(
            registry.register_extractor("", null_factory),
            Err(RegistryError::EmptyName { kind: "extractor" })
        );
        assert_eq!(
            registry.register_extractor("heuristic", null_factory),
            Err(RegistryError::Duplicate {
                kind: "extractor",
                name: "heuristic".to_string()
            })
        );
        assert!(matches!(
            registry.set_default_reporter("html"),
            Err(RegistryError::Unknown { .. })
        ));
    }

    #[test]
    fn test_unknown_name_lists_registered_sorted() {
        let mut registry = ComponentRegistry::with_defaults();
        registry.register_extractor("alpha", null_factory).unwrap();

        let err = registry
            .create_extractor("llm", &HeuristicsConfig::default())
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "unknown extractor 'llm' (registered: alpha, heuristic)"
        );
    }

    #[test]
    fn test_empty_registry_has_no_default() {
        let registry = ComponentRegistry::new();
        let err = registry
            .create_analyzer("", &HeuristicsConfig::default())
            .err()
            .unwrap();
        assert_eq!(err, RegistryError::NoDefault { kind: "analyzer" });
    }
}
