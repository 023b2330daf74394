//! vocabcheck - domain vocabulary extraction and naming coherence analysis.
//!
//! vocabcheck recovers the implicit vocabulary of a C/C++ codebase: the
//! nouns (types, entities) and verbs (actions, relationships) its authors
//! actually used. It then flags places where that vocabulary is used
//! inconsistently.
//!
//! # Architecture
//!
//! Analysis runs as a pipeline of pluggable stages:
//!
//! - `facts`: the `AstFact` stream produced by an external indexer
//! - `extract`: scope filtering, canonical terms, relationships, workflows
//! - `coherence`: vocabulary and naming-convention rules
//! - `cache`: on-disk fact cache keyed by the indexing inputs
//! - `pipeline`: stage traits, component registry, builder and runner
//! - `report`: Markdown and JSON rendering
//! - `config`: YAML config file and CLI overrides
//!
//! # Adding a Component
//!
//! Implement `DslExtractor`, `CoherenceAnalyzer` or `Reporter` and register
//! a constructor in a `ComponentRegistry` passed to `PipelineBuilder`.

pub mod cache;
pub mod cli;
pub mod coherence;
pub mod config;
pub mod extract;
pub mod facts;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use cache::{CacheOptions, CachingIndexer, FactCache};
pub use coherence::{CoherenceResult, Finding, FindingRule, RuleBasedAnalyzer, Severity};
pub use config::{AnalysisConfig, AnalyzeOptions, ConfigError, HeuristicsConfig};
pub use extract::{DslExtractionResult, DslRelationship, DslTerm, HeuristicExtractor, ScopeConfig};
pub use facts::{canonicalize, AstFact, FactIndex, FactKind, TargetScope};
pub use pipeline::{ComponentRegistry, Pipeline, PipelineBuilder, PipelineResult, RegistryError};
pub use report::{MarkdownReporter, Report, ReportFormat};
