//! Vocabulary extraction from AST facts.
//!
//! The [`ScopeFilter`] decides which facts describe project symbols, the
//! [`HeuristicExtractor`] accumulates canonical terms and relationships from
//! them, relevance scoring drops noise, and workflow synthesis chains the
//! surviving relationships into readable sequences.

mod heuristic;
mod relevance;
mod scope;
mod types;
mod workflows;

pub use heuristic::{HeuristicExtractor, EXTRACTION_NOTE};
pub use relevance::{
    is_meaningful_definition, RelevanceConfig, DEFAULT_HELPER_MARKERS, INFERRED_FALLBACK,
    LOW_RELEVANCE_NOTE,
};
pub use scope::{ScopeConfig, ScopeFilter, DEFAULT_IGNORED_NAMESPACES};
pub use types::{DslExtractionResult, DslRelationship, DslTerm, TermKind, Workflow};
pub use workflows::{synthesize_workflows, FALLBACK_WORKFLOW_NAME};
