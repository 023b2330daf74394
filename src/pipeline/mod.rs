//! Pipeline wiring.
//!
//! Each stage is a trait object chosen explicitly through
//! [`PipelineBuilder`], falling back to a [`ComponentRegistry`] for the
//! pluggable extract/analyze/report stages.

mod builder;
mod indexer;
mod registry;
mod runner;
mod sources;
mod traits;

pub use builder::PipelineBuilder;
pub use indexer::{FactFileIndexer, DEFAULT_FACTS_FILE};
pub use registry::{ComponentRegistry, RegistryError};
pub use runner::{Pipeline, PipelineResult};
pub use sources::{is_source_file, DirectorySourceAcquirer, SOURCE_EXTENSIONS};
pub use traits::{AstIndexer, CoherenceAnalyzer, DslExtractor, Reporter, SourceAcquirer, SourceSet};
