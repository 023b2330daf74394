//! Coherence analysis over an extracted vocabulary.
//!
//! Vocabulary rules look at terms and relationships; convention rules look
//! at the raw facts carried through extraction. Every rule is independent
//! and only appends findings.

mod analyzer;
mod conventions;
mod rules;
mod types;

pub use analyzer::{AnalyzerConfig, RuleBasedAnalyzer};
pub use conventions::{
    accessor_conventions, is_bool_type, is_void_type, lifecycle_pairing, parse_return_type,
    GETTER_MUTATES, GETTER_RETURNS_VOID, LIFECYCLE_MISMATCH, PREDICATE_MUTATES,
    PREDICATE_NOT_BOOL, SETTER_LACKS_MUTATIONS,
};
pub use rules::{
    ambiguous_aliases, canonicalization_inconsistencies, conflicting_verbs, duplicate_terms,
    high_usage_orphans, missing_relationships, AMBIGUOUS_ALIAS, CANONICALIZATION_INCONSISTENCY,
    CONFLICTING_VERBS, DUPLICATE_TERM, HIGH_USAGE_ORPHAN, MISSING_RELATIONSHIPS,
};
pub use types::{CoherenceResult, Finding, FindingRule, Severity};
