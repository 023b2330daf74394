//! Rule-based coherence analyzer.

use serde::{Deserialize, Serialize};

use crate::extract::DslExtractionResult;
use crate::pipeline::CoherenceAnalyzer;

use super::conventions;
use super::rules;
use super::types::CoherenceResult;

/// Thresholds for the analyzer's rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Minimum usage count for the high-usage orphan rule (default: 3)
    #[serde(default = "default_high_usage_threshold")]
    pub high_usage_threshold: usize,
}

fn default_high_usage_threshold() -> usize {
    3
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            high_usage_threshold: default_high_usage_threshold(),
        }
    }
}

/// Runs every coherence rule in a fixed order.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedAnalyzer {
    config: AnalyzerConfig,
}

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, extraction: &DslExtractionResult) -> CoherenceResult {
        let terms = &extraction.terms;
        let relationships = &extraction.relationships;

        let mut findings = rules::duplicate_terms(terms);
        findings.extend(rules::missing_relationships(terms, relationships));
        findings.extend(rules::ambiguous_aliases(terms));
        findings.extend(rules::conflicting_verbs(relationships));
        findings.extend(rules::high_usage_orphans(
            terms,
            relationships,
            self.config.high_usage_threshold,
        ));
        findings.extend(rules::canonicalization_inconsistencies(terms, relationships));
        findings.extend(conventions::accessor_conventions(&extraction.facts));
        findings.extend(conventions::lifecycle_pairing(&extraction.facts));

        let result = CoherenceResult::from_findings(findings);
        tracing::debug!(
            findings = result.findings.len(),
            severity = %result.severity,
            "coherence analysis complete"
        );
        result
    }
}

impl CoherenceAnalyzer for RuleBasedAnalyzer {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn analyze(&self, extraction: &DslExtractionResult) -> CoherenceResult {
        RuleBasedAnalyzer::analyze(self, extraction)
    }
}
