//! Relevance scoring and filtering for extracted terms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::DslTerm;

/// Annotation appended to terms kept despite a weak score.
pub const LOW_RELEVANCE_NOTE: &str = "Low relevance: helper/utility or lightly referenced symbol";

/// Fallback for terms that were only ever seen as a relationship target.
pub const INFERRED_FALLBACK: &str = "Inferred from symbol context";

/// Prefix of the fallback recorded for terms created from their own fact.
pub const DECLARED_FALLBACK_PREFIX: &str = "Declared as ";

pub const DEFAULT_HELPER_MARKERS: &[&str] = &["helper", "util", "internal"];

/// Tunable relevance heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceConfig {
    /// Case-insensitive substrings marking helper/utility symbols.
    #[serde(default = "default_helper_markers")]
    pub helper_markers: Vec<String>,
    /// Terms are kept iff their score is strictly greater than this.
    #[serde(default)]
    pub keep_threshold: i64,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            helper_markers: default_helper_markers(),
            keep_threshold: 0,
        }
    }
}

fn default_helper_markers() -> Vec<String> {
    DEFAULT_HELPER_MARKERS.iter().map(|m| m.to_string()).collect()
}

impl RelevanceConfig {
    pub fn is_helper(&self, term: &DslTerm) -> bool {
        let name = term.name.to_lowercase();
        let definition = term.definition.to_lowercase();
        self.helper_markers.iter().any(|marker| {
            let marker = marker.to_lowercase();
            !marker.is_empty() && (name.contains(&marker) || definition.contains(&marker))
        })
    }

    /// Score a term. `has_fallback` says whether a fallback definition is
    /// waiting for it.
    pub fn score(&self, term: &DslTerm, has_fallback: bool) -> i64 {
        let meaningful = is_meaningful_definition(&term.definition);
        let mut score = term.usage_count as i64;
        if meaningful {
            score += 1;
        }
        if self.is_helper(term) {
            score -= 2;
        }
        if !meaningful && has_fallback {
            score -= 1;
        }
        score
    }

    /// Drop weak terms, annotate borderline ones, then fill empty
    /// definitions from `fallbacks`.
    pub fn filter_terms(
        &self,
        terms: Vec<DslTerm>,
        fallbacks: &HashMap<String, String>,
    ) -> Vec<DslTerm> {
        let mut kept = Vec::with_capacity(terms.len());

        for mut term in terms {
            let has_fallback = fallbacks.contains_key(&term.name);
            let score = self.score(&term, has_fallback);
            if score <= self.keep_threshold {
                tracing::trace!(term = %term.name, score, "dropping low-relevance term");
                continue;
            }

            let meaningful = is_meaningful_definition(&term.definition);
            if self.is_helper(&term) || (!meaningful && term.usage_count == 1) {
                term.append_definition(LOW_RELEVANCE_NOTE);
            }
            kept.push(term);
        }

        for term in &mut kept {
            if term.definition.trim().is_empty() {
                if let Some(fallback) = fallbacks.get(&term.name) {
                    term.definition = fallback.clone();
                }
            }
        }

        kept
    }
}

/// Whether a definition carries real information rather than a placeholder.
pub fn is_meaningful_definition(definition: &str) -> bool {
    let definition = definition.trim();
    !definition.is_empty()
        && definition != INFERRED_FALLBACK
        && !definition.starts_with(DECLARED_FALLBACK_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::TermKind;

    fn term(name: &str, usage: usize, definition: &str) -> DslTerm {
        let mut term = DslTerm::new(name, TermKind::Action);
        term.usage_count = usage;
        term.definition = definition.to_string();
        term
    }

    fn fallbacks(names: &[&str]) -> HashMap<String, String> {
        names
            .iter()
            .map(|n| (n.to_string(), "Declared as function".to_string()))
            .collect()
    }

    #[test]
    fn test_placeholders_are_not_meaningful() {
        assert!(!is_meaningful_definition(""));
        assert!(!is_meaningful_definition("   "));
        assert!(!is_meaningful_definition("Declared as function"));
        assert!(!is_meaningful_definition(INFERRED_FALLBACK));
        assert!(is_meaningful_definition("void Run()"));
    }

    #[test]
    fn test_score_components() {
        let config = RelevanceConfig::default();
        assert_eq!(config.score(&term("run", 2, "void Run()"), true), 3);
        assert_eq!(config.score(&term("run", 2, ""), true), 1);
        assert_eq!(config.score(&term("run", 2, ""), false), 2);
        assert_eq!(config.score(&term("loghelper", 2, "void LogHelper()"), true), 1);
    }

    #[test]
    fn test_single_use_placeholder_is_dropped() {
        let config = RelevanceConfig::default();
        let kept = config.filter_terms(vec![term("temputility", 1, "")], &fallbacks(&["temputility"]));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_lightly_referenced_term_is_annotated() {
        let config = RelevanceConfig::default();
        let kept = config.filter_terms(vec![term("orphan", 1, "")], &HashMap::new());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].definition, LOW_RELEVANCE_NOTE);
    }

    #[test]
    fn test_helper_is_annotated_not_dropped() {
        let config = RelevanceConfig::default();
        let kept = config.filter_terms(
            vec![term("helpers..logginghelper", 3, "void LoggingHelper()")],
            &fallbacks(&["helpers..logginghelper"]),
        );
        assert_eq!(kept.len(), 1);
        assert!(kept[0].definition.contains(LOW_RELEVANCE_NOTE));
    }

    #[test]
    fn test_fallback_fills_empty_definition() {
        let config = RelevanceConfig::default();
        let kept = config.filter_terms(vec![term("busy", 4, "")], &fallbacks(&["busy"]));
        assert_eq!(kept[0].definition, "Declared as function");
    }

    #[test]
    fn test_threshold_is_configurable() {
        let config = RelevanceConfig {
            keep_threshold: 5,
            ..Default::default()
        };
        let kept = config.filter_terms(vec![term("run", 3, "void Run()")], &HashMap::new());
        assert!(kept.is_empty());
    }
}
