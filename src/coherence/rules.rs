//! Vocabulary-level coherence rules over terms and relationships.
//!
//! Each rule is a pure function returning its findings in a stable order.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::extract::{DslRelationship, DslTerm};
use crate::facts::canonicalize;

use super::types::{Finding, FindingRule};

pub const DUPLICATE_TERM: &str = "Duplicate term name indicates incoherent DSL usage.";
pub const MISSING_RELATIONSHIPS: &str = "No relationships detected; DSL may be incomplete.";
pub const AMBIGUOUS_ALIAS: &str =
    "Alias reused across multiple terms; canonical naming may be unclear.";
pub const CONFLICTING_VERBS: &str =
    "Conflicting verbs found between the same subject and object.";
pub const HIGH_USAGE_ORPHAN: &str =
    "High-usage term lacks relationships; DSL graph may be incomplete.";
pub const CANONICALIZATION_INCONSISTENCY: &str =
    "Canonicalization inconsistency detected across multiple names.";

/// Two or more terms share a name.
pub fn duplicate_terms(terms: &[DslTerm]) -> Vec<Finding> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for term in terms {
        *counts.entry(term.name.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(name, _)| {
            Finding::new(FindingRule::DuplicateTerm, name, DUPLICATE_TERM)
                .with_example(format!("{}: duplicate usage", name))
        })
        .collect()
}

/// Terms exist but nothing relates them.
pub fn missing_relationships(
    terms: &[DslTerm],
    relationships: &[DslRelationship],
) -> Vec<Finding> {
    if !relationships.is_empty() {
        return Vec::new();
    }
    match terms.first() {
        Some(term) => vec![
            Finding::new(FindingRule::MissingRelationships, &term.name, MISSING_RELATIONSHIPS)
                .with_example("Relationships missing for term"),
        ],
        None => Vec::new(),
    }
}

/// One alias spelling is claimed by several terms.
pub fn ambiguous_aliases(terms: &[DslTerm]) -> Vec<Finding> {
    let mut owners_by_alias: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for term in terms {
        for alias in &term.aliases {
            owners_by_alias
                .entry(canonicalize(alias))
                .or_default()
                .insert(term.name.as_str());
        }
    }

    owners_by_alias
        .into_iter()
        .filter(|(_, owners)| owners.len() >= 2)
        .map(|(alias, owners)| {
            let example = owners.iter().fold(format!("{} used for", alias), |mut acc, owner| {
                acc.push(' ');
                acc.push_str(owner);
                acc
            });
            let suggested = owners.iter().next().copied().unwrap_or_default();
            Finding::new(FindingRule::AmbiguousAlias, alias, AMBIGUOUS_ALIAS)
                .with_example(example)
                .suggest(suggested)
        })
        .collect()
}

/// The same subject/object pair is linked by different verbs.
pub fn conflicting_verbs(relationships: &[DslRelationship]) -> Vec<Finding> {
    let mut pairs: BTreeMap<(&str, &str), BTreeMap<&str, String>> = BTreeMap::new();
    for rel in relationships {
        let example = match rel.evidence.first() {
            Some(evidence) => format!("{}: {}", rel.verb, evidence),
            None => format!("{}: {} {}", rel.verb, rel.subject, rel.object),
        };
        pairs
            .entry((rel.subject.as_str(), rel.object.as_str()))
            .or_default()
            .entry(rel.verb.as_str())
            .or_insert(example);
    }

    pairs
        .into_iter()
        .filter(|(_, verbs)| verbs.len() >= 2)
        .map(|((subject, object), verbs)| {
            Finding::new(
                FindingRule::ConflictingVerbs,
                format!("{}->{}", subject, object),
                CONFLICTING_VERBS,
            )
            .with_examples(verbs.into_values())
            .suggest(format!("{} {}", subject, object))
        })
        .collect()
}

/// Heavily used terms that take part in no relationship.
pub fn high_usage_orphans(
    terms: &[DslTerm],
    relationships: &[DslRelationship],
    threshold: usize,
) -> Vec<Finding> {
    let participants: HashSet<&str> = relationships
        .iter()
        .flat_map(|rel| [rel.subject.as_str(), rel.object.as_str()])
        .collect();

    terms
        .iter()
        .filter(|term| term.usage_count >= threshold)
        .filter(|term| !participants.contains(term.name.as_str()))
        .map(|term| {
            let example = match term.evidence.first() {
                Some(evidence) => evidence.clone(),
                None => format!("usage count: {}", term.usage_count),
            };
            Finding::new(FindingRule::HighUsageOrphan, &term.name, HIGH_USAGE_ORPHAN)
                .with_example(example)
        })
        .collect()
}

/// Different spellings across terms and relationship endpoints collapse to
/// one canonical name.
pub fn canonicalization_inconsistencies(
    terms: &[DslTerm],
    relationships: &[DslRelationship],
) -> Vec<Finding> {
    let mut spellings: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    let names = terms.iter().map(|t| t.name.as_str()).chain(
        relationships
            .iter()
            .flat_map(|rel| [rel.subject.as_str(), rel.object.as_str()]),
    );
    for name in names {
        spellings.entry(canonicalize(name)).or_default().insert(name);
    }

    spellings
        .into_iter()
        .filter(|(_, names)| names.len() >= 2)
        .map(|(canonical, names)| {
            Finding::new(
                FindingRule::CanonicalizationInconsistency,
                canonical.clone(),
                CANONICALIZATION_INCONSISTENCY,
            )
            .with_examples(names)
            .suggest(canonical)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::TermKind;

    fn term(name: &str) -> DslTerm {
        DslTerm::new(name, TermKind::Entity)
    }

    fn rel(subject: &str, verb: &str, object: &str, evidence: &[&str]) -> DslRelationship {
        let mut rel = DslRelationship::new(subject, verb, object);
        rel.evidence = evidence.iter().map(|e| e.to_string()).collect();
        rel
    }

    #[test]
    fn test_duplicate_terms() {
        let findings = duplicate_terms(&[term("alpha"), term("beta"), term("alpha")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].term, "alpha");
        assert_eq!(findings[0].examples, vec!["alpha: duplicate usage"]);
    }

    #[test]
    fn test_missing_relationships_targets_first_term() {
        let findings = missing_relationships(&[term("alpha"), term("beta")], &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].term, "alpha");

        assert!(missing_relationships(&[], &[]).is_empty());
        assert!(missing_relationships(&[term("a")], &[rel("a", "calls", "b", &[])]).is_empty());
    }

    #[test]
    fn test_ambiguous_alias_lists_owners() {
        let mut alpha = term("alpha");
        alpha.aliases = vec!["Shared".to_string()];
        let mut beta = term("beta");
        beta.aliases = vec!["shared".to_string()];

        let findings = ambiguous_aliases(&[alpha, beta]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].term, "shared");
        assert_eq!(findings[0].examples, vec!["shared used for alpha beta"]);
        assert_eq!(findings[0].suggested_canonical_form, "alpha");
    }

    #[test]
    fn test_conflicting_verbs_one_example_per_verb() {
        let findings = conflicting_verbs(&[
            rel("alpha", "calls", "beta", &["alpha calls beta"]),
            rel("alpha", "owns", "beta", &[]),
            rel("alpha", "calls", "gamma", &[]),
        ]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].term, "alpha->beta");
        assert_eq!(
            findings[0].examples,
            vec!["calls: alpha calls beta", "owns: alpha beta"]
        );
        assert_eq!(findings[0].suggested_canonical_form, "alpha beta");
    }

    #[test]
    fn test_high_usage_orphan() {
        let mut busy = term("busy");
        busy.usage_count = 5;
        busy.evidence = vec!["busy evidence".to_string()];
        let mut quiet = term("quiet");
        quiet.usage_count = 4;
        let mut connected = term("connected");
        connected.usage_count = 9;

        let findings = high_usage_orphans(
            &[busy, quiet, connected],
            &[rel("connected", "links", "else", &[])],
            3,
        );
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].examples, vec!["busy evidence"]);
        assert_eq!(findings[1].examples, vec!["usage count: 4"]);
    }

    #[test]
    fn test_canonicalization_inconsistency() {
        let findings = canonicalization_inconsistencies(
            &[term("PaymentService"), term("paymentservice")],
            &[rel("Helper", "uses", "Other", &[])],
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].term, "paymentservice");
        assert_eq!(findings[0].suggested_canonical_form, "paymentservice");
        assert_eq!(findings[0].examples, vec!["PaymentService", "paymentservice"]);
    }

    #[test]
    fn test_relationship_endpoints_count_as_spellings() {
        let findings = canonicalization_inconsistencies(
            &[term("app..widget")],
            &[rel("app::Widget", "calls", "app..widget", &[])],
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].examples.len(), 2);
    }
}
