//! Heuristic extraction: one pass over facts, then reconciliation.

use std::collections::{BTreeMap, HashMap};

use crate::facts::{canonicalize, AstFact, FactIndex, FactKind, TargetScope};
use crate::pipeline::DslExtractor;

use super::relevance::{RelevanceConfig, DECLARED_FALLBACK_PREFIX, INFERRED_FALLBACK};
use super::scope::{ScopeConfig, ScopeFilter};
use super::types::{DslExtractionResult, DslRelationship, DslTerm, TermKind};
use super::workflows::synthesize_workflows;

/// Note attached to every extraction result.
pub const EXTRACTION_NOTE: &str = "Heuristic extraction canonicalized identifiers, \
synthesized definitions from signatures, and inferred relationships from AST facts.";

/// Turns a fact stream into canonical terms, relationships and workflows.
#[derive(Debug, Clone, Default)]
pub struct HeuristicExtractor {
    relevance: RelevanceConfig,
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relevance(relevance: RelevanceConfig) -> Self {
        Self { relevance }
    }

    pub fn relevance(&self) -> &RelevanceConfig {
        &self.relevance
    }

    /// Extract vocabulary from `index`. Never fails; an empty index gives
    /// an empty result carrying only the extraction note.
    pub fn extract(&self, index: &FactIndex, scope: &ScopeConfig) -> DslExtractionResult {
        let filter = ScopeFilter::new(&index.facts, scope);
        let mut acc = Accumulator::default();

        for fact in &index.facts {
            acc.track_external(fact);

            if fact.kind.is_reference() {
                if filter.target_in_scope(fact) {
                    acc.track_reference(fact);
                }
                continue;
            }

            if !filter.subject_in_scope(fact) {
                continue;
            }

            acc.track_subject(fact);

            if filter.target_in_scope(fact) {
                acc.track_relationship(fact);
            }
        }

        let result = acc.finish(&self.relevance, index);
        tracing::debug!(
            facts = index.len(),
            known_symbols = filter.known_symbol_count(),
            terms = result.terms.len(),
            relationships = result.relationships.len(),
            workflows = result.workflows.len(),
            external = result.external_dependencies.len(),
            "heuristic extraction complete"
        );
        result
    }
}

impl DslExtractor for HeuristicExtractor {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn extract(&self, index: &FactIndex, scope: &ScopeConfig) -> DslExtractionResult {
        HeuristicExtractor::extract(self, index, scope)
    }
}

struct TermEntry {
    term: DslTerm,
    /// Set by the first fact that declares or acts through this term.
    kind: Option<TermKind>,
    /// Used when only ever seen as a target.
    kind_hint: TermKind,
}

impl TermEntry {
    fn add_alias(&mut self, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() || raw == self.term.name {
            return;
        }
        if !self.term.aliases.iter().any(|a| a == raw) {
            self.term.aliases.push(raw.to_string());
        }
    }

    fn touch(&mut self, evidence: &str, alias: &str) {
        self.term.add_evidence(evidence);
        self.term.usage_count += 1;
        self.add_alias(alias);
    }

    fn absorb_fragments(&mut self, fact: &AstFact) {
        for fragment in [
            &fact.doc_comment,
            &fact.descriptor,
            &fact.signature,
            &fact.scope_path,
        ] {
            self.term.append_definition(fragment);
        }
    }

    fn into_term(self) -> DslTerm {
        let mut term = self.term;
        term.kind = self.kind.unwrap_or(self.kind_hint);
        term
    }
}

#[derive(Default)]
struct TermTable {
    entries: BTreeMap<String, TermEntry>,
}

impl TermTable {
    /// Fetch or create the entry for `canonical`. The flag is true when
    /// the entry was just created.
    fn upsert(&mut self, canonical: &str, hint: TermKind) -> (&mut TermEntry, bool) {
        let mut created = false;
        let entry = self
            .entries
            .entry(canonical.to_string())
            .or_insert_with(|| {
                created = true;
                TermEntry {
                    term: DslTerm::new(canonical, hint),
                    kind: None,
                    kind_hint: hint,
                }
            });
        (entry, created)
    }

    fn into_terms(self) -> Vec<DslTerm> {
        self.entries.into_values().map(TermEntry::into_term).collect()
    }
}

#[derive(Default)]
struct Accumulator {
    terms: TermTable,
    external: TermTable,
    relationships: BTreeMap<(String, String, String), DslRelationship>,
    fallbacks: HashMap<String, String>,
}

impl Accumulator {
    fn track_external(&mut self, fact: &AstFact) {
        if fact.target_scope != TargetScope::External || fact.target().is_empty() {
            return;
        }
        let canonical = canonicalize(fact.target());
        let (entry, _) = self.external.upsert(&canonical, TermKind::External);
        entry.kind = Some(TermKind::External);
        entry.absorb_fragments(fact);
        entry.touch(&fact.evidence_location(), fact.target());
    }

    fn track_reference(&mut self, fact: &AstFact) {
        let canonical = canonicalize(fact.target());
        let (entry, created) = self.terms.upsert(&canonical, target_kind_hint(&fact.kind));
        entry.touch(&fact.evidence_location(), &fact.name);
        if created {
            self.fallbacks
                .insert(canonical, INFERRED_FALLBACK.to_string());
        }
    }

    fn track_subject(&mut self, fact: &AstFact) {
        let canonical = canonicalize(&fact.name);
        let (entry, _) = self.terms.upsert(&canonical, TermKind::Action);
        if entry.kind.is_none() {
            entry.kind = Some(if fact.kind.names_entity() {
                TermKind::Entity
            } else {
                TermKind::Action
            });
        }
        entry.absorb_fragments(fact);
        entry.touch(&fact.evidence_location(), &fact.name);

        // A declaration's fallback wins over one recorded from an earlier
        // reference, whatever the fact order.
        let is_declaration = fact.kind.declaration().is_some();
        let replace = match self.fallbacks.get(&canonical) {
            None => true,
            Some(existing) => {
                existing == INFERRED_FALLBACK || (is_declaration && !is_declared_fallback(existing))
            }
        };
        if replace {
            self.fallbacks.insert(
                canonical,
                format!("{}{}", DECLARED_FALLBACK_PREFIX, fact.kind.tag()),
            );
        }
    }

    fn track_relationship(&mut self, fact: &AstFact) {
        let subject = canonicalize(&fact.name);
        let object = canonicalize(fact.target());
        let verb = fact.kind.verb().to_string();
        let evidence = fact.evidence_location();

        let rel = self
            .relationships
            .entry((subject.clone(), verb.clone(), object.clone()))
            .or_insert_with(|| DslRelationship::new(subject, verb, object.clone()));
        rel.add_evidence(&evidence);
        rel.append_note(&fact.descriptor);
        rel.usage_count += 1;

        let (entry, created) = self.terms.upsert(&object, target_kind_hint(&fact.kind));
        entry.touch(&evidence, fact.target());
        if created {
            self.fallbacks.insert(object, INFERRED_FALLBACK.to_string());
        }
    }

    fn finish(self, relevance: &RelevanceConfig, index: &FactIndex) -> DslExtractionResult {
        let terms = relevance.filter_terms(self.terms.into_terms(), &self.fallbacks);
        let external_dependencies =
            relevance.filter_terms(self.external.into_terms(), &HashMap::new());
        // BTreeMap order is already (subject, verb, object).
        let relationships: Vec<DslRelationship> = self.relationships.into_values().collect();
        let workflows = synthesize_workflows(&relationships);

        DslExtractionResult {
            terms,
            relationships,
            workflows,
            external_dependencies,
            extraction_notes: vec![EXTRACTION_NOTE.to_string()],
            facts: index.facts.clone(),
        }
    }
}

fn target_kind_hint(kind: &FactKind) -> TermKind {
    match kind {
        FactKind::TypeUsage { .. } | FactKind::Ownership { .. } => TermKind::Entity,
        _ => TermKind::Action,
    }
}

/// True for a fallback recorded from a declaration fact.
fn is_declared_fallback(fallback: &str) -> bool {
    fallback
        .strip_prefix(DECLARED_FALLBACK_PREFIX)
        .is_some_and(|tag| matches!(tag, "function" | "type" | "variable"))
}
