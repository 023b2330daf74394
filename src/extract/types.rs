//! Extraction model: canonical terms, relationships, and workflows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::facts::AstFact;

/// Classification of a vocabulary term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    Entity,
    Action,
    External,
}

impl TermKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::Entity => "Entity",
            TermKind::Action => "Action",
            TermKind::External => "External",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A canonicalized vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DslTerm {
    /// Canonical key.
    pub name: String,
    pub kind: TermKind,
    /// Deduplicated prose fragments joined with `" | "`.
    pub definition: String,
    /// Ordered, deduplicated location strings.
    pub evidence: Vec<String>,
    /// Surface spellings that canonicalize to `name`, never `name` itself.
    pub aliases: Vec<String>,
    pub usage_count: usize,
}

impl DslTerm {
    pub fn new(name: impl Into<String>, kind: TermKind) -> Self {
        Self {
            name: name.into(),
            kind,
            definition: String::new(),
            evidence: Vec::new(),
            aliases: Vec::new(),
            usage_count: 0,
        }
    }

    /// Append a definition fragment unless it is empty or already present.
    pub fn append_definition(&mut self, fragment: &str) {
        append_fragment(&mut self.definition, fragment);
    }

    /// Append an evidence string unless it is empty or already recorded.
    pub fn add_evidence(&mut self, location: &str) {
        add_unique(&mut self.evidence, location);
    }
}

/// A canonical (subject, verb, object) edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DslRelationship {
    pub subject: String,
    pub verb: String,
    pub object: String,
    pub evidence: Vec<String>,
    pub notes: String,
    pub usage_count: usize,
}

impl DslRelationship {
    pub fn new(
        subject: impl Into<String>,
        verb: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            verb: verb.into(),
            object: object.into(),
            evidence: Vec::new(),
            notes: String::new(),
            usage_count: 0,
        }
    }

    /// Workflow step text: `"subject verb object"`.
    pub fn step(&self) -> String {
        format!("{} {} {}", self.subject, self.verb, self.object)
    }

    pub fn add_evidence(&mut self, location: &str) {
        add_unique(&mut self.evidence, location);
    }

    pub fn append_note(&mut self, note: &str) {
        append_fragment(&mut self.notes, note);
    }
}

/// A named, ordered chain of relationship steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub steps: Vec<String>,
}

/// Everything the extractor produces for one fact stream.
#[derive(Debug, Clone, Default)]
pub struct DslExtractionResult {
    pub terms: Vec<DslTerm>,
    pub relationships: Vec<DslRelationship>,
    pub workflows: Vec<Workflow>,
    pub external_dependencies: Vec<DslTerm>,
    pub extraction_notes: Vec<String>,
    /// Source facts, passed through for convention checks.
    pub facts: Vec<AstFact>,
}

impl DslExtractionResult {
    pub fn find_term(&self, name: &str) -> Option<&DslTerm> {
        self.terms.iter().find(|t| t.name == name)
    }

    pub fn find_external(&self, name: &str) -> Option<&DslTerm> {
        self.external_dependencies.iter().find(|t| t.name == name)
    }
}

fn append_fragment(target: &mut String, fragment: &str) {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return;
    }
    if target.is_empty() {
        target.push_str(fragment);
    } else if !target.contains(fragment) {
        target.push_str(" | ");
        target.push_str(fragment);
    }
}

fn add_unique(list: &mut Vec<String>, value: &str) {
    if value.is_empty() || list.iter().any(|existing| existing == value) {
        return;
    }
    list.push(value.to_string());
}
