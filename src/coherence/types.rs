//! Core types for coherence findings.

use serde::{Deserialize, Serialize};

/// Overall verdict for an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Clean,
    Incoherent,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Clean => write!(f, "clean"),
            Severity::Incoherent => write!(f, "incoherent"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clean" => Ok(Severity::Clean),
            "incoherent" => Ok(Severity::Incoherent),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Rule names for the coherence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingRule {
    #[serde(rename = "duplicate_term")]
    DuplicateTerm,
    #[serde(rename = "missing_relationships")]
    MissingRelationships,
    #[serde(rename = "ambiguous_alias")]
    AmbiguousAlias,
    #[serde(rename = "conflicting_verbs")]
    ConflictingVerbs,
    #[serde(rename = "high_usage_orphan")]
    HighUsageOrphan,
    #[serde(rename = "canonicalization_inconsistency")]
    CanonicalizationInconsistency,
    // Naming convention rules
    #[serde(rename = "getter_convention")]
    GetterConvention,
    #[serde(rename = "setter_convention")]
    SetterConvention,
    #[serde(rename = "predicate_convention")]
    PredicateConvention,
    #[serde(rename = "lifecycle_pairing")]
    LifecyclePairing,
}

impl FindingRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingRule::DuplicateTerm => "duplicate_term",
            FindingRule::MissingRelationships => "missing_relationships",
            FindingRule::AmbiguousAlias => "ambiguous_alias",
            FindingRule::ConflictingVerbs => "conflicting_verbs",
            FindingRule::HighUsageOrphan => "high_usage_orphan",
            FindingRule::CanonicalizationInconsistency => "canonicalization_inconsistency",
            FindingRule::GetterConvention => "getter_convention",
            FindingRule::SetterConvention => "setter_convention",
            FindingRule::PredicateConvention => "predicate_convention",
            FindingRule::LifecyclePairing => "lifecycle_pairing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "duplicate_term" => Some(FindingRule::DuplicateTerm),
            "missing_relationships" => Some(FindingRule::MissingRelationships),
            "ambiguous_alias" => Some(FindingRule::AmbiguousAlias),
            "conflicting_verbs" => Some(FindingRule::ConflictingVerbs),
            "high_usage_orphan" => Some(FindingRule::HighUsageOrphan),
            "canonicalization_inconsistency" => Some(FindingRule::CanonicalizationInconsistency),
            "getter_convention" => Some(FindingRule::GetterConvention),
            "setter_convention" => Some(FindingRule::SetterConvention),
            "predicate_convention" => Some(FindingRule::PredicateConvention),
            "lifecycle_pairing" => Some(FindingRule::LifecyclePairing),
            _ => None,
        }
    }
}

impl std::fmt::Display for FindingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single coherence problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: FindingRule,
    /// Term, alias, or `subject->object` pair the finding is about.
    pub term: String,
    /// Short statement of the conflict.
    pub conflict: String,
    pub description: String,
    pub examples: Vec<String>,
    pub suggested_canonical_form: String,
}

impl Finding {
    /// Create a finding whose description repeats the conflict and whose
    /// suggested form is the term itself.
    pub fn new(rule: FindingRule, term: impl Into<String>, conflict: impl Into<String>) -> Self {
        let term = term.into();
        let conflict = conflict.into();
        Self {
            rule,
            suggested_canonical_form: term.clone(),
            description: conflict.clone(),
            term,
            conflict,
            examples: Vec::new(),
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        let example = example.into();
        if !example.is_empty() {
            self.examples.push(example);
        }
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for example in examples {
            self = self.with_example(example);
        }
        self
    }

    pub fn suggest(mut self, canonical_form: impl Into<String>) -> Self {
        self.suggested_canonical_form = canonical_form.into();
        self
    }

    /// Create a unique key for this finding (for deduplication/comparison).
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.rule, self.term, self.conflict)
    }
}

/// Result of a coherence analysis.
///
/// `severity` is `Incoherent` exactly when `findings` is non-empty; use
/// [`CoherenceResult::add_finding`] or [`CoherenceResult::from_findings`]
/// to keep the two in step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoherenceResult {
    pub findings: Vec<Finding>,
    pub severity: Severity,
}

impl CoherenceResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let severity = if findings.is_empty() {
            Severity::Clean
        } else {
            Severity::Incoherent
        };
        Self { findings, severity }
    }

    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
        self.severity = Severity::Incoherent;
    }

    pub fn is_incoherent(&self) -> bool {
        self.severity == Severity::Incoherent
    }

    /// Findings produced by one rule, in order.
    pub fn findings_for(&self, rule: FindingRule) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.rule == rule)
    }
}
