//! Scope filter: which facts describe in-project symbols.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::facts::{canonicalize, has_namespace_prefix, AstFact, TargetScope};

/// Namespaces ignored unless the caller overrides the defaults.
pub const DEFAULT_IGNORED_NAMESPACES: &[&str] = &["std", "testing", "gtest"];

/// Namespace filtering settings for one extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Caller-supplied namespace prefixes to ignore.
    #[serde(default)]
    pub ignored_namespaces: Vec<String>,
    /// Scaffolding namespaces ignored in addition to `ignored_namespaces`.
    #[serde(default = "default_ignored_namespaces")]
    pub default_ignored_namespaces: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            ignored_namespaces: Vec::new(),
            default_ignored_namespaces: default_ignored_namespaces(),
        }
    }
}

impl ScopeConfig {
    pub fn with_ignored(namespaces: &[&str]) -> Self {
        Self {
            ignored_namespaces: namespaces.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Defaults plus caller entries, canonicalized and deduplicated.
    pub fn effective_namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<String> = Vec::new();
        for namespace in self
            .default_ignored_namespaces
            .iter()
            .chain(self.ignored_namespaces.iter())
        {
            let canonical = canonicalize(namespace.trim());
            if !canonical.is_empty() && !namespaces.contains(&canonical) {
                namespaces.push(canonical);
            }
        }
        namespaces
    }
}

fn default_ignored_namespaces() -> Vec<String> {
    DEFAULT_IGNORED_NAMESPACES
        .iter()
        .map(|n| n.to_string())
        .collect()
}

/// Classifies facts as in-project, ignorable, or external.
///
/// Built once per extraction from the full fact list.
pub struct ScopeFilter {
    ignored_namespaces: Vec<String>,
    known_symbols: HashSet<String>,
}

impl ScopeFilter {
    pub fn new(facts: &[AstFact], config: &ScopeConfig) -> Self {
        let ignored_namespaces = config.effective_namespaces();
        let mut filter = Self {
            ignored_namespaces,
            known_symbols: HashSet::new(),
        };

        for fact in facts {
            if !fact.subject_in_project || fact.kind.declaration().is_none() {
                continue;
            }
            let canonical = canonicalize(&fact.name);
            if !filter.is_ignored(&canonical) {
                filter.known_symbols.insert(canonical);
            }
        }

        filter
    }

    /// Whether a name falls under an ignored namespace.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_namespaces
            .iter()
            .any(|namespace| has_namespace_prefix(name, namespace))
    }

    /// Whether the canonical name was declared in the project.
    pub fn is_known_symbol(&self, name: &str) -> bool {
        self.known_symbols.contains(&canonicalize(name))
    }

    pub fn known_symbol_count(&self) -> usize {
        self.known_symbols.len()
    }

    pub fn subject_in_scope(&self, fact: &AstFact) -> bool {
        !self.is_ignored(&fact.name) && self.is_known_symbol(&fact.name)
    }

    pub fn target_in_scope(&self, fact: &AstFact) -> bool {
        let target = fact.target();
        if target.is_empty() || self.is_ignored(target) {
            return false;
        }
        match fact.target_scope {
            TargetScope::External => false,
            TargetScope::InProject => true,
            TargetScope::Unspecified => true,
            TargetScope::Unknown => self.is_known_symbol(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{DeclarationKind, FactKind};

    fn declaration(name: &str, in_project: bool) -> AstFact {
        let mut fact = AstFact::new(name, FactKind::Declaration(DeclarationKind::Function));
        fact.subject_in_project = in_project;
        fact
    }

    fn call(name: &str, target: &str, scope: TargetScope) -> AstFact {
        let mut fact = AstFact::new(name, FactKind::call(target));
        fact.subject_in_project = true;
        fact.target_scope = scope;
        fact
    }

    #[test]
    fn test_known_symbols_require_project_declarations() {
        let facts = vec![
            declaration("Foo", true),
            declaration("Vendored", false),
            call("Foo", "Bar", TargetScope::InProject),
        ];
        let filter = ScopeFilter::new(&facts, &ScopeConfig::default());

        assert!(filter.subject_in_scope(&facts[0]));
        assert!(!filter.subject_in_scope(&facts[1]));
        assert!(filter.subject_in_scope(&facts[2]));
        assert_eq!(filter.known_symbol_count(), 1);
    }

    #[test]
    fn test_default_namespaces_are_ignored() {
        let facts = vec![declaration("std::Vector", true), declaration("stdx::Thing", true)];
        let filter = ScopeFilter::new(&facts, &ScopeConfig::default());

        assert!(!filter.subject_in_scope(&facts[0]));
        assert!(filter.subject_in_scope(&facts[1]));
    }

    #[test]
    fn test_defaults_are_overridable() {
        let facts = vec![declaration("gtest::Suite", true)];
        let config = ScopeConfig {
            ignored_namespaces: vec!["custom".to_string()],
            default_ignored_namespaces: Vec::new(),
        };
        let filter = ScopeFilter::new(&facts, &config);

        assert!(filter.subject_in_scope(&facts[0]));
        assert!(filter.is_ignored("custom::Thing"));
    }

    #[test]
    fn test_target_scope_resolution() {
        let facts = vec![declaration("Foo", true), declaration("Bar", true)];
        let filter = ScopeFilter::new(&facts, &ScopeConfig::default());

        assert!(filter.target_in_scope(&call("Foo", "Anything", TargetScope::InProject)));
        assert!(!filter.target_in_scope(&call("Foo", "Bar", TargetScope::External)));
        assert!(filter.target_in_scope(&call("Foo", "Bar", TargetScope::Unknown)));
        assert!(!filter.target_in_scope(&call("Foo", "Mystery", TargetScope::Unknown)));
        assert!(filter.target_in_scope(&call("Foo", "Mystery", TargetScope::Unspecified)));
        assert!(!filter.target_in_scope(&call("Foo", "testing::Do", TargetScope::InProject)));
        assert!(!filter.target_in_scope(&call("Foo", "", TargetScope::InProject)));
    }
}
