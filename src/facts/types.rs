//! Core fact types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the target of a relationship-like fact lives.
///
/// `Unknown` means the producer looked and could not tell; the target is
/// then checked against project declarations. `Unspecified` means the
/// producer never said, and the target is taken as in scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetScope {
    InProject,
    External,
    Unknown,
    #[default]
    #[serde(alias = "")]
    Unspecified,
}

/// Declaration flavours that define a project symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Function,
    Type,
    Variable,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "function",
            DeclarationKind::Type => "type",
            DeclarationKind::Variable => "variable",
        }
    }

    /// Types and variables name things; functions name actions.
    pub fn is_entity(&self) -> bool {
        matches!(self, DeclarationKind::Type | DeclarationKind::Variable)
    }
}

/// Spellings of a pure symbol reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceForm {
    Reference,
    Alias,
    SymbolReference,
}

impl ReferenceForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceForm::Reference => "reference",
            ReferenceForm::Alias => "alias",
            ReferenceForm::SymbolReference => "symbol_reference",
        }
    }
}

/// Spellings of a state-changing observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationTag {
    Mutation,
    Assignment,
    StateChange,
}

impl MutationTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationTag::Mutation => "mutation",
            MutationTag::Assignment => "assignment",
            MutationTag::StateChange => "state_change",
        }
    }
}

/// What a fact observes, decoded once from the raw kind string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FactKind {
    Declaration(DeclarationKind),
    Call { target: String },
    TypeUsage { target: String },
    Ownership { target: String },
    Reference { form: ReferenceForm, target: String },
    Mutation { tag: MutationTag, target: String },
    /// Any kind the producer emits that has no dedicated variant.
    Other { tag: String, target: String },
}

impl FactKind {
    pub fn call(target: impl Into<String>) -> Self {
        FactKind::Call {
            target: target.into(),
        }
    }

    pub fn type_usage(target: impl Into<String>) -> Self {
        FactKind::TypeUsage {
            target: target.into(),
        }
    }

    pub fn ownership(target: impl Into<String>) -> Self {
        FactKind::Ownership {
            target: target.into(),
        }
    }

    pub fn reference(form: ReferenceForm, target: impl Into<String>) -> Self {
        FactKind::Reference {
            form,
            target: target.into(),
        }
    }

    pub fn mutation(tag: MutationTag) -> Self {
        FactKind::Mutation {
            tag,
            target: String::new(),
        }
    }

    /// The raw kind tag, as producers and the cache spell it.
    pub fn tag(&self) -> &str {
        match self {
            FactKind::Declaration(kind) => kind.as_str(),
            FactKind::Call { .. } => "call",
            FactKind::TypeUsage { .. } => "type_usage",
            FactKind::Ownership { .. } => "owns",
            FactKind::Reference { form, .. } => form.as_str(),
            FactKind::Mutation { tag, .. } => tag.as_str(),
            FactKind::Other { tag, .. } => tag,
        }
    }

    /// Relationship target, or `""` for kinds without one.
    pub fn target(&self) -> &str {
        match self {
            FactKind::Declaration(_) => "",
            FactKind::Call { target }
            | FactKind::TypeUsage { target }
            | FactKind::Ownership { target }
            | FactKind::Reference { target, .. }
            | FactKind::Mutation { target, .. }
            | FactKind::Other { target, .. } => target,
        }
    }

    /// Relationship verb label for this kind.
    pub fn verb(&self) -> &str {
        match self {
            FactKind::Call { .. } => "calls",
            FactKind::TypeUsage { .. } => "uses-type",
            FactKind::Ownership { .. } => "owns",
            other => other.tag(),
        }
    }

    pub fn declaration(&self) -> Option<DeclarationKind> {
        match self {
            FactKind::Declaration(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FactKind::Reference { .. })
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, FactKind::Mutation { .. })
    }

    pub fn is_call(&self) -> bool {
        matches!(self, FactKind::Call { .. })
    }

    /// Whether a term first seen through this kind names a thing rather
    /// than an action.
    pub fn names_entity(&self) -> bool {
        match self {
            FactKind::Declaration(kind) => kind.is_entity(),
            _ => false,
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Decode a raw `kind` string and `target` column into a [`FactKind`].
///
/// Accepts the packed legacy form `base[:target][|descriptor]`. An explicit
/// `raw_target` wins over a packed one. The packed descriptor, if any, is
/// returned so the caller can fill an empty descriptor field.
pub fn decode_kind(raw_kind: &str, raw_target: &str) -> (FactKind, Option<String>) {
    let raw_kind = raw_kind.trim();
    let (head, packed_descriptor) = match raw_kind.split_once('|') {
        Some((head, descriptor)) => (head, Some(descriptor.to_string())),
        None => (raw_kind, None),
    };
    let (base, packed_target) = match head.split_once(':') {
        Some((base, target)) => (base, target),
        None => (head, ""),
    };
    let target = if raw_target.is_empty() {
        packed_target.to_string()
    } else {
        raw_target.to_string()
    };

    let kind = match base {
        "function" => FactKind::Declaration(DeclarationKind::Function),
        "type" => FactKind::Declaration(DeclarationKind::Type),
        "variable" => FactKind::Declaration(DeclarationKind::Variable),
        "call" => FactKind::Call { target },
        "type_usage" => FactKind::TypeUsage { target },
        "owns" => FactKind::Ownership { target },
        "reference" => FactKind::Reference {
            form: ReferenceForm::Reference,
            target,
        },
        "alias" => FactKind::Reference {
            form: ReferenceForm::Alias,
            target,
        },
        "symbol_reference" => FactKind::Reference {
            form: ReferenceForm::SymbolReference,
            target,
        },
        "mutation" => FactKind::Mutation {
            tag: MutationTag::Mutation,
            target,
        },
        "assignment" => FactKind::Mutation {
            tag: MutationTag::Assignment,
            target,
        },
        "state_change" => FactKind::Mutation {
            tag: MutationTag::StateChange,
            target,
        },
        other => FactKind::Other {
            tag: other.to_string(),
            target,
        },
    };

    (kind, packed_descriptor.filter(|d| !d.is_empty()))
}

/// One observation emitted by source indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstFact {
    pub name: String,
    pub kind: FactKind,
    pub source_location: String,
    pub range: String,
    pub signature: String,
    pub descriptor: String,
    pub scope_path: String,
    pub doc_comment: String,
    pub subject_in_project: bool,
    pub target_scope: TargetScope,
    pub target_location: String,
}

impl AstFact {
    /// Create a fact with every optional field empty.
    pub fn new(name: impl Into<String>, kind: FactKind) -> Self {
        Self {
            name: name.into(),
            kind,
            source_location: String::new(),
            range: String::new(),
            signature: String::new(),
            descriptor: String::new(),
            scope_path: String::new(),
            doc_comment: String::new(),
            subject_in_project: false,
            target_scope: TargetScope::Unspecified,
            target_location: String::new(),
        }
    }

    pub fn target(&self) -> &str {
        self.kind.target()
    }

    /// Evidence string `source_location[@range][@scope_path]`, skipping
    /// empty components.
    pub fn evidence_location(&self) -> String {
        [
            self.source_location.as_str(),
            self.range.as_str(),
            self.scope_path.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("@")
    }

    /// Best single evidence string: location, else descriptor, else signature.
    pub fn preferred_evidence(&self) -> &str {
        if !self.source_location.is_empty() {
            &self.source_location
        } else if !self.descriptor.is_empty() {
            &self.descriptor
        } else {
            &self.signature
        }
    }
}

/// Ordered fact stream for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactIndex {
    pub facts: Vec<AstFact>,
    pub project_root: String,
}

impl FactIndex {
    pub fn new(facts: Vec<AstFact>) -> Self {
        Self {
            facts,
            project_root: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
