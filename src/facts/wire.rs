//! JSON shape of fact documents written by the external indexer.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{decode_kind, AstFact, FactIndex, TargetScope};

/// One fact as it appears on the wire, with the kind still a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFact {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub source_location: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub descriptor: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub scope_path: String,
    #[serde(default)]
    pub doc_comment: String,
    #[serde(default)]
    pub subject_in_project: bool,
    #[serde(default)]
    pub target_scope: TargetScope,
    #[serde(default)]
    pub target_location: String,
}

impl From<WireFact> for AstFact {
    fn from(wire: WireFact) -> Self {
        let (kind, packed_descriptor) = decode_kind(&wire.kind, &wire.target);
        let descriptor = if wire.descriptor.is_empty() {
            packed_descriptor.unwrap_or_default()
        } else {
            wire.descriptor
        };
        AstFact {
            name: wire.name,
            kind,
            source_location: wire.source_location,
            range: wire.range,
            signature: wire.signature,
            descriptor,
            scope_path: wire.scope_path,
            doc_comment: wire.doc_comment,
            subject_in_project: wire.subject_in_project,
            target_scope: wire.target_scope,
            target_location: wire.target_location,
        }
    }
}

impl From<&AstFact> for WireFact {
    fn from(fact: &AstFact) -> Self {
        WireFact {
            name: fact.name.clone(),
            kind: fact.kind.tag().to_string(),
            source_location: fact.source_location.clone(),
            range: fact.range.clone(),
            signature: fact.signature.clone(),
            descriptor: fact.descriptor.clone(),
            target: fact.target().to_string(),
            scope_path: fact.scope_path.clone(),
            doc_comment: fact.doc_comment.clone(),
            subject_in_project: fact.subject_in_project,
            target_scope: fact.target_scope,
            target_location: fact.target_location.clone(),
        }
    }
}

/// A complete fact document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactDocument {
    #[serde(default)]
    pub toolchain: String,
    #[serde(default)]
    pub project_root: String,
    #[serde(default)]
    pub facts: Vec<WireFact>,
}

impl FactDocument {
    /// Parse a fact document from a JSON file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let document: FactDocument = serde_json::from_str(&content)?;
        Ok(document)
    }

    pub fn from_index(index: &FactIndex, toolchain: &str) -> Self {
        Self {
            toolchain: toolchain.to_string(),
            project_root: index.project_root.clone(),
            facts: index.facts.iter().map(WireFact::from).collect(),
        }
    }

    /// Decode into a [`FactIndex`], preserving fact order.
    pub fn into_index(self) -> FactIndex {
        FactIndex {
            facts: self.facts.into_iter().map(AstFact::from).collect(),
            project_root: self.project_root,
        }
    }
}
