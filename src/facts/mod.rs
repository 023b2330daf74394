//! Low-level symbol facts and the canonical naming rules shared by every
//! later stage.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Fact producer   │────▶│ Wire decode  │────▶│ FactIndex     │
//! │ (JSON / cache)  │     │ (FactKind)   │     │ (AstFact seq) │
//! └─────────────────┘     └──────────────┘     └───────────────┘
//!                                                      │
//!                                                      ▼
//!                                              ┌───────────────┐
//!                                              │ Extractor     │
//!                                              └───────────────┘
//! ```
//!
//! Raw `kind` strings only exist at the boundary. Everything downstream of
//! [`decode_kind`] matches on [`FactKind`].

mod canonical;
mod types;
mod wire;

pub use canonical::{canonicalize, has_namespace_prefix, NAMESPACE_DELIMITER};
pub use types::{
    decode_kind, AstFact, DeclarationKind, FactIndex, FactKind, MutationTag, ReferenceForm,
    TargetScope,
};
pub use wire::{FactDocument, WireFact};
