//! Naming-convention and lifecycle checks over raw facts.
//!
//! Functions are grouped by canonical name. Prefix tests use the last
//! scope segment, so `Account::GetBalance` is treated as a getter.

use std::collections::BTreeMap;

use crate::facts::{canonicalize, AstFact, DeclarationKind, FactKind, NAMESPACE_DELIMITER};

use super::types::{Finding, FindingRule};

pub const GETTER_MUTATES: &str = "Getter mutates state";
pub const GETTER_RETURNS_VOID: &str = "Getter returns void; expected a value result";
pub const SETTER_LACKS_MUTATIONS: &str = "Setter lacks mutations";
pub const PREDICATE_NOT_BOOL: &str = "Predicate does not return bool";
pub const PREDICATE_MUTATES: &str = "Predicate mutates state";
pub const LIFECYCLE_MISMATCH: &str =
    "Lifecycle mismatch: opens or inits resource without closing it.";

/// Prefixes that acquire a resource.
const OPENERS: &[&str] = &["open", "init"];
/// Prefixes that release one.
const CLOSERS: &[&str] = &["close", "teardown"];

/// Declaration specifiers ignored when classifying a return type.
const SPECIFIERS: &[&str] = &[
    "static",
    "inline",
    "virtual",
    "constexpr",
    "consteval",
    "explicit",
    "extern",
    "const",
    "[[nodiscard]]",
];

/// Return type of a C-like signature, or `""` when it has none.
///
/// `"static bool Foo::IsReady() const"` gives `"static bool"`.
pub fn parse_return_type(signature: &str) -> &str {
    let Some((head, _)) = signature.split_once('(') else {
        return "";
    };
    match head.trim().rsplit_once(' ') {
        Some((return_type, _name)) => return_type.trim(),
        None => "",
    }
}

fn core_type(return_type: &str) -> String {
    return_type
        .split_whitespace()
        .filter(|token| !SPECIFIERS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_void_type(return_type: &str) -> bool {
    core_type(return_type) == "void"
}

pub fn is_bool_type(return_type: &str) -> bool {
    matches!(core_type(return_type).as_str(), "bool" | "_Bool")
}

/// Last scope segment of a canonical name.
fn local_name(canonical: &str) -> &str {
    canonical
        .rsplit(NAMESPACE_DELIMITER)
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
}

#[derive(Default)]
struct FunctionFacts<'a> {
    declarations: Vec<&'a AstFact>,
    mutations: Vec<&'a AstFact>,
}

impl FunctionFacts<'_> {
    fn return_types(&self) -> impl Iterator<Item = &str> {
        self.declarations
            .iter()
            .map(|fact| parse_return_type(&fact.signature))
            .filter(|rt| !rt.is_empty())
    }

    fn first_evidence(&self) -> &str {
        self.declarations
            .first()
            .map(|fact| fact.preferred_evidence())
            .unwrap_or("")
    }

    fn mutation_evidence(&self) -> Vec<String> {
        self.mutations
            .iter()
            .map(|fact| fact.preferred_evidence().to_string())
            .collect()
    }
}

fn group_functions(facts: &[AstFact]) -> BTreeMap<String, FunctionFacts<'_>> {
    let mut functions: BTreeMap<String, FunctionFacts<'_>> = BTreeMap::new();
    for fact in facts {
        match &fact.kind {
            FactKind::Declaration(DeclarationKind::Function) => functions
                .entry(canonicalize(&fact.name))
                .or_default()
                .declarations
                .push(fact),
            FactKind::Mutation { .. } => functions
                .entry(canonicalize(&fact.name))
                .or_default()
                .mutations
                .push(fact),
            _ => {}
        }
    }
    // Mutations alone do not make a function.
    functions.retain(|_, f| !f.declarations.is_empty());
    functions
}

/// Getter, setter and predicate checks.
pub fn accessor_conventions(facts: &[AstFact]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (name, function) in group_functions(facts) {
        let local = local_name(&name);
        let mutates = !function.mutations.is_empty();

        if local.starts_with("get") {
            if mutates {
                findings.push(
                    Finding::new(FindingRule::GetterConvention, &name, GETTER_MUTATES)
                        .with_examples(function.mutation_evidence()),
                );
            }
            if function.return_types().any(is_void_type) {
                findings.push(
                    Finding::new(FindingRule::GetterConvention, &name, GETTER_RETURNS_VOID)
                        .with_example(function.first_evidence()),
                );
            }
        } else if local.starts_with("set") {
            if !mutates {
                findings.push(
                    Finding::new(FindingRule::SetterConvention, &name, SETTER_LACKS_MUTATIONS)
                        .with_example(function.first_evidence()),
                );
            }
        } else if local.starts_with("is") || local.starts_with("has") {
            if let Some(return_type) = function.return_types().find(|rt| !is_bool_type(rt)) {
                findings.push(
                    Finding::new(FindingRule::PredicateConvention, &name, PREDICATE_NOT_BOOL)
                        .with_example(format!("returns {}", return_type))
                        .with_example(function.first_evidence()),
                );
            }
            if mutates {
                findings.push(
                    Finding::new(FindingRule::PredicateConvention, &name, PREDICATE_MUTATES)
                        .with_examples(function.mutation_evidence()),
                );
            }
        }
    }

    findings
}

/// Resource suffix acquired by a call target, if it opens something.
fn opened_suffix(target: &str) -> Option<&str> {
    OPENERS.iter().find_map(|prefix| target.strip_prefix(prefix))
}

fn closes(target: &str, suffix: &str) -> bool {
    CLOSERS.iter().any(|prefix| {
        target
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(suffix))
    })
}

/// Per-caller open/init calls without a matching close/teardown.
pub fn lifecycle_pairing(facts: &[AstFact]) -> Vec<Finding> {
    // caller -> (local target name, call fact) in fact order
    let mut calls: BTreeMap<String, Vec<(String, &AstFact)>> = BTreeMap::new();
    for fact in facts.iter().filter(|f| f.kind.is_call()) {
        let target = canonicalize(fact.target());
        let local = local_name(&target).to_string();
        if local.is_empty() {
            continue;
        }
        calls
            .entry(canonicalize(&fact.name))
            .or_default()
            .push((local, fact));
    }

    let mut findings = Vec::new();
    for (caller, targets) in &calls {
        let mut reported: Vec<&str> = Vec::new();
        for (target, fact) in targets {
            let Some(suffix) = opened_suffix(target) else {
                continue;
            };
            if reported.contains(&target.as_str()) {
                continue;
            }
            if targets.iter().any(|(other, _)| closes(other, suffix)) {
                continue;
            }
            reported.push(target);
            findings.push(
                Finding::new(FindingRule::LifecyclePairing, caller, LIFECYCLE_MISMATCH)
                    .with_example(format!("{} calls {}", caller, fact.target()))
                    .with_example(fact.preferred_evidence()),
            );
        }
    }

    findings
}
