//! Workflow synthesis over the relationship graph.

use std::collections::{BTreeMap, HashSet};

use super::types::{DslRelationship, Workflow};

/// Name of the catch-all workflow used when no root-driven walk applies.
pub const FALLBACK_WORKFLOW_NAME: &str = "Heuristic relationships";

/// Build workflows from relationships sorted by (subject, verb, object).
///
/// Every root (a subject with no incoming edge) is walked depth-first with
/// an explicit stack. Each relationship is visited at most once, so cycles
/// terminate. Relationships left unvisited are appended to the first
/// workflow, or collected into a single fallback workflow if no root
/// produced one.
pub fn synthesize_workflows(relationships: &[DslRelationship]) -> Vec<Workflow> {
    if relationships.is_empty() {
        return Vec::new();
    }

    let mut adjacency: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut objects: HashSet<&str> = HashSet::new();
    for (index, rel) in relationships.iter().enumerate() {
        adjacency.entry(rel.subject.as_str()).or_default().push(index);
        objects.insert(rel.object.as_str());
    }

    let mut visited = vec![false; relationships.len()];
    let mut workflows = Vec::new();

    for root in adjacency.keys().copied().filter(|s| !objects.contains(s)) {
        let mut steps = Vec::new();
        // Each frame is (node, index of the next outgoing edge to try).
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let edges = adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]);
            if cursor >= edges.len() {
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let rel_index = edges[cursor];
            if visited[rel_index] {
                continue;
            }
            visited[rel_index] = true;

            let rel = &relationships[rel_index];
            steps.push(rel.step());
            stack.push((rel.object.as_str(), 0));
        }

        if !steps.is_empty() {
            workflows.push(Workflow {
                name: format!("{} workflow", root),
                steps,
            });
        }
    }

    let unvisited: Vec<String> = relationships
        .iter()
        .zip(&visited)
        .filter(|(_, seen)| !**seen)
        .map(|(rel, _)| rel.step())
        .collect();

    if unvisited.is_empty() {
        return workflows;
    }

    match workflows.first_mut() {
        Some(first) => first.steps.extend(unvisited),
        None => workflows.push(Workflow {
            name: FALLBACK_WORKFLOW_NAME.to_string(),
            steps: relationships.iter().map(DslRelationship::step).collect(),
        }),
    }

    workflows
}
