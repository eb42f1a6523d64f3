//! Immutable technology graph.
//!
//! Prerequisite and descendant adjacency plus per-family level bounds,
//! built once from the technology set and passed by reference into
//! every component that needs it. Transitive prerequisite closures are
//! precomputed in dependency order, so instant completion never walks
//! the graph afresh.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::errors::{QueueError, QueueResult};

use super::technology::Technology;

/// Cached adjacency over the technology set.
#[derive(Debug, Clone, Default)]
pub struct TechGraph {
    prerequisites: HashMap<String, Vec<String>>,
    descendants: HashMap<String, Vec<String>>,
    closures: HashMap<String, Vec<String>>,
    bounds: HashMap<String, (u32, u32)>,
}

// Standalone helper for cycle detection (no self needed)
fn detect_cycle_util(
    node: &str,
    graph: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> bool {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(neighbors) = graph.get(node) {
        for neighbor in neighbors {
            if !visited.contains(neighbor) {
                if detect_cycle_util(neighbor, graph, visited, rec_stack, path) {
                    return true;
                }
            } else if rec_stack.contains(neighbor) {
                // Cycle detected
                if let Some(cycle_start) = path.iter().position(|n| n == neighbor) {
                    path.drain(0..cycle_start);
                    path.push(neighbor.clone());
                    return true;
                }
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    false
}

// Standalone helper building a transitive closure in dependency order
fn build_closure(
    node: &str,
    prerequisites: &HashMap<String, Vec<String>>,
    seen: &mut HashSet<String>,
    out: &mut Vec<String>,
) {
    if let Some(prereqs) = prerequisites.get(node) {
        for prereq in prereqs {
            if seen.insert(prereq.clone()) {
                build_closure(prereq, prerequisites, seen, out);
                out.push(prereq.clone());
            }
        }
    }
}

impl TechGraph {
    /// Build the graph from the technology set.
    ///
    /// Fails with [`QueueError::DependencyCycle`] on cyclic prerequisite
    /// declarations and [`QueueError::UnknownTechnology`] when a
    /// prerequisite names a technology that does not exist.
    pub fn build(technologies: &BTreeMap<String, Technology>) -> QueueResult<Self> {
        let mut prerequisites: HashMap<String, Vec<String>> = HashMap::new();
        let mut descendants: HashMap<String, Vec<String>> = HashMap::new();
        let mut bounds = HashMap::new();

        for tech in technologies.values() {
            for prereq in &tech.prerequisites {
                if !technologies.contains_key(prereq) {
                    return Err(QueueError::UnknownTechnology(prereq.clone()));
                }
                descendants
                    .entry(prereq.clone())
                    .or_default()
                    .push(tech.name.clone());
            }
            prerequisites.insert(tech.name.clone(), tech.prerequisites.clone());
            bounds.insert(tech.name.clone(), (tech.min_level, tech.max_level));
        }

        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();
        for name in technologies.keys() {
            if !visited.contains(name)
                && detect_cycle_util(name, &prerequisites, &mut visited, &mut rec_stack, &mut path)
            {
                return Err(QueueError::DependencyCycle(path));
            }
        }

        let mut closures = HashMap::new();
        for name in technologies.keys() {
            let mut seen = HashSet::new();
            let mut closure = Vec::new();
            build_closure(name, &prerequisites, &mut seen, &mut closure);
            closures.insert(name.clone(), closure);
        }

        Ok(Self {
            prerequisites,
            descendants,
            closures,
            bounds,
        })
    }

    /// Direct prerequisites in declared order.
    pub fn prerequisites_of(&self, name: &str) -> &[String] {
        self.prerequisites.get(name).map_or(&[], Vec::as_slice)
    }

    /// Technologies that name `name` as a direct prerequisite.
    pub fn descendants_of(&self, name: &str) -> &[String] {
        self.descendants.get(name).map_or(&[], Vec::as_slice)
    }

    /// Level bounds `(min, max)` for a family.
    pub fn bounds_of(&self, name: &str) -> Option<(u32, u32)> {
        self.bounds.get(name).copied()
    }

    /// Transitive prerequisite closure in dependency order, deepest first.
    pub fn closure_of(&self, name: &str) -> &[String] {
        self.closures.get(name).map_or(&[], Vec::as_slice)
    }

    /// Whether the graph knows this family.
    pub fn contains(&self, name: &str) -> bool {
        self.bounds.contains_key(name)
    }
}
