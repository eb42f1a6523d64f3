//! Prerequisite expansion for queue admission.
//!
//! Turns a requested `(technology, level)` into an ordered, validated
//! admission plan. Resolution is side-effect-free: every failure is
//! returned before the queue is touched, so admission is all-or-nothing.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::domain::errors::{QueueError, QueueResult};
use crate::domain::models::{
    Force, QueueConfig, QueueItem, TechGraph, Technology, TraversalStrategy,
};

/// Where an admission lands in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The chain becomes the next work; existing prerequisites are
    /// reordered to the front.
    Front,
    /// The chain is appended behind everything already queued.
    Back,
}

/// One step of a validated admission plan, in dependency order.
#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionStep {
    /// Move an already-queued item (by key) toward the front.
    Requeue(String),
    /// Insert a new item.
    Insert(QueueItem),
}

/// A validated, side-effect-free admission plan.
///
/// Steps are in dependency order: the deepest unmet prerequisite first,
/// the requested item last.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub steps: Vec<AdmissionStep>,
}

impl Resolution {
    /// Number of new items the plan would insert.
    pub fn inserts(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AdmissionStep::Insert(_)))
            .count()
    }

    /// Whether the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Expands an admission request into its unmet prerequisite chain.
#[derive(Debug, Clone, Copy)]
pub struct PrerequisiteResolver<'a> {
    graph: &'a TechGraph,
}

impl<'a> PrerequisiteResolver<'a> {
    pub fn new(graph: &'a TechGraph) -> Self {
        Self { graph }
    }

    /// Resolve a request into an ordered admission plan.
    ///
    /// Both strategies produce the same admission order for chains:
    /// the deepest unmet dependency lands nearest the front, and the
    /// requested item behind everything it depends on. A prerequisite
    /// found disabled aborts before any mutation; an exact duplicate is
    /// a reorder request for front placement and an error for back
    /// placement.
    pub fn resolve(
        &self,
        force: &Force,
        name: &str,
        target_level: Option<u32>,
        strategy: TraversalStrategy,
        placement: Placement,
        config: &QueueConfig,
    ) -> QueueResult<Resolution> {
        let tech = force
            .technology(name)
            .ok_or_else(|| QueueError::UnknownTechnology(name.to_string()))?;
        if tech.researched {
            return Err(QueueError::AlreadyResearched(name.to_string()));
        }
        if tech.is_disabled() {
            return Err(QueueError::Disabled(name.to_string()));
        }
        if placement == Placement::Front && tech.requires_trigger() {
            return Err(QueueError::UnableToQueue(name.to_string()));
        }

        let target = target_level.unwrap_or(tech.max_level).min(tech.max_level);
        if placement == Placement::Back && force.queue.contains_key(&tech.queue_key(target)) {
            return Err(QueueError::AlreadyInQueue(tech.queue_key(target)));
        }

        let mut steps = Vec::new();
        match strategy {
            TraversalStrategy::DepthFirst => {
                let mut visited = HashSet::new();
                expand_depth_first(self.graph, force, name, name, &mut visited, &mut steps)?;
            }
            TraversalStrategy::BreadthFirst => {
                expand_breadth_first(self.graph, force, name, &mut steps)?;
            }
        }
        push_levels(force, tech, target, &mut steps);

        let resolution = Resolution { steps };
        let inserts = resolution.inserts();
        if inserts > config.max_queue_size {
            return Err(QueueError::TooManyPrerequisites {
                name: name.to_string(),
                required: inserts,
                limit: config.max_queue_size,
            });
        }
        if force.queue.len() + inserts > config.max_queue_size {
            return Err(QueueError::QueueFull {
                limit: config.max_queue_size,
            });
        }

        debug!(
            technology = name,
            strategy = strategy.as_str(),
            inserts,
            steps = resolution.steps.len(),
            "admission resolved"
        );
        Ok(resolution)
    }

    /// Complete a technology outside the queue.
    ///
    /// Marks the precomputed prerequisite closure researched, deepest
    /// first, then the technology itself. Never touches queue nodes.
    /// Returns the names completed, in completion order.
    pub fn instant_completion(&self, force: &mut Force, name: &str) -> QueueResult<Vec<String>> {
        let tech = force
            .technology(name)
            .ok_or_else(|| QueueError::UnknownTechnology(name.to_string()))?;
        if tech.researched {
            return Err(QueueError::AlreadyResearched(name.to_string()));
        }

        let mut completed = Vec::new();
        for prereq in self.graph.closure_of(name) {
            if let Some(t) = force.technologies.get_mut(prereq) {
                if !t.researched {
                    mark_researched(t);
                    completed.push(prereq.clone());
                }
            }
        }
        if let Some(t) = force.technologies.get_mut(name) {
            mark_researched(t);
        }
        completed.push(name.to_string());
        Ok(completed)
    }
}

fn mark_researched(tech: &mut Technology) {
    tech.level = tech.max_level;
    tech.researched = true;
}

/// Emit every missing level of `tech` up to `target`.
///
/// Already-queued levels become reorder steps so nothing is inserted
/// twice; intermediate levels are never skipped.
fn push_levels(force: &Force, tech: &Technology, target: u32, steps: &mut Vec<AdmissionStep>) {
    for level in tech.level..=target {
        let key = tech.queue_key(level);
        if force.queue.contains_key(&key) {
            steps.push(AdmissionStep::Requeue(key));
        } else {
            steps.push(AdmissionStep::Insert(QueueItem::for_level(tech, level)));
        }
    }
}

// Standalone recursive helper for the depth-first strategy
fn expand_depth_first(
    graph: &TechGraph,
    force: &Force,
    root: &str,
    name: &str,
    visited: &mut HashSet<String>,
    steps: &mut Vec<AdmissionStep>,
) -> QueueResult<()> {
    for prereq in graph.prerequisites_of(name) {
        let Some(tech) = force.technology(prereq) else {
            continue;
        };
        if tech.researched {
            continue;
        }
        if tech.is_disabled() {
            return Err(QueueError::HasDisabledPrerequisite {
                technology: root.to_string(),
                prerequisite: prereq.clone(),
            });
        }
        if !visited.insert(prereq.clone()) {
            continue;
        }
        expand_depth_first(graph, force, root, prereq, visited, steps)?;
        push_levels(force, tech, tech.max_level, steps);
    }
    Ok(())
}

/// Level-order walk recording the deepest distance at which each
/// prerequisite is reachable, then emitting deepest-first. By
/// construction every prerequisite is emitted only after all of its
/// own prerequisites. Ties at equal depth keep discovery order.
fn expand_breadth_first(
    graph: &TechGraph,
    force: &Force,
    root: &str,
    steps: &mut Vec<AdmissionStep>,
) -> QueueResult<()> {
    let mut depth: HashMap<String, usize> = HashMap::new();
    let mut discovery: Vec<String> = Vec::new();
    let mut frontier: VecDeque<(String, usize)> = VecDeque::new();
    frontier.push_back((root.to_string(), 0));

    while let Some((name, d)) = frontier.pop_front() {
        for prereq in graph.prerequisites_of(&name) {
            let Some(tech) = force.technology(prereq) else {
                continue;
            };
            if tech.researched {
                continue;
            }
            if tech.is_disabled() {
                return Err(QueueError::HasDisabledPrerequisite {
                    technology: root.to_string(),
                    prerequisite: prereq.clone(),
                });
            }
            match depth.get(prereq).copied() {
                Some(seen) if seen >= d + 1 => {}
                Some(_) => {
                    // Rediscovered deeper: the graph is acyclic, so this
                    // terminates, and the deeper distance wins.
                    depth.insert(prereq.clone(), d + 1);
                    frontier.push_back((prereq.clone(), d + 1));
                }
                None => {
                    depth.insert(prereq.clone(), d + 1);
                    discovery.push(prereq.clone());
                    frontier.push_back((prereq.clone(), d + 1));
                }
            }
        }
    }

    let mut emit: Vec<String> = discovery;
    emit.sort_by(|a, b| depth[b].cmp(&depth[a]));
    for name in &emit {
        if let Some(tech) = force.technology(name) {
            push_levels(force, tech, tech.max_level, steps);
        }
    }
    Ok(())
}
