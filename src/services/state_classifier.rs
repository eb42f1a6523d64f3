//! Availability classification.
//!
//! Computes the availability state of every technology family from
//! completion flags, enablement flags, and queue membership of
//! prerequisites, and keeps the force's state partitions current.

use tracing::debug;

use crate::domain::models::{Force, ResearchState, TechGraph, Technology};

/// Classifies technology families for a force.
#[derive(Debug, Clone, Copy)]
pub struct StateClassifier<'a> {
    graph: &'a TechGraph,
}

impl<'a> StateClassifier<'a> {
    pub fn new(graph: &'a TechGraph) -> Self {
        Self { graph }
    }

    /// Classify one technology. First match wins:
    /// completed, disabled, then prerequisite inspection.
    pub fn classify(&self, force: &Force, tech: &Technology) -> ResearchState {
        if tech.researched {
            return ResearchState::Completed;
        }
        if tech.is_disabled() {
            return ResearchState::Disabled;
        }

        let mut unmet = 0;
        for prereq in self.graph.prerequisites_of(&tech.name) {
            let Some(p) = force.technology(prereq) else {
                return ResearchState::NotAvailable;
            };
            if p.researched {
                continue;
            }
            unmet += 1;
            if !force.queue.contains_technology(prereq) {
                return ResearchState::NotAvailable;
            }
        }
        if unmet == 0 {
            ResearchState::Available
        } else {
            ResearchState::ConditionallyAvailable
        }
    }

    /// Reclassify every family, moving changed ones between the force's
    /// state partitions. Returns how many changed.
    ///
    /// Runs over the full set: a completion, enable/disable, or queue
    /// membership change can alter prerequisite satisfaction anywhere.
    pub fn reclassify_all(&self, force: &mut Force) -> usize {
        let states: Vec<(String, ResearchState)> = force
            .technologies
            .values()
            .map(|tech| (tech.name.clone(), self.classify(force, tech)))
            .collect();

        let mut changed = 0;
        for (name, state) in states {
            if force.set_state(&name, state) {
                changed += 1;
            }
        }
        if changed > 0 {
            debug!(changed, "research states reclassified");
        }
        changed
    }
}
