//! Queue reconstruction after external change.
//!
//! The host's technology set can change underneath a saved queue
//! (reload, external completion, level bounds shifted). Rebuilding
//! goes through the normal insert path, never raw relinking, so the
//! queue invariants are re-established from scratch. Unrecoverable
//! entries are dropped silently; revalidation never errors outward.

use tracing::debug;

use crate::domain::models::{Force, QueueConfig, QueueItem, QueueSnapshot, TechGraph};

/// Rebuilds a force's queue from a possibly-stale snapshot.
#[derive(Debug, Clone, Copy)]
pub struct QueueRevalidator<'a> {
    graph: &'a TechGraph,
}

impl<'a> QueueRevalidator<'a> {
    pub fn new(graph: &'a TechGraph) -> Self {
        Self { graph }
    }

    /// Restore the queue from `snapshot`, dropping entries that no
    /// longer resolve. Returns the number of dropped entries.
    pub fn restore(
        &self,
        force: &mut Force,
        snapshot: &QueueSnapshot,
        config: &QueueConfig,
    ) -> usize {
        force.queue.clear();
        force.queue.paused = snapshot.paused;
        force.queue.requeue_multilevel = snapshot.requeue_multilevel;

        let mut dropped = 0;
        for entry in &snapshot.entries {
            let Some(tech) = force.technology(&entry.technology) else {
                debug!(technology = %entry.technology, "dropping entry for unknown technology");
                dropped += 1;
                continue;
            };
            if tech.researched {
                debug!(technology = %entry.technology, "dropping entry for researched technology");
                dropped += 1;
                continue;
            }
            let Some((min, max)) = self.graph.bounds_of(&entry.technology) else {
                dropped += 1;
                continue;
            };
            if entry.level < min || entry.level > max || entry.level < tech.level {
                debug!(
                    technology = %entry.technology,
                    level = entry.level,
                    "dropping entry outside current level bounds"
                );
                dropped += 1;
                continue;
            }
            if force.queue.len() >= config.max_queue_size {
                debug!(technology = %entry.technology, "dropping entry over queue limit");
                dropped += 1;
                continue;
            }
            let item = QueueItem::for_level(tech, entry.level);
            if !force.queue.push_back(item) {
                // Duplicate key in the snapshot itself.
                dropped += 1;
            }
        }
        dropped
    }
}
