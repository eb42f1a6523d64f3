//! Queue mutation API.
//!
//! Every host-visible mutation enters here: the resolver validates and
//! expands, the queue is edited, then classification, active-item
//! arbitration, and duration estimates are refreshed before exactly one
//! `queue_changed` notification goes out. No observer ever sees a
//! transiently-inconsistent queue.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::QueueResult;
use crate::domain::models::{
    Force, QueueConfig, QueueItem, QueueSnapshot, SnapshotEntry, TechGraph,
};
use crate::domain::ports::{Clock, NullObserver, QueueObserver, TickClock};

use super::active_arbiter::ActiveArbiter;
use super::duration_estimator::DurationEstimator;
use super::prerequisite_resolver::{AdmissionStep, Placement, PrerequisiteResolver, Resolution};
use super::queue_revalidator::QueueRevalidator;
use super::state_classifier::StateClassifier;

/// Service coordinating all research queue mutations for a host.
///
/// Holds the immutable technology graph and engine configuration; the
/// per-force state travels in the [`Force`] passed to each call.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use research_queue::domain::models::{Force, QueueConfig, TechGraph, Technology};
/// use research_queue::services::ResearchQueueService;
///
/// let mut force = Force::new([
///     Technology::new("explosives", &[]),
///     Technology::new("rocketry", &["explosives"]),
/// ]);
/// let graph = Arc::new(TechGraph::build(&force.technologies).unwrap());
/// let mut service = ResearchQueueService::new(graph, QueueConfig::default());
///
/// service.enqueue(&mut force, "rocketry", None).unwrap();
///
/// let order: Vec<&str> = force.queue.iter().map(|i| i.key.as_str()).collect();
/// assert_eq!(order, vec!["explosives", "rocketry"]);
/// ```
pub struct ResearchQueueService {
    graph: Arc<TechGraph>,
    config: QueueConfig,
    observer: Box<dyn QueueObserver>,
    clock: Box<dyn Clock>,
}

impl ResearchQueueService {
    /// Create a service with a no-op observer and a manual tick clock.
    pub fn new(graph: Arc<TechGraph>, config: QueueConfig) -> Self {
        Self {
            graph,
            config,
            observer: Box::new(NullObserver::new()),
            clock: Box::new(TickClock::new()),
        }
    }

    /// Replace the notification sink.
    pub fn with_observer(mut self, observer: Box<dyn QueueObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the tick source.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Engine configuration in use.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Admit a technology (up to `target_level`) at the back of the queue,
    /// its unmet prerequisite chain ahead of it.
    #[instrument(skip(self, force), err)]
    pub fn enqueue(
        &mut self,
        force: &mut Force,
        name: &str,
        target_level: Option<u32>,
    ) -> QueueResult<()> {
        self.admit(force, name, target_level, Placement::Back)
    }

    /// Admit a technology at the front: it and its unmet chain become
    /// the next work, already-queued prerequisites reordered ahead.
    #[instrument(skip(self, force), err)]
    pub fn enqueue_front(
        &mut self,
        force: &mut Force,
        name: &str,
        target_level: Option<u32>,
    ) -> QueueResult<()> {
        self.admit(force, name, target_level, Placement::Front)
    }

    fn admit(
        &mut self,
        force: &mut Force,
        name: &str,
        target_level: Option<u32>,
        placement: Placement,
    ) -> QueueResult<()> {
        let strategy = force.strategy.unwrap_or(self.config.default_strategy);
        let resolver = PrerequisiteResolver::new(&self.graph);
        let resolution =
            resolver.resolve(force, name, target_level, strategy, placement, &self.config)?;
        apply_resolution(force, &resolution, placement);
        info!(
            technology = name,
            inserts = resolution.inserts(),
            "admitted to queue"
        );
        self.refresh(force);
        Ok(())
    }

    /// Remove `(name, level)` and everything that depended on it being
    /// queued: higher levels of the same family and queued descendants.
    /// Removing an absent item is a silent no-op.
    #[instrument(skip(self, force))]
    pub fn remove(&mut self, force: &mut Force, name: &str, level: u32) -> bool {
        let Some(tech) = force.technology(name) else {
            return false;
        };
        let key = tech.queue_key(level);
        let max_level = tech.max_level;
        let keys_above: Vec<String> = (level + 1..=max_level)
            .map(|l| tech.queue_key(l))
            .collect();

        if force.queue.remove(&key).is_none() {
            return false;
        }
        for above in &keys_above {
            force.queue.remove(above);
        }
        remove_queued_descendants(&self.graph, force, name, &mut HashSet::new());

        debug!(technology = name, level, "removed from queue");
        self.refresh(force);
        true
    }

    /// Drop every queued item. One aggregate notification, never per-item.
    #[instrument(skip(self, force))]
    pub fn clear(&mut self, force: &mut Force) {
        force.queue.clear();
        self.refresh(force);
    }

    /// Suspend or resume progress. Queue order is untouched.
    #[instrument(skip(self, force))]
    pub fn set_paused(&mut self, force: &mut Force, paused: bool) {
        if force.queue.paused == paused {
            return;
        }
        force.queue.paused = paused;
        self.refresh(force);
    }

    /// Flip the pause flag; returns the new value.
    pub fn toggle_paused(&mut self, force: &mut Force) -> bool {
        let paused = !force.queue.paused;
        self.set_paused(force, paused);
        paused
    }

    /// Flip automatic next-level re-admission for multi-level
    /// technologies; returns the new value.
    #[instrument(skip(self, force))]
    pub fn toggle_requeue_multilevel(&mut self, force: &mut Force) -> bool {
        force.queue.requeue_multilevel = !force.queue.requeue_multilevel;
        self.refresh(force);
        force.queue.requeue_multilevel
    }

    /// Whether `(name, level)` is queued; with no level, whether any
    /// level of the family is.
    pub fn contains(&self, force: &Force, name: &str, level: Option<u32>) -> bool {
        match (force.technology(name), level) {
            (Some(tech), Some(level)) => force.queue.contains_key(&tech.queue_key(level)),
            (Some(_), None) => force.queue.contains_technology(name),
            (None, _) => false,
        }
    }

    /// Host callback: the force finished researching `name`'s current
    /// level. The host has already advanced the technology's flags;
    /// this drops achieved entries, optionally re-admits the next
    /// level, and refreshes derived state.
    #[instrument(skip(self, force))]
    pub fn on_research_finished(&mut self, force: &mut Force, name: &str) {
        let Some(tech) = force.technology(name).cloned() else {
            return;
        };

        let achieved: Vec<String> = force
            .queue
            .iter()
            .filter(|i| i.technology == name && (tech.researched || i.level < tech.level))
            .map(|i| i.key.clone())
            .collect();
        for key in &achieved {
            force.queue.remove(key);
        }
        force.saved_progress.remove(name);

        if force.queue.requeue_multilevel
            && tech.is_multilevel()
            && !tech.researched
            && !force.queue.contains_technology(name)
            && force.queue.len() < self.config.max_queue_size
        {
            info!(technology = name, level = tech.level, "requeueing next level");
            force.queue.push_back(QueueItem::for_level(&tech, tech.level));
        }

        self.refresh(force);
    }

    /// Complete `name` immediately, marking its prerequisite closure
    /// researched first. Queue entries of anything completed here are
    /// swept through the normal removal path afterwards.
    #[instrument(skip(self, force), err)]
    pub fn research_instantly(&mut self, force: &mut Force, name: &str) -> QueueResult<()> {
        let resolver = PrerequisiteResolver::new(&self.graph);
        let completed = resolver.instant_completion(force, name)?;

        for done in &completed {
            let achieved: Vec<String> = force
                .queue
                .iter()
                .filter(|i| i.technology == *done)
                .map(|i| i.key.clone())
                .collect();
            for key in achieved {
                force.queue.remove(&key);
            }
            force.saved_progress.remove(done);
        }

        info!(
            technology = name,
            completed = completed.len(),
            "instant completion"
        );
        self.refresh(force);
        Ok(())
    }

    /// Capture the queue for host-side persistence.
    pub fn snapshot(&self, force: &Force) -> QueueSnapshot {
        QueueSnapshot {
            saved_at: Utc::now(),
            paused: force.queue.paused,
            requeue_multilevel: force.queue.requeue_multilevel,
            entries: force
                .queue
                .iter()
                .map(|i| SnapshotEntry {
                    technology: i.technology.clone(),
                    level: i.level,
                })
                .collect(),
        }
    }

    /// Rebuild the queue from `snapshot`, dropping entries that no
    /// longer resolve. Returns the number of dropped entries.
    #[instrument(skip(self, force, snapshot))]
    pub fn restore(&mut self, force: &mut Force, snapshot: &QueueSnapshot) -> usize {
        let revalidator = QueueRevalidator::new(&self.graph);
        let dropped = revalidator.restore(force, snapshot, &self.config);
        if dropped > 0 {
            warn!(dropped, "dropped stale queue entries on restore");
        }
        self.refresh(force);
        dropped
    }

    /// Bring derived state current without mutating the queue: initial
    /// classification, arbitration, and estimates for a fresh force.
    pub fn initialize(&mut self, force: &mut Force) {
        self.refresh(force);
    }

    /// Derived-state pass after every mutation: arbitration,
    /// classification, estimates, then exactly one notification.
    fn refresh(&mut self, force: &mut Force) {
        let classifier = StateClassifier::new(self.graph.as_ref());
        let arbiter = ActiveArbiter::new(self.clock.as_ref());
        arbiter.update(force, &classifier, self.observer.as_mut());
        classifier.reclassify_all(force);
        DurationEstimator::new().recompute(force);
        self.observer.queue_changed();
    }
}

/// Apply a validated plan. Front placement walks the steps in reverse
/// so the final front order matches the plan's dependency order; back
/// placement appends inserts and leaves requeued items where they are
/// (already ahead of the back).
fn apply_resolution(force: &mut Force, resolution: &Resolution, placement: Placement) {
    match placement {
        Placement::Back => {
            for step in &resolution.steps {
                if let AdmissionStep::Insert(item) = step {
                    force.queue.push_back(item.clone());
                }
            }
        }
        Placement::Front => {
            for step in resolution.steps.iter().rev() {
                match step {
                    AdmissionStep::Requeue(key) => {
                        force.queue.move_to_front(key);
                    }
                    AdmissionStep::Insert(item) => {
                        force.queue.push_front(item.clone());
                    }
                }
            }
        }
    }
}

// Standalone recursive helper: drops every queued item of every
// technology reachable through descendant edges. The visited set keeps
// it cycle-safe regardless of graph shape.
fn remove_queued_descendants(
    graph: &TechGraph,
    force: &mut Force,
    name: &str,
    seen: &mut HashSet<String>,
) {
    if !seen.insert(name.to_string()) {
        return;
    }
    for descendant in graph.descendants_of(name) {
        let queued: Vec<String> = force
            .queue
            .iter()
            .filter(|i| i.technology == *descendant)
            .map(|i| i.key.clone())
            .collect();
        if queued.is_empty() {
            continue;
        }
        for key in queued {
            force.queue.remove(&key);
        }
        remove_queued_descendants(graph, force, descendant, seen);
    }
}
