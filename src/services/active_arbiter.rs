//! Active-item arbitration.
//!
//! After every mutation, decides which queue item (if any) accrues
//! progress. Manual-trigger items never become active: they are
//! reported to the host, dropped from the queue, and the first
//! genuinely researchable item is promoted past them.

use tracing::debug;

use crate::domain::models::{Force, ResearchState};
use crate::domain::ports::{Clock, QueueObserver};

use super::state_classifier::StateClassifier;

/// Arbitrates which queued item is actively progressing.
#[derive(Clone, Copy)]
pub struct ActiveArbiter<'a> {
    clock: &'a dyn Clock,
}

impl<'a> ActiveArbiter<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock }
    }

    /// Re-arbitrate the active item.
    ///
    /// Reentrant calls short-circuit on the `updating_active` guard:
    /// switching the active item may synchronously trigger host
    /// callbacks that mutate the queue, and those must not re-enter
    /// arbitration.
    pub fn update(
        &self,
        force: &mut Force,
        classifier: &StateClassifier<'_>,
        observer: &mut dyn QueueObserver,
    ) {
        if force.queue.updating_active {
            return;
        }
        force.queue.updating_active = true;

        loop {
            if force.queue.paused || force.queue.is_empty() {
                if force.current_research.take().is_some() {
                    observer.active_research_changed(None);
                }
                force.last_progress_tick = self.clock.now();
                break;
            }

            let Some(head) = force.queue.head().cloned() else {
                break;
            };
            let Some(tech) = force.technology(&head.technology) else {
                // Stale entry; drop it and keep arbitrating.
                force.queue.remove(&head.key);
                continue;
            };

            if tech.requires_trigger() {
                debug!(technology = %head.technology, "head requires a manual trigger");
                observer.manual_action_required(&head.technology);
                // Queue membership changes here, completion state does
                // not: descendants stay queued.
                force.queue.remove(&head.key);
                promote_first_available(force, classifier);
                continue;
            }

            if force.current_research.as_deref() != Some(head.key.as_str()) {
                force.current_research = Some(head.key.clone());
                force.last_progress_tick = self.clock.now();
                observer.active_research_changed(Some(&head.key));
            }
            break;
        }

        force.queue.updating_active = false;
    }
}

/// Move the first item whose family is genuinely researchable to the
/// front, past any stranded trigger-only items. Non-promotable items
/// stay in place.
fn promote_first_available(force: &mut Force, classifier: &StateClassifier<'_>) {
    let promote = force
        .queue
        .iter()
        .find(|item| {
            force
                .technology(&item.technology)
                .is_some_and(|tech| classifier.classify(force, tech) == ResearchState::Available)
        })
        .map(|item| item.key.clone());
    if let Some(key) = promote {
        force.queue.move_to_front(&key);
    }
}
