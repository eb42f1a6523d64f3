//! Queue duration estimates.
//!
//! A single forward pass from head to tail: each node stores the
//! cumulative ticks until it completes, the residual cost of everything
//! ahead of it included. Display-oriented only, never authoritative.

use crate::domain::models::{Eta, Force, ResearchCost};

/// Recomputes cumulative estimates for every queued item.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationEstimator;

impl DurationEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Recompute every queued item's estimate, head to tail.
    ///
    /// Saved progress counts only toward the technology's in-flight
    /// level. Zero (or negative) speed marks every item [`Eta::Never`]
    /// instead of dividing by zero: the group is stalled, not slow.
    pub fn recompute(&self, force: &mut Force) {
        let speed = force.research_speed;
        let Force {
            queue,
            technologies,
            saved_progress,
            ..
        } = force;

        let mut cumulative = 0.0;
        queue.for_each_mut(|item| {
            if speed <= 0.0 {
                item.estimate = Eta::Never;
                return;
            }
            if let Some(tech) = technologies.get(&item.technology) {
                if let ResearchCost::Units { count, time } = tech.cost {
                    let progress = if item.level == tech.level {
                        saved_progress
                            .get(&item.technology)
                            .copied()
                            .unwrap_or(0.0)
                    } else {
                        0.0
                    };
                    #[allow(clippy::cast_precision_loss)]
                    let remaining = (1.0 - progress) * count as f64 * time / speed;
                    cumulative += remaining;
                }
            }
            item.estimate = Eta::Ticks(cumulative);
        });
    }
}
