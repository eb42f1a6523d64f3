//! Research queue engine.
//!
//! An ordered, prerequisite-aware work queue for long-running research
//! inside a larger host application. Technologies are identified by
//! `(family, level)` pairs; admitting one expands its full unmet
//! prerequisite chain, every known family is classified into an
//! availability state, and after each mutation the engine decides which
//! queued item is actively accruing progress.
//!
//! # Architecture
//!
//! - **Domain layer** (`domain`): pure models — the arena-backed queue,
//!   technology definitions, the immutable prerequisite graph, per-force
//!   context — plus the host-facing ports (observer, clock)
//! - **Service layer** (`services`): prerequisite resolution, state
//!   classification, active-item arbitration, duration estimation,
//!   snapshot revalidation, and the mutation API tying them together
//!
//! The engine is a single-threaded, synchronous, in-process library:
//! it is invoked from host callbacks and never suspends.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use research_queue::domain::models::{Force, QueueConfig, ResearchState, TechGraph, Technology};
//! use research_queue::services::ResearchQueueService;
//!
//! let mut force = Force::new([
//!     Technology::new("explosives", &[]),
//!     Technology::new("rocketry", &["explosives"]),
//! ]);
//! let graph = Arc::new(TechGraph::build(&force.technologies)?);
//! let mut service = ResearchQueueService::new(graph, QueueConfig::default());
//!
//! // Admitting rocketry pulls its unmet prerequisite in ahead of it.
//! service.enqueue(&mut force, "rocketry", None)?;
//! assert_eq!(force.queue.len(), 2);
//! assert_eq!(force.state_of("rocketry"), Some(ResearchState::ConditionallyAvailable));
//! # Ok::<(), research_queue::QueueError>(())
//! ```

pub mod domain;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{QueueError, QueueResult};
pub use domain::models::{
    Eta, Force, QueueConfig, QueueItem, QueueSnapshot, ResearchCost, ResearchQueue, ResearchState,
    SnapshotEntry, TechGraph, Technology, TraversalStrategy,
};
pub use domain::ports::{Clock, NullObserver, QueueObserver, TickClock};
pub use services::{
    ActiveArbiter, DurationEstimator, PrerequisiteResolver, QueueRevalidator,
    ResearchQueueService, StateClassifier,
};
