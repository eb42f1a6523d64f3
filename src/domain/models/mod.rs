pub mod config;
pub mod force;
pub mod graph;
pub mod queue;
pub mod snapshot;
pub mod technology;

pub use config::{QueueConfig, TraversalStrategy};
pub use force::Force;
pub use graph::TechGraph;
pub use queue::{Eta, QueueItem, ResearchQueue};
pub use snapshot::{QueueSnapshot, SnapshotEntry};
pub use technology::{ResearchCost, ResearchState, Technology};
