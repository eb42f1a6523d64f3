pub mod active_arbiter;
pub mod duration_estimator;
pub mod prerequisite_resolver;
pub mod queue_revalidator;
pub mod research_queue_service;
pub mod state_classifier;

pub use active_arbiter::ActiveArbiter;
pub use duration_estimator::DurationEstimator;
pub use prerequisite_resolver::{AdmissionStep, Placement, PrerequisiteResolver, Resolution};
pub use queue_revalidator::QueueRevalidator;
pub use research_queue_service::ResearchQueueService;
pub use state_classifier::StateClassifier;
