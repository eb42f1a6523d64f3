//! Domain errors for the research queue engine.

use thiserror::Error;

/// Format a cycle path as a human-readable string: `A -> B -> C -> A`.
fn format_cycle_path(path: &[String]) -> String {
    path.join(" -> ")
}

/// Domain-level errors produced by admission and graph construction.
///
/// Every variant is an expected domain outcome, not a fault: callers
/// branch on them, and none of them is fatal to the host. Validation
/// runs fully before any mutation, so a returned error always leaves
/// the queue unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Technology not found: {0}")]
    UnknownTechnology(String),

    #[error("Technology {0} is already researched")]
    AlreadyResearched(String),

    #[error("Technology {0} is disabled or hidden")]
    Disabled(String),

    #[error("Technology {0} is already in the queue")]
    AlreadyInQueue(String),

    #[error("Research queue is full (limit {limit})")]
    QueueFull { limit: usize },

    #[error("Technology {name} needs {required} queue slots but the queue holds at most {limit}")]
    TooManyPrerequisites {
        name: String,
        required: usize,
        limit: usize,
    },

    #[error("Technology {technology} has disabled prerequisite {prerequisite}")]
    HasDisabledPrerequisite {
        technology: String,
        prerequisite: String,
    },

    #[error("Technology {0} cannot be queued for immediate research")]
    UnableToQueue(String),

    #[error("Technology dependency cycle detected: {}", format_cycle_path(.0))]
    DependencyCycle(Vec<String>),
}

/// Convenience alias used throughout the engine.
pub type QueueResult<T> = Result<T, QueueError>;
