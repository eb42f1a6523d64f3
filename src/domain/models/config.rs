use serde::{Deserialize, Serialize};

/// Prerequisite traversal strategy used when expanding an admission request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalStrategy {
    /// Recursive walk of direct prerequisites in declared order.
    #[default]
    DepthFirst,
    /// Level-order walk emitting prerequisites deepest-first.
    BreadthFirst,
}

impl TraversalStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DepthFirst => "depth_first",
            Self::BreadthFirst => "breadth_first",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "depth_first" | "depth-first" => Some(Self::DepthFirst),
            "breadth_first" | "breadth-first" => Some(Self::BreadthFirst),
            _ => None,
        }
    }
}

/// Configuration for the research queue engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueConfig {
    /// Maximum number of queued items, prerequisites included
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,

    /// Traversal strategy used for forces without a per-force override
    #[serde(default)]
    pub default_strategy: TraversalStrategy,
}

const fn default_max_queue_size() -> usize {
    7
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_queue_size: default_max_queue_size(),
            default_strategy: TraversalStrategy::default(),
        }
    }
}
