//! Technology domain model.
//!
//! A technology is a named unit of research, possibly spanning multiple
//! sequential levels, gated behind a set of prerequisite technologies.

use serde::{Deserialize, Serialize};

/// How a technology accrues progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchCost {
    /// Passive lab progress: `count` units taking `time` ticks each.
    Units { count: u64, time: f64 },
    /// No unit requirement; an external action completes the research.
    Trigger,
}

/// Availability of a technology for a given force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchState {
    /// Every level has been researched.
    Completed,
    /// Hidden or not enabled for the force.
    Disabled,
    /// Every prerequisite is researched.
    Available,
    /// Unmet prerequisites are all in the queue already.
    ConditionallyAvailable,
    /// At least one prerequisite is neither researched nor queued.
    NotAvailable,
}

impl ResearchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Disabled => "disabled",
            Self::Available => "available",
            Self::ConditionallyAvailable => "conditionally_available",
            Self::NotAvailable => "not_available",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "disabled" => Some(Self::Disabled),
            "available" => Some(Self::Available),
            "conditionally_available" => Some(Self::ConditionallyAvailable),
            "not_available" => Some(Self::NotAvailable),
            _ => None,
        }
    }
}

/// A technology definition together with the force's per-technology flags.
///
/// The engine reads every field; `level` and `researched` are written
/// only through the instant-completion path. The host owns everything
/// else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    /// Unique technology name
    pub name: String,
    /// Direct prerequisites, in declared order
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// First level of the family
    pub min_level: u32,
    /// Last level of the family; equals `min_level` for single-level technologies
    pub max_level: u32,
    /// Next level to research; saturates at `max_level` once `researched`
    pub level: u32,
    /// Whether the force may research this technology
    pub enabled: bool,
    /// Hidden technologies never classify as available
    #[serde(default)]
    pub hidden: bool,
    /// Whether every level has been researched
    #[serde(default)]
    pub researched: bool,
    /// Progress requirement
    pub cost: ResearchCost,
}

impl Technology {
    /// Create a single-level, enabled technology with a default unit cost.
    pub fn new(name: impl Into<String>, prerequisites: &[&str]) -> Self {
        Self {
            name: name.into(),
            prerequisites: prerequisites.iter().map(ToString::to_string).collect(),
            min_level: 1,
            max_level: 1,
            level: 1,
            enabled: true,
            hidden: false,
            researched: false,
            cost: ResearchCost::Units {
                count: 100,
                time: 1.0,
            },
        }
    }

    /// Turn this into a multi-level family spanning `min..=max`.
    pub fn with_levels(mut self, min: u32, max: u32) -> Self {
        self.min_level = min;
        self.max_level = max;
        self.level = min;
        self
    }

    /// Replace the progress requirement.
    pub fn with_cost(mut self, cost: ResearchCost) -> Self {
        self.cost = cost;
        self
    }

    /// Whether the family spans more than one level.
    pub fn is_multilevel(&self) -> bool {
        self.max_level > self.min_level
    }

    /// Whether the force cannot research this technology at all.
    pub fn is_disabled(&self) -> bool {
        self.hidden || !self.enabled
    }

    /// Whether completing this technology needs an external action.
    pub fn requires_trigger(&self) -> bool {
        matches!(self.cost, ResearchCost::Trigger)
    }

    /// Queue key for one level of this technology.
    ///
    /// Single-level families key by name alone; multi-level families
    /// append the level so each level is a distinct queue entry.
    pub fn queue_key(&self, level: u32) -> String {
        if self.is_multilevel() {
            format!("{}-{}", self.name, level)
        } else {
            self.name.clone()
        }
    }

    /// Research units required for one level, if progress is passive.
    pub fn unit_count(&self) -> Option<u64> {
        match self.cost {
            ResearchCost::Units { count, .. } => Some(count),
            ResearchCost::Trigger => None,
        }
    }
}
