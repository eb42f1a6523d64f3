//! Per-force research context.
//!
//! A force is one actor's view of the technology set: its flags, its
//! queue, its progress bookkeeping, and the state partitions the host
//! uses for display grouping.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::config::TraversalStrategy;
use super::queue::ResearchQueue;
use super::technology::{ResearchState, Technology};

/// One actor's research context.
#[derive(Debug, Clone)]
pub struct Force {
    /// Technologies known to this force, keyed by name
    pub technologies: BTreeMap<String, Technology>,
    /// The ordered research queue
    pub queue: ResearchQueue,
    /// Progress multiplier; zero stalls every estimate
    pub research_speed: f64,
    /// Queue key of the item currently accruing progress
    pub current_research: Option<String>,
    /// Saved progress fraction per technology, in `[0, 1)`
    pub saved_progress: HashMap<String, f64>,
    /// Tick of the last progress snapshot
    pub last_progress_tick: u64,
    /// Per-force traversal override; engine config supplies the default
    pub strategy: Option<TraversalStrategy>,
    states: HashMap<String, ResearchState>,
    by_state: BTreeMap<ResearchState, BTreeSet<String>>,
}

impl Default for Force {
    fn default() -> Self {
        Self {
            technologies: BTreeMap::new(),
            queue: ResearchQueue::new(),
            research_speed: 1.0,
            current_research: None,
            saved_progress: HashMap::new(),
            last_progress_tick: 0,
            strategy: None,
            states: HashMap::new(),
            by_state: BTreeMap::new(),
        }
    }
}

impl Force {
    /// Create a force over the given technology set.
    pub fn new(technologies: impl IntoIterator<Item = Technology>) -> Self {
        Self {
            technologies: technologies
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect(),
            ..Self::default()
        }
    }

    /// Look up a technology by name.
    pub fn technology(&self, name: &str) -> Option<&Technology> {
        self.technologies.get(name)
    }

    /// Last classified state of a family, if it has been classified.
    pub fn state_of(&self, name: &str) -> Option<ResearchState> {
        self.states.get(name).copied()
    }

    /// Families currently classified into `state`, in name order.
    pub fn families_in_state(&self, state: ResearchState) -> impl Iterator<Item = &str> {
        self.by_state
            .get(&state)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Move a family between state partitions.
    ///
    /// Removes the name from its old partition and inserts it into the
    /// new one. Returns whether the state actually changed.
    pub(crate) fn set_state(&mut self, name: &str, state: ResearchState) -> bool {
        if self.states.get(name) == Some(&state) {
            return false;
        }
        if let Some(old) = self.states.insert(name.to_string(), state) {
            if let Some(partition) = self.by_state.get_mut(&old) {
                partition.remove(name);
            }
        }
        self.by_state
            .entry(state)
            .or_default()
            .insert(name.to_string());
        true
    }
}
