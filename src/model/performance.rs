//! Performance Model
//!
//! This sub-model contains all state related to loading indicators and
//! requests still waiting for the server.

use std::collections::HashMap;
use std::time::Instant;

use super::types::LoadTarget;
use crate::logic::optimistic::Reaction;

#[derive(Clone, Debug)]
pub struct PerformanceModel {
    // ============================================
    // IN-FLIGHT TRACKING
    // ============================================
    /// Fetches waiting for a response, with the newest generation issued
    pub loading: HashMap<LoadTarget, u64>,

    /// Optimistic reactions not yet confirmed, per announcement id
    pub pending_reactions: HashMap<u64, Vec<Reaction>>,

    /// Mutations (payments, votes, ...) waiting for a response
    pub pending_mutations: usize,

    // ============================================
    // METRICS
    // ============================================
    /// Time the last screen load took (milliseconds)
    pub last_load_time_ms: Option<u64>,

    /// Last time user interacted with UI
    pub last_user_action: Instant,

    /// Last background refresh of the active tab
    pub last_refresh: Instant,
}

impl PerformanceModel {
    pub fn new() -> Self {
        Self {
            loading: HashMap::new(),
            pending_reactions: HashMap::new(),
            pending_mutations: 0,
            last_load_time_ms: None,
            last_user_action: Instant::now(),
            last_refresh: Instant::now(),
        }
    }

    pub fn is_busy(&self) -> bool {
        !self.loading.is_empty() || self.pending_mutations > 0
    }

    pub fn start_load(&mut self, target: LoadTarget, generation: u64) {
        let newest = self.loading.entry(target).or_insert(generation);
        *newest = (*newest).max(generation);
    }

    /// Clear the indicator unless a newer fetch of the same data is running
    pub fn finish_load(&mut self, target: &LoadTarget, generation: u64) {
        if self
            .loading
            .get(target)
            .is_some_and(|newest| *newest <= generation)
        {
            self.loading.remove(target);
        }
    }

    pub fn is_loading(&self, target: &LoadTarget) -> bool {
        self.loading.contains_key(target)
    }

    /// Check if system is idle (no user input for 300ms)
    pub fn is_idle(&self) -> bool {
        self.last_user_action.elapsed().as_millis() > 300
    }

    /// Record user action (for idle detection)
    pub fn record_user_action(&mut self) {
        self.last_user_action = Instant::now();
    }

    pub fn push_reaction(&mut self, announcement_id: u64, reaction: Reaction) {
        self.pending_reactions
            .entry(announcement_id)
            .or_default()
            .push(reaction);
    }

    /// Forget the oldest pending reaction of this kind once the server answered
    pub fn settle_reaction(&mut self, announcement_id: u64, reaction: Reaction) {
        if let Some(pending) = self.pending_reactions.get_mut(&announcement_id) {
            if let Some(pos) = pending.iter().position(|r| *r == reaction) {
                pending.remove(pos);
            }
            if pending.is_empty() {
                self.pending_reactions.remove(&announcement_id);
            }
        }
    }

    pub fn has_pending_like(&self, announcement_id: u64) -> bool {
        self.pending_reactions
            .get(&announcement_id)
            .map(|pending| pending.contains(&Reaction::ToggleLike))
            .unwrap_or(false)
    }
}

impl Default for PerformanceModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_model_creation() {
        let model = PerformanceModel::new();
        assert!(model.loading.is_empty());
        assert!(!model.is_busy());
        assert!(!model.is_idle());
    }

    #[test]
    fn test_pending_reactions() {
        let mut model = PerformanceModel::new();
        model.push_reaction(3, Reaction::ToggleLike);
        model.push_reaction(3, Reaction::AddComment);
        assert!(model.has_pending_like(3));
        assert!(!model.has_pending_like(4));

        model.settle_reaction(3, Reaction::ToggleLike);
        assert!(!model.has_pending_like(3));
        assert_eq!(model.pending_reactions.get(&3).map(Vec::len), Some(1));

        model.settle_reaction(3, Reaction::AddComment);
        assert!(model.pending_reactions.is_empty());
    }

    #[test]
    fn test_busy_while_loading() {
        let mut model = PerformanceModel::new();
        model.start_load(LoadTarget::Kas, 1);
        assert!(model.is_busy());
    }

    #[test]
    fn test_older_response_keeps_newer_load_indicator() {
        let mut model = PerformanceModel::new();
        model.start_load(LoadTarget::Kas, 1);
        model.start_load(LoadTarget::Kas, 2);

        model.finish_load(&LoadTarget::Kas, 1);
        assert!(model.is_loading(&LoadTarget::Kas));

        model.finish_load(&LoadTarget::Kas, 2);
        assert!(!model.is_loading(&LoadTarget::Kas));
    }
}
