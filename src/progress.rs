//! Player progress
//!
//! Everything that must survive a page load lives here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::FIRST_PUZZLE_ID;

/// Unlock frontier plus the set of solved puzzles
///
/// Serialized as `{"unlockedUpTo": 2, "solvedIds": [1]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    /// Every id up to and including this one is unlocked. Always >= 1.
    pub unlocked_up_to: u32,
    /// Solved ids, ascending
    #[serde(default)]
    pub solved_ids: BTreeSet<u32>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            unlocked_up_to: FIRST_PUZZLE_ID,
            solved_ids: BTreeSet::new(),
        }
    }
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, puzzle_id: u32) -> bool {
        puzzle_id <= self.unlocked_up_to
    }

    pub fn is_solved(&self, puzzle_id: u32) -> bool {
        self.solved_ids.contains(&puzzle_id)
    }

    pub fn solved_count(&self) -> usize {
        self.solved_ids.len()
    }

    /// Record a solve and push the frontier past it. Never moves backward.
    pub fn record_solve(&mut self, puzzle_id: u32) {
        self.solved_ids.insert(puzzle_id);
        self.unlocked_up_to = self.unlocked_up_to.max(puzzle_id.saturating_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_unlocks_first_only() {
        let state = ProgressState::new();
        assert!(state.is_unlocked(1));
        assert!(!state.is_unlocked(2));
        assert!(!state.is_solved(1));
        assert_eq!(state.solved_count(), 0);
    }

    #[test]
    fn test_record_solve_is_monotonic() {
        let mut state = ProgressState {
            unlocked_up_to: 3,
            solved_ids: BTreeSet::from([1, 2]),
        };
        // Solving an earlier puzzle must not pull the frontier back
        state.record_solve(1);
        assert_eq!(state.unlocked_up_to, 3);

        state.record_solve(3);
        assert_eq!(state.unlocked_up_to, 4);
        assert_eq!(state.solved_ids, BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn test_serialized_layout() {
        let mut state = ProgressState::new();
        state.record_solve(2);
        state.record_solve(1);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"unlockedUpTo":3,"solvedIds":[1,2]}"#);
    }
}
