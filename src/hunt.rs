//! Hunt controller
//!
//! Answer checking and the per-puzzle `Locked -> Unlocked -> Solved`
//! progression. Pages call into `Hunt`; all state flows through an explicit
//! `ProgressState` value that is loaded, transformed and saved.

use crate::persistence::ProgressStore;
use crate::platform::KeyValueStore;
use crate::progress::ProgressState;
use crate::puzzles::{Catalog, PuzzleDefinition};
use crate::settings::HuntSettings;

/// Canonical form for answer comparison
///
/// Absent input is empty. Trims, upper-cases and collapses whitespace runs
/// to one space, so "  mango\t tree " matches "MANGO TREE".
pub fn normalize_answer(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .split(is_answer_whitespace)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Whitespace as browsers see it in `trim()` and `\s`: Unicode
/// `White_Space` minus U+0085, plus U+FEFF.
fn is_answer_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Result of an answer submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Solved. `is_final` is set for the last puzzle in the catalog.
    Correct { is_final: bool },
    Incorrect,
    EmptyInput,
    NotFound,
    /// Solved puzzles never accept another submission
    AlreadySolved,
}

impl SubmitOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, SubmitOutcome::Correct { .. })
    }

    /// Player-facing feedback line
    pub fn message(&self) -> &'static str {
        match self {
            SubmitOutcome::Correct { is_final: false } => "Correct! Next puzzle unlocked.",
            SubmitOutcome::Correct { is_final: true } => "Correct! You finished the hunt.",
            SubmitOutcome::Incorrect => "Not quite. Try again!",
            SubmitOutcome::EmptyInput => "Type an answer first.",
            SubmitOutcome::NotFound => "Puzzle not found.",
            SubmitOutcome::AlreadySolved => "You already solved this puzzle.",
        }
    }
}

/// Outcome plus the state to persist (only on `Correct`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub outcome: SubmitOutcome,
    pub next_state: Option<ProgressState>,
}

impl Submission {
    fn rejected(outcome: SubmitOutcome) -> Self {
        Self {
            outcome,
            next_state: None,
        }
    }

    pub fn message(&self) -> &'static str {
        self.outcome.message()
    }
}

/// What a puzzle page should do on load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToIndex,
}

/// Check a guess against the catalog without touching storage.
pub fn evaluate(
    catalog: &Catalog,
    state: &ProgressState,
    puzzle_id: u32,
    raw_input: Option<&str>,
) -> Submission {
    if state.is_solved(puzzle_id) {
        return Submission::rejected(SubmitOutcome::AlreadySolved);
    }
    let Some(puzzle) = catalog.get(puzzle_id) else {
        return Submission::rejected(SubmitOutcome::NotFound);
    };

    let guess = normalize_answer(raw_input);
    if guess.is_empty() {
        return Submission::rejected(SubmitOutcome::EmptyInput);
    }
    if guess != normalize_answer(Some(puzzle.answer)) {
        return Submission::rejected(SubmitOutcome::Incorrect);
    }

    let mut next = state.clone();
    next.record_solve(puzzle_id);
    Submission {
        outcome: SubmitOutcome::Correct {
            is_final: puzzle_id == catalog.last_id(),
        },
        next_state: Some(next),
    }
}

/// Page-facing entry point: catalog plus persisted progress
#[derive(Debug, Clone)]
pub struct Hunt<S> {
    catalog: Catalog,
    store: ProgressStore<S>,
}

impl<S: KeyValueStore> Hunt<S> {
    pub fn new(catalog: Catalog, storage: S, settings: &HuntSettings) -> Self {
        let store = ProgressStore::new(storage, settings.storage_key.clone(), catalog.last_id());
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn load(&self) -> ProgressState {
        self.store.load()
    }

    /// Clear all progress (index page reset control)
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Puzzle page guard: locked or unknown puzzles go back to the index
    pub fn require_unlocked(&self, puzzle_id: u32) -> Access {
        let state = self.store.load();
        if self.catalog.contains(puzzle_id) && state.is_unlocked(puzzle_id) {
            Access::Granted
        } else {
            log::info!("Puzzle {} is locked, redirecting to index", puzzle_id);
            Access::RedirectToIndex
        }
    }

    /// Check a guess against `state`; a correct guess is saved immediately.
    pub fn submit_answer(
        &mut self,
        state: &ProgressState,
        puzzle_id: u32,
        raw_input: Option<&str>,
    ) -> Submission {
        let submission = evaluate(&self.catalog, state, puzzle_id, raw_input);
        if let Some(next) = &submission.next_state {
            self.store.save(next);
            log::info!("Puzzle {} solved", puzzle_id);
        }
        submission
    }

    /// Load current progress, then submit against it
    pub fn submit(&mut self, puzzle_id: u32, raw_input: Option<&str>) -> Submission {
        let state = self.store.load();
        self.submit_answer(&state, puzzle_id, raw_input)
    }

    /// Puzzles the index page may show, ascending. Anything past the unlock
    /// frontier is withheld entirely, not just rendered as locked.
    pub fn visible_puzzles(&self, state: &ProgressState) -> Vec<&'static PuzzleDefinition> {
        self.catalog
            .iter()
            .filter(|p| state.is_unlocked(p.id))
            .collect()
    }

    pub fn is_solved(&self, state: &ProgressState, puzzle_id: u32) -> bool {
        state.is_solved(puzzle_id)
    }

    pub fn is_unlocked(&self, state: &ProgressState, puzzle_id: u32) -> bool {
        state.is_unlocked(puzzle_id)
    }

    /// "Solved X / N"
    pub fn solved_summary(&self, state: &ProgressState) -> String {
        format!("Solved {} / {}", state.solved_count(), self.catalog.len())
    }

    /// Page to open once `outcome` is shown: the next puzzle, or the index
    /// after the last one. `None` unless the answer was correct.
    pub fn after_solve_url(
        &self,
        settings: &HuntSettings,
        puzzle_id: u32,
        outcome: SubmitOutcome,
    ) -> Option<String> {
        let SubmitOutcome::Correct { is_final } = outcome else {
            return None;
        };
        let next = if is_final {
            None
        } else {
            self.next_puzzle(puzzle_id)
        };
        Some(match next {
            Some(next) => settings.page_url(next.path),
            None => settings.index_path.clone(),
        })
    }

    /// Where to go after solving `puzzle_id`; `None` after the last one
    pub fn next_puzzle(&self, puzzle_id: u32) -> Option<&'static PuzzleDefinition> {
        self.catalog.get(puzzle_id.checked_add(1)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn hunt() -> Hunt<MemoryStorage> {
        Hunt::new(
            Catalog::builtin(),
            MemoryStorage::new(),
            &HuntSettings::default(),
        )
    }

    fn state(unlocked_up_to: u32, solved: &[u32]) -> ProgressState {
        ProgressState {
            unlocked_up_to,
            solved_ids: solved.iter().copied().collect(),
        }
    }

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer(None), "");
        assert_eq!(normalize_answer(Some("   ")), "");
        assert_eq!(normalize_answer(Some("  apple  ")), "APPLE");
        assert_eq!(normalize_answer(Some("mango \t\n tree")), "MANGO TREE");
    }

    #[test]
    fn test_normalize_matches_browser_whitespace() {
        // Byte order mark counts as whitespace, NEL does not
        assert_eq!(normalize_answer(Some("\u{feff}apple\u{feff}")), "APPLE");
        assert_eq!(normalize_answer(Some("mango\u{feff}tree")), "MANGO TREE");
        assert_eq!(normalize_answer(Some("a\u{85}b")), "A\u{85}B");
        assert_eq!(normalize_answer(Some("\u{a0}apple\u{3000}")), "APPLE");

        let mut hunt = hunt();
        assert!(hunt.submit(1, Some("\u{feff}apple")).outcome.is_correct());
    }

    #[test]
    fn test_after_solve_url() {
        let hunt = hunt();
        let settings = HuntSettings::default();
        let advanced = SubmitOutcome::Correct { is_final: false };
        assert_eq!(
            hunt.after_solve_url(&settings, 1, advanced).as_deref(),
            Some("../puzzles/puzzle2.html")
        );
        assert_eq!(
            hunt.after_solve_url(&settings, 3, SubmitOutcome::Correct { is_final: true })
                .as_deref(),
            Some("../index.html")
        );
        for outcome in [
            SubmitOutcome::Incorrect,
            SubmitOutcome::EmptyInput,
            SubmitOutcome::NotFound,
            SubmitOutcome::AlreadySolved,
        ] {
            assert_eq!(hunt.after_solve_url(&settings, 1, outcome), None);
        }
    }

    #[test]
    fn test_first_solve_advances() {
        let mut hunt = hunt();
        let start = hunt.load();
        assert_eq!(start, ProgressState::default());

        let result = hunt.submit_answer(&start, 1, Some("apple"));
        assert_eq!(result.outcome, SubmitOutcome::Correct { is_final: false });
        assert_eq!(result.message(), "Correct! Next puzzle unlocked.");
        assert_eq!(result.next_state, Some(state(2, &[1])));
        // Persisted
        assert_eq!(hunt.load(), state(2, &[1]));
    }

    #[test]
    fn test_whitespace_and_case_insensitive() {
        let mut hunt = hunt();
        let result = hunt.submit(1, Some("  apple  "));
        assert!(result.outcome.is_correct());
    }

    #[test]
    fn test_wrong_answer_leaves_state() {
        let mut hunt = hunt();
        let result = hunt.submit(1, Some("banana"));
        assert_eq!(result.outcome, SubmitOutcome::Incorrect);
        assert_eq!(result.message(), "Not quite. Try again!");
        assert!(result.next_state.is_none());
        assert_eq!(hunt.load(), ProgressState::default());
        assert_eq!(hunt.store().storage().raw(hunt.store().key()), None);
    }

    #[test]
    fn test_empty_input() {
        let mut hunt = hunt();
        assert_eq!(hunt.submit(1, None).outcome, SubmitOutcome::EmptyInput);
        assert_eq!(hunt.submit(1, Some(" \t")).outcome, SubmitOutcome::EmptyInput);
    }

    #[test]
    fn test_unknown_puzzle() {
        let mut hunt = hunt();
        assert_eq!(hunt.submit(0, Some("apple")).outcome, SubmitOutcome::NotFound);
        assert_eq!(hunt.submit(4, Some("apple")).outcome, SubmitOutcome::NotFound);
    }

    #[test]
    fn test_resubmission_is_blocked() {
        let mut hunt = hunt();
        assert!(hunt.submit(1, Some("APPLE")).outcome.is_correct());
        let after_first = hunt.load();

        let again = hunt.submit(1, Some("APPLE"));
        assert_eq!(again.outcome, SubmitOutcome::AlreadySolved);
        assert!(again.next_state.is_none());
        assert_eq!(hunt.load(), after_first);

        // Wrong or empty guesses on a solved puzzle report the same thing
        assert_eq!(hunt.submit(1, None).outcome, SubmitOutcome::AlreadySolved);
    }

    #[test]
    fn test_final_puzzle_flag() {
        let mut hunt = hunt();
        let start = state(3, &[1, 2]);
        let result = hunt.submit_answer(&start, 3, Some("BANANA"));
        assert_eq!(result.outcome, SubmitOutcome::Correct { is_final: true });
        assert_eq!(result.next_state, Some(state(4, &[1, 2, 3])));
        assert!(hunt.next_puzzle(3).is_none());
        assert_eq!(hunt.next_puzzle(1).map(|p| p.id), Some(2));
    }

    #[test]
    fn test_full_run_then_reset() {
        let mut hunt = hunt();
        for (id, answer) in [(1, "apple"), (2, "Orange"), (3, " banana ")] {
            assert_eq!(hunt.require_unlocked(id), Access::Granted);
            assert!(hunt.submit(id, Some(answer)).outcome.is_correct());
        }
        let done = hunt.load();
        assert_eq!(hunt.solved_summary(&done), "Solved 3 / 3");
        assert_eq!(hunt.visible_puzzles(&done).len(), 3);

        hunt.reset();
        assert_eq!(hunt.load(), ProgressState::default());
        assert_eq!(hunt.require_unlocked(2), Access::RedirectToIndex);
    }

    #[test]
    fn test_require_unlocked() {
        let hunt = hunt();
        assert_eq!(hunt.require_unlocked(1), Access::Granted);
        assert_eq!(hunt.require_unlocked(2), Access::RedirectToIndex);
        assert_eq!(hunt.require_unlocked(9), Access::RedirectToIndex);
    }

    #[test]
    fn test_visible_puzzles_hide_locked() {
        let hunt = hunt();
        let ids: Vec<u32> = hunt
            .visible_puzzles(&ProgressState::default())
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);

        let ids: Vec<u32> = hunt
            .visible_puzzles(&state(2, &[1]))
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_unlocked_is_not_solved() {
        let hunt = hunt();
        let s = state(2, &[1]);
        assert!(hunt.is_unlocked(&s, 2));
        assert!(!hunt.is_solved(&s, 2));
        assert!(hunt.is_solved(&s, 1));
        assert_eq!(hunt.solved_summary(&s), "Solved 1 / 3");
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(raw in "[a-zA-Z0-9 \t\n\u{a0}]{0,32}") {
            let once = normalize_answer(Some(&raw));
            prop_assert_eq!(normalize_answer(Some(&once)), once);
        }

        #[test]
        fn prop_visible_never_past_frontier(unlocked in 1u32..10) {
            let hunt = hunt();
            let s = state(unlocked, &[]);
            prop_assert!(hunt.visible_puzzles(&s).iter().all(|p| p.id <= unlocked));
        }

        #[test]
        fn prop_solve_keeps_earlier_solves(
            k in 1u32..=3,
            unlocked in 1u32..5,
            solved in prop::collection::btree_set(1u32..=3, 0..3),
        ) {
            prop_assume!(!solved.contains(&k));
            let start = ProgressState { unlocked_up_to: unlocked, solved_ids: solved.clone() };
            let answer = Catalog::builtin().get(k).map(|p| p.answer);
            let result = evaluate(&Catalog::builtin(), &start, k, answer);

            let next = result.next_state.expect("correct answer");
            prop_assert!(next.unlocked_up_to >= k + 1);
            prop_assert!(next.unlocked_up_to >= start.unlocked_up_to);
            let expected: BTreeSet<u32> = solved.iter().copied().chain([k]).collect();
            prop_assert_eq!(next.solved_ids, expected);
        }
    }
}
