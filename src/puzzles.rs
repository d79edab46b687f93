//! Puzzle catalog
//!
//! Compiled into the binary. Ids run 1..N with no gaps; that order is the
//! unlock order.

use thiserror::Error;

/// A single puzzle page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleDefinition {
    pub id: u32,
    pub title: &'static str,
    /// Page path, relative to the index page
    pub path: &'static str,
    /// Answer that solves this puzzle and unlocks the next one
    pub answer: &'static str,
}

/// Shipped puzzles. Add new ones at the end with the next id.
pub const PUZZLES: &[PuzzleDefinition] = &[
    PuzzleDefinition {
        id: 1,
        title: "Puzzle 1",
        path: "puzzles/puzzle1.html",
        answer: "APPLE",
    },
    PuzzleDefinition {
        id: 2,
        title: "Puzzle 2",
        path: "puzzles/puzzle2.html",
        answer: "ORANGE",
    },
    PuzzleDefinition {
        id: 3,
        title: "Puzzle 3",
        path: "puzzles/puzzle3.html",
        answer: "BANANA",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog has no puzzles")]
    Empty,

    #[error("puzzle at position {position} has id {found}, expected {expected}")]
    NonDenseId {
        position: usize,
        expected: u32,
        found: u32,
    },
}

/// Validated, ordered view over a puzzle list
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    puzzles: &'static [PuzzleDefinition],
}

impl Catalog {
    /// Check that ids are exactly 1..N in order.
    pub fn new(puzzles: &'static [PuzzleDefinition]) -> Result<Self, CatalogError> {
        if puzzles.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (position, puzzle) in puzzles.iter().enumerate() {
            let expected = position as u32 + 1;
            if puzzle.id != expected {
                return Err(CatalogError::NonDenseId {
                    position,
                    expected,
                    found: puzzle.id,
                });
            }
        }
        Ok(Self { puzzles })
    }

    /// The shipped catalog
    pub fn builtin() -> Self {
        // Checked by `test_builtin_catalog_is_valid`
        Self { puzzles: PUZZLES }
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Highest defined id (N)
    pub fn last_id(&self) -> u32 {
        self.puzzles.len() as u32
    }

    pub fn get(&self, id: u32) -> Option<&'static PuzzleDefinition> {
        if id == 0 {
            return None;
        }
        self.puzzles.get(id as usize - 1)
    }

    pub fn contains(&self, id: u32) -> bool {
        (1..=self.last_id()).contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static PuzzleDefinition> + use<> {
        let puzzles = self.puzzles;
        puzzles.iter()
    }
}
