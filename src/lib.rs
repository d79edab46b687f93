//! Soft-Lock Hunt - A browser-only puzzle hunt
//!
//! Core modules:
//! - `puzzles`: Static puzzle catalog and its validation
//! - `progress`: Persisted progress state (unlock frontier, solved set)
//! - `persistence`: Load/validate/save/reset of progress
//! - `platform`: Browser/native storage providers
//! - `hunt`: Answer checking, unlocking and page-facing queries
//! - `settings`: Hunt configuration
//!
//! Progress lives in the browser only. Answers ship in client code, so the
//! lock is "soft": it keeps honest players on the path, nothing more.

pub mod hunt;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod puzzles;
pub mod settings;

pub use hunt::{Access, Hunt, Submission, SubmitOutcome, normalize_answer};
pub use persistence::ProgressStore;
pub use platform::{KeyValueStore, MemoryStorage, StorageError};
pub use progress::ProgressState;
pub use puzzles::{Catalog, CatalogError, PUZZLES, PuzzleDefinition};
pub use settings::HuntSettings;

/// Hunt configuration constants
pub mod consts {
    /// Storage key for the current progress schema.
    /// `puzzle_hunt_progress_v1` only held `unlockedUpTo` and is abandoned.
    pub const STORAGE_KEY: &str = "puzzle_hunt_progress_v2";

    /// Index page, relative to a puzzle page
    pub const INDEX_PATH: &str = "../index.html";

    /// Delay before navigating away after a correct answer (ms).
    /// Purely cosmetic: state is already saved when the timer starts.
    pub const ADVANCE_DELAY_MS: u32 = 1200;

    /// First puzzle id, unlocked from the default state
    pub const FIRST_PUZZLE_ID: u32 = 1;
}
