//! Progress save/load
//!
//! Features:
//! - Single versioned key, full snapshot on every save
//! - Per-field validation on load
//! - Corruption and storage failures fall back to the default state
//!
//! Fallback policy: a bad `unlockedUpTo` discards the whole value; bad
//! `solvedIds` entries are dropped one by one.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::platform::{KeyValueStore, StorageError};
use crate::progress::ProgressState;

/// Reads and writes `ProgressState` under one storage key
#[derive(Debug, Clone)]
pub struct ProgressStore<S> {
    storage: S,
    key: String,
    /// Highest valid puzzle id (N)
    max_puzzle_id: u32,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(storage: S, key: impl Into<String>, max_puzzle_id: u32) -> Self {
        Self {
            storage,
            key: key.into(),
            max_puzzle_id,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load progress, or the default state if nothing usable is stored.
    pub fn load(&self) -> ProgressState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => ProgressState::default(),
            Err(e) => {
                log::warn!("Could not read progress ({}), starting fresh", e);
                ProgressState::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<ProgressState>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(&raw)?;
        let state = decode_progress(&value, self.max_puzzle_id);
        if state.is_none() {
            log::warn!("Stored progress has no valid unlockedUpTo, starting fresh");
        }
        Ok(state)
    }

    /// Persist a full snapshot, replacing whatever was stored.
    pub fn save(&mut self, state: &ProgressState) {
        let result = serde_json::to_string(state)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(&self.key, &json));
        match result {
            Ok(()) => log::info!(
                "Progress saved (unlocked up to {}, {} solved)",
                state.unlocked_up_to,
                state.solved_count()
            ),
            Err(e) => log::warn!("Could not save progress: {}", e),
        }
    }

    /// Forget all progress. The next `load()` returns the default state.
    pub fn reset(&mut self) {
        match self.storage.remove(&self.key) {
            Ok(()) => log::info!("Progress reset"),
            Err(e) => log::warn!("Could not reset progress: {}", e),
        }
    }
}

/// Validate a parsed stored value.
///
/// Returns `None` when `unlockedUpTo` is missing, non-numeric or below 1.
pub fn decode_progress(value: &Value, max_puzzle_id: u32) -> Option<ProgressState> {
    let unlocked_up_to = value
        .get("unlockedUpTo")
        .and_then(as_finite_number)
        .filter(|n| *n >= 1.0)
        .map(|n| n.floor().min(u32::MAX as f64) as u32)?;

    let solved_ids: BTreeSet<u32> = value
        .get("solvedIds")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(as_finite_number)
                .filter(|n| n.fract() == 0.0 && *n >= 1.0 && *n <= max_puzzle_id as f64)
                .map(|n| n as u32)
                .collect()
        })
        .unwrap_or_default();

    Some(ProgressState {
        unlocked_up_to,
        solved_ids,
    })
}

/// Numbers and numeric strings, like a loose JS `Number(x)`
fn as_finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
