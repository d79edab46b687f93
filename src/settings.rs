//! Hunt settings
//!
//! Defaults come from `consts`; a page can override any subset with a JSON
//! blob (missing fields keep their defaults).

use serde::{Deserialize, Serialize};

use crate::consts::{ADVANCE_DELAY_MS, INDEX_PATH, STORAGE_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntSettings {
    /// Storage key for progress. Bump the version suffix when the stored
    /// layout changes; old keys are simply abandoned.
    pub storage_key: String,
    /// Where locked puzzle pages send the player
    pub index_path: String,
    /// Pause between a correct answer and navigation (ms)
    pub advance_delay_ms: u32,
}

impl Default for HuntSettings {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            index_path: INDEX_PATH.to_string(),
            advance_delay_ms: ADVANCE_DELAY_MS,
        }
    }
}

impl HuntSettings {
    /// Parse settings, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => {
                log::info!("Loaded hunt settings");
                settings
            }
            Err(e) => {
                log::warn!("Invalid hunt settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Resolve a catalog path (relative to the index page) from a puzzle page
    pub fn page_url(&self, path: &str) -> String {
        match self.index_path.rfind('/') {
            Some(i) => format!("{}{}", &self.index_path[..=i], path),
            None => path.to_string(),
        }
    }

    /// Load settings from the page's `#huntSettings` script tag (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("huntSettings"))
            .and_then(|el| el.text_content());

        match json {
            Some(json) if !json.trim().is_empty() => Self::from_json(&json),
            _ => {
                log::info!("Using default hunt settings");
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file named by `HUNT_SETTINGS` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("HUNT_SETTINGS") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json),
            Err(e) => {
                log::warn!("Could not read {} ({}), using defaults", path, e);
                Self::default()
            }
        }
    }
}
