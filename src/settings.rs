/// User-tunable settings, persisted under a reserved storage key
use crate::host::KeyValueStore;
use crate::summarizer::SummaryOptions;
use serde::{Deserialize, Serialize};

/// The one storage key that never holds tab data
pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub max_summary_length: usize,
    pub summary_format: String,
    pub snapshot_char_limit: usize,
    pub min_content_chars: usize,
    pub stage_timeout_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_summary_length: 100,
            summary_format: "paragraph".to_string(),
            snapshot_char_limit: 1000,
            min_content_chars: 10,
            stage_timeout_ms: 10_000,
        }
    }
}

impl Settings {
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            max_length: self.max_summary_length,
            format: self.summary_format.clone(),
        }
    }

    /// Load from storage, falling back to defaults when absent or unreadable
    pub async fn load<S: KeyValueStore>(store: &S) -> Settings {
        match store.get(SETTINGS_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid settings: {}", e);
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(e) => {
                log::warn!("Could not read settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }
}
