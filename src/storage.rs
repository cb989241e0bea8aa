/// Storage layout for chrome.storage.local
///
/// Every tracked tab lives under its own key (the tab id as a string) so a
/// single set or remove touches exactly one record. The reserved settings key
/// sits alongside them.
use crate::settings::SETTINGS_KEY;
use crate::tab_data::{TabId, TabRecord};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub fn record_key(tab_id: TabId) -> String {
    tab_id.to_string()
}

/// Tab id for a storage key, or None for the settings key and anything foreign
pub fn parse_record_key(key: &str) -> Option<TabId> {
    if key == SETTINGS_KEY {
        return None;
    }
    key.parse().ok()
}

pub fn encode_record(record: &TabRecord) -> Result<Value, serde_json::Error> {
    serde_json::to_value(record)
}

/// Decoded view of the whole storage area
#[derive(Debug, Clone, Default)]
pub struct StorageSnapshot {
    pub records: BTreeMap<TabId, TabRecord>,
    /// Tab keys whose value failed to decode
    pub corrupt: Vec<String>,
}

impl StorageSnapshot {
    pub fn new() -> Self {
        StorageSnapshot::default()
    }

    pub fn from_entries(entries: Map<String, Value>) -> Self {
        let mut snapshot = StorageSnapshot::new();

        for (key, value) in entries {
            let Some(tab_id) = parse_record_key(&key) else {
                continue;
            };
            match serde_json::from_value::<TabRecord>(value) {
                Ok(record) if record.id == tab_id => {
                    snapshot.records.insert(tab_id, record);
                }
                Ok(record) => {
                    log::warn!("Record under key {} claims id {}", key, record.id);
                    snapshot.corrupt.push(key);
                }
                Err(e) => {
                    log::warn!("Skipping undecodable record {}: {}", key, e);
                    snapshot.corrupt.push(key);
                }
            }
        }

        snapshot
    }

    pub fn get_record(&self, tab_id: TabId) -> Option<&TabRecord> {
        self.records.get(&tab_id)
    }

    pub fn into_records(self) -> Vec<TabRecord> {
        self.records.into_values().collect()
    }
}
