/// Browser implementations of the pipeline's collaborators, over extension.js

use crate::error::{HostError, StoreError, StoreResult};
use crate::host::{AiCapability, BadgeSink, ExtractionHost, KeyValueStore, Timer};
use crate::summarizer::SummaryOptions;
use crate::tab_data::{TabId, TabInfo, TabRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn captureSnapshot(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn aiSummarize(text: &str, options: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn aiGenerate(prompt: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageGetAll() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageGet(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSet(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageRemove(key: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn setBadge(text: &str, title: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn delay(ms: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn activateTab(tab_id: i32) -> Result<(), JsValue>;

    fn onTabUpdated(callback: &js_sys::Function);

    fn onTabRemoved(callback: &js_sys::Function);

    fn onActionClicked(callback: &js_sys::Function);

    #[wasm_bindgen(catch)]
    async fn openDashboard() -> Result<(), JsValue>;

    fn onRecordStored(callback: &js_sys::Function);
}

/// Shape of the errors extension.js rejects with
#[derive(Debug, Deserialize)]
struct BridgeFailure {
    kind: String,
    #[serde(default)]
    message: String,
}

fn bridge_failure(err: JsValue) -> BridgeFailure {
    serde_wasm_bindgen::from_value(err.clone()).unwrap_or_else(|_| BridgeFailure {
        kind: "unavailable".to_string(),
        message: format!("{:?}", err),
    })
}

fn tab_error(tab_id: TabId, err: JsValue) -> HostError {
    let failure = bridge_failure(err);
    match failure.kind.as_str() {
        "tabGone" => HostError::TabGone(tab_id),
        "denied" => HostError::Denied(failure.message),
        "malformed" => HostError::Malformed(failure.message),
        _ => HostError::Unavailable(failure.message),
    }
}

fn capability_error(err: JsValue) -> HostError {
    let failure = bridge_failure(err);
    match failure.kind.as_str() {
        "malformed" => HostError::Malformed(failure.message),
        "denied" => HostError::Denied(failure.message),
        _ => HostError::Unavailable(failure.message),
    }
}

fn text_reply(value: JsValue) -> Result<String, HostError> {
    value
        .as_string()
        .ok_or_else(|| HostError::Malformed(format!("expected a string, got {:?}", value)))
}

/// chrome.storage wants plain objects, not JS Maps
fn to_js(value: &impl Serialize) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

pub struct ChromeTabs;

impl ExtractionHost for ChromeTabs {
    async fn tab(&self, tab_id: TabId) -> Result<TabInfo, HostError> {
        let tab_js = getTab(tab_id).await.map_err(|e| tab_error(tab_id, e))?;
        serde_wasm_bindgen::from_value(tab_js).map_err(|e| HostError::Malformed(format!("Failed to parse tab: {:?}", e)))
    }

    async fn snapshot_text(&self, tab_id: TabId) -> Result<String, HostError> {
        let text = captureSnapshot(tab_id).await.map_err(|e| tab_error(tab_id, e))?;
        // Pages without a body come back as null
        Ok(text.as_string().unwrap_or_default())
    }
}

pub struct ChromeAi;

impl AiCapability for ChromeAi {
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String, HostError> {
        let options_js = to_js(options).map_err(|e| HostError::Malformed(format!("Failed to serialize: {:?}", e)))?;
        let reply = aiSummarize(text, options_js).await.map_err(capability_error)?;
        text_reply(reply)
    }

    async fn generate(&self, prompt: &str) -> Result<String, HostError> {
        let reply = aiGenerate(prompt).await.map_err(capability_error)?;
        text_reply(reply)
    }
}

pub struct ChromeStorage;

impl KeyValueStore for ChromeStorage {
    async fn get_all(&self) -> StoreResult<Map<String, Value>> {
        let all_js = storageGetAll()
            .await
            .map_err(|e| StoreError::Read(format!("Failed to get storage: {:?}", e)))?;
        serde_wasm_bindgen::from_value(all_js).map_err(|e| StoreError::Codec(format!("Failed to parse storage: {:?}", e)))
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let value_js = storageGet(key)
            .await
            .map_err(|e| StoreError::Read(format!("Failed to get {}: {:?}", key, e)))?;
        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| StoreError::Codec(format!("Failed to parse {}: {:?}", key, e)))
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let value_js = to_js(&value).map_err(|e| StoreError::Codec(format!("Failed to serialize {}: {:?}", key, e)))?;
        storageSet(key, value_js)
            .await
            .map_err(|e| StoreError::Write(format!("Failed to save {}: {:?}", key, e)))
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        storageRemove(key)
            .await
            .map_err(|e| StoreError::Write(format!("Failed to remove {}: {:?}", key, e)))
    }
}

pub struct ActionBadge;

impl BadgeSink for ActionBadge {
    async fn publish(&self, text: &str, tooltip: &str) -> Result<(), HostError> {
        setBadge(text, tooltip).await.map_err(capability_error)
    }
}

pub struct JsTimer;

impl Timer for JsTimer {
    async fn sleep(&self, ms: u32) {
        if let Err(e) = delay(ms).await {
            log::warn!("Timer failed: {:?}", e);
        }
    }
}

pub async fn query_tabs() -> Result<Vec<TabInfo>, String> {
    let tabs_js = queryTabs()
        .await
        .map_err(|e| format!("Failed to get tabs: {:?}", e))?;
    serde_wasm_bindgen::from_value(tabs_js).map_err(|e| format!("Failed to parse tabs: {:?}", e))
}

pub async fn activate_tab(tab_id: TabId) -> Result<(), String> {
    activateTab(tab_id)
        .await
        .map_err(|e| format!("Failed to switch to tab {}: {:?}", tab_id, e))
}

/// Fires for every tab that finishes loading
pub fn on_tab_updated(mut handler: impl FnMut(TabInfo) + 'static) {
    let callback = Closure::wrap(Box::new(move |tab_js: JsValue| {
        match serde_wasm_bindgen::from_value::<TabInfo>(tab_js) {
            Ok(tab) => handler(tab),
            Err(e) => log::warn!("Ignoring unparseable tab update: {:?}", e),
        }
    }) as Box<dyn FnMut(JsValue)>);

    onTabUpdated(callback.as_ref().unchecked_ref());
    callback.forget();
}

pub fn on_tab_removed(handler: impl FnMut(TabId) + 'static) {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(TabId)>);

    onTabRemoved(callback.as_ref().unchecked_ref());
    callback.forget();
}

/// Fires when the toolbar button is clicked
pub fn on_action_clicked(handler: impl FnMut() + 'static) {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);

    onActionClicked(callback.as_ref().unchecked_ref());
    callback.forget();
}

pub async fn open_dashboard() -> Result<(), String> {
    openDashboard()
        .await
        .map_err(|e| format!("Failed to open dashboard: {:?}", e))
}

/// Fires when a pipeline result lands in storage
pub fn on_record_stored(mut handler: impl FnMut(TabRecord) + 'static) {
    let callback = Closure::wrap(Box::new(move |record_js: JsValue| {
        match serde_wasm_bindgen::from_value::<TabRecord>(record_js) {
            Ok(record) => handler(record),
            Err(e) => log::warn!("Ignoring unparseable stored record: {:?}", e),
        }
    }) as Box<dyn FnMut(JsValue)>);

    onRecordStored(callback.as_ref().unchecked_ref());
    callback.forget();
}
