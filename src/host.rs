/// Seams between the pipeline and the browser.
///
/// Every collaborator is an async trait so the pipeline can be driven by the
/// extension APIs in production and by in-memory fakes in tests. The futures
/// are not `Send`: everything runs on the extension's single event thread.
use crate::error::{HostError, StoreResult};
use crate::summarizer::SummaryOptions;
use crate::tab_data::{TabId, TabInfo};
use serde_json::{Map, Value};

/// Looks up live tabs and runs the snapshot routine inside them
#[allow(async_fn_in_trait)]
pub trait ExtractionHost {
    /// Current state of a tab, or `HostError::TabGone` once it has closed.
    async fn tab(&self, tab_id: TabId) -> Result<TabInfo, HostError>;

    /// Raw text of a script/style-free clone of the page body.
    async fn snapshot_text(&self, tab_id: TabId) -> Result<String, HostError>;
}

/// The platform AI capability
#[allow(async_fn_in_trait)]
pub trait AiCapability {
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String, HostError>;

    async fn generate(&self, prompt: &str) -> Result<String, HostError>;
}

/// Flat async key-value storage, keyed by tab id string plus the settings key
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get_all(&self) -> StoreResult<Map<String, Value>>;

    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Where the aggregate category count is shown
#[allow(async_fn_in_trait)]
pub trait BadgeSink {
    async fn publish(&self, text: &str, tooltip: &str) -> Result<(), HostError>;
}

#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, ms: u32);
}
