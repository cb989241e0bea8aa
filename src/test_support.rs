/// In-memory collaborators for driving the pipeline in tests
use crate::error::{HostError, StoreError, StoreResult};
use crate::host::{AiCapability, BadgeSink, ExtractionHost, KeyValueStore, Timer};
use crate::summarizer::SummaryOptions;
use crate::tab_data::{TabId, TabInfo};
use futures::channel::oneshot;
use futures::future;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, Value>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.entries.borrow_mut().insert(key.to_string(), value);
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.fail_reads.get() {
            return Err(StoreError::Read("storage offline".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Write("quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_all(&self) -> StoreResult<Map<String, Value>> {
        self.check_read()?;
        Ok(self
            .entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        self.check_read()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.check_write()?;
        self.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_write()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Tabs and page bodies. A tab without a page is treated as closed.
#[derive(Default)]
pub struct FakeHost {
    tabs: RefCell<HashMap<TabId, TabInfo>>,
    pages: RefCell<HashMap<TabId, Result<String, HostError>>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    hang: Cell<bool>,
    snapshot_calls: Cell<usize>,
}

impl FakeHost {
    pub fn new() -> Self {
        FakeHost::default()
    }

    pub fn with_page(self, tab: &TabInfo, body: Result<&str, HostError>) -> Self {
        self.tabs.borrow_mut().insert(tab.id, tab.clone());
        self.pages.borrow_mut().insert(tab.id, body.map(str::to_string));
        self
    }

    pub fn hang_snapshots(self) -> Self {
        self.hang.set(true);
        self
    }

    /// The next snapshot waits until the returned sender fires (or is dropped)
    pub fn gate_next_snapshot(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn close_tab(&self, tab_id: TabId) {
        self.tabs.borrow_mut().remove(&tab_id);
        self.pages.borrow_mut().remove(&tab_id);
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.get()
    }
}

impl ExtractionHost for FakeHost {
    async fn tab(&self, tab_id: TabId) -> Result<TabInfo, HostError> {
        self.tabs
            .borrow()
            .get(&tab_id)
            .cloned()
            .ok_or(HostError::TabGone(tab_id))
    }

    async fn snapshot_text(&self, tab_id: TabId) -> Result<String, HostError> {
        self.snapshot_calls.set(self.snapshot_calls.get() + 1);

        let gate = self.gate.borrow_mut().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        if self.hang.get() {
            future::pending::<()>().await;
        }

        self.pages
            .borrow()
            .get(&tab_id)
            .cloned()
            .unwrap_or(Err(HostError::TabGone(tab_id)))
    }
}

pub struct FakeAi {
    summary: RefCell<Result<String, HostError>>,
    label: RefCell<Result<String, HostError>>,
    hang: Cell<bool>,
    summarize_calls: Cell<usize>,
    generate_calls: Cell<usize>,
    last_prompt: RefCell<Option<String>>,
}

impl FakeAi {
    /// Both operations fail until scripted otherwise
    pub fn new() -> Self {
        FakeAi {
            summary: RefCell::new(Err(HostError::Unavailable("not scripted".to_string()))),
            label: RefCell::new(Err(HostError::Unavailable("not scripted".to_string()))),
            hang: Cell::new(false),
            summarize_calls: Cell::new(0),
            generate_calls: Cell::new(0),
            last_prompt: RefCell::new(None),
        }
    }

    pub fn summarize_with(self, reply: Result<&str, HostError>) -> Self {
        *self.summary.borrow_mut() = reply.map(str::to_string);
        self
    }

    pub fn generate_with(self, reply: Result<&str, HostError>) -> Self {
        *self.label.borrow_mut() = reply.map(str::to_string);
        self
    }

    pub fn hang(self) -> Self {
        self.hang.set(true);
        self
    }

    pub fn summarize_calls(&self) -> usize {
        self.summarize_calls.get()
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.get()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.borrow().clone()
    }
}

impl AiCapability for FakeAi {
    async fn summarize(&self, _text: &str, _options: &SummaryOptions) -> Result<String, HostError> {
        self.summarize_calls.set(self.summarize_calls.get() + 1);
        if self.hang.get() {
            future::pending::<()>().await;
        }
        self.summary.borrow().clone()
    }

    async fn generate(&self, prompt: &str) -> Result<String, HostError> {
        self.generate_calls.set(self.generate_calls.get() + 1);
        *self.last_prompt.borrow_mut() = Some(prompt.to_string());
        if self.hang.get() {
            future::pending::<()>().await;
        }
        self.label.borrow().clone()
    }
}

#[derive(Default)]
pub struct RecordingBadge {
    published: RefCell<Vec<(String, String)>>,
}

impl RecordingBadge {
    pub fn new() -> Self {
        RecordingBadge::default()
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.borrow().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.published.borrow().last().map(|(text, _)| text.clone())
    }
}

impl BadgeSink for RecordingBadge {
    async fn publish(&self, text: &str, tooltip: &str) -> Result<(), HostError> {
        self.published
            .borrow_mut()
            .push((text.to_string(), tooltip.to_string()));
        Ok(())
    }
}

/// Every deadline expires as soon as the guarded future yields
pub struct InstantTimer;

impl Timer for InstantTimer {
    async fn sleep(&self, _ms: u32) {}
}

/// Deadlines never expire
pub struct NeverTimer;

impl Timer for NeverTimer {
    async fn sleep(&self, _ms: u32) {
        future::pending::<()>().await
    }
}
