/// Tab registry: the authoritative tab id -> record mapping
use crate::badge::BadgeCount;
use crate::error::StoreResult;
use crate::host::KeyValueStore;
use crate::storage::{StorageSnapshot, encode_record, parse_record_key, record_key};
use crate::tab_data::{TabId, TabRecord};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

/// Outcome of writing a pipeline result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Written,
    /// The tab was removed (or restarted) after this run began; nothing written
    Stale,
}

/// Scoped membership in the processing set. Dropping it releases the tab.
#[derive(Debug)]
pub struct InFlight<'r> {
    processing: &'r RefCell<HashSet<TabId>>,
    tab_id: TabId,
    stamp: u64,
}

impl InFlight<'_> {
    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.processing.borrow_mut().remove(&self.tab_id);
    }
}

/// Owns the store plus the per-tab bookkeeping that keeps writes consistent.
///
/// Every operation is a single store call, so each one either lands whole or
/// not at all. Nothing here serializes runs for *different* tabs: a badge
/// recompute may read a scan that another run's write lands right after. The
/// next recompute corrects it.
pub struct TabRegistry<S: KeyValueStore> {
    store: S,
    processing: RefCell<HashSet<TabId>>,
    stamps: RefCell<HashMap<TabId, u64>>,
    next_stamp: Cell<u64>,
}

impl<S: KeyValueStore> TabRegistry<S> {
    pub fn new(store: S) -> Self {
        TabRegistry {
            store,
            processing: RefCell::new(HashSet::new()),
            stamps: RefCell::new(HashMap::new()),
            next_stamp: Cell::new(1),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_processing(&self, tab_id: TabId) -> bool {
        self.processing.borrow().contains(&tab_id)
    }

    /// Claim a tab for one pipeline run. None if a run is already in flight.
    pub fn try_begin(&self, tab_id: TabId) -> Option<InFlight<'_>> {
        if !self.processing.borrow_mut().insert(tab_id) {
            return None;
        }

        let stamp = self.next_stamp.get();
        self.next_stamp.set(stamp + 1);
        self.stamps.borrow_mut().insert(tab_id, stamp);

        Some(InFlight {
            processing: &self.processing,
            tab_id,
            stamp,
        })
    }

    /// Idempotent overwrite
    pub async fn upsert(&self, record: &TabRecord) -> StoreResult<()> {
        let value = encode_record(record)?;
        self.store.set(&record_key(record.id), value).await
    }

    /// Write a run's result unless the tab was removed after the run began
    pub async fn commit(&self, run: &InFlight<'_>, record: &TabRecord) -> StoreResult<Commit> {
        let current = self.stamps.borrow().get(&run.tab_id).copied();
        if current != Some(run.stamp) {
            log::warn!(
                "Discarding stale result for tab {} (run {}, current {:?})",
                run.tab_id,
                run.stamp,
                current
            );
            return Ok(Commit::Stale);
        }

        self.upsert(record).await?;
        Ok(Commit::Written)
    }

    /// Remove the record if present. Any run still in flight for the tab goes stale.
    pub async fn remove(&self, tab_id: TabId) -> StoreResult<()> {
        self.stamps.borrow_mut().remove(&tab_id);
        self.store.remove(&record_key(tab_id)).await
    }

    pub async fn get(&self, tab_id: TabId) -> StoreResult<Option<TabRecord>> {
        match self.store.get(&record_key(tab_id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn snapshot(&self) -> StoreResult<StorageSnapshot> {
        let entries = self.store.get_all().await?;
        Ok(StorageSnapshot::from_entries(entries))
    }

    pub async fn scan(&self) -> StoreResult<Vec<TabRecord>> {
        Ok(self.snapshot().await?.into_records())
    }

    /// Full-scan recompute; never an incremental counter
    pub async fn badge_count(&self) -> StoreResult<BadgeCount> {
        let records = self.scan().await?;
        Ok(BadgeCount::from_records(&records))
    }

    /// Delete records for tabs that are no longer open. Returns the ids removed.
    pub async fn reconcile(&self, open_tabs: &HashSet<TabId>) -> StoreResult<Vec<TabId>> {
        let entries = self.store.get_all().await?;
        let mut orphans: Vec<TabId> = entries
            .keys()
            .filter_map(|key| parse_record_key(key))
            .filter(|tab_id| !open_tabs.contains(tab_id))
            .collect();
        orphans.sort_unstable();

        for tab_id in &orphans {
            self.remove(*tab_id).await?;
        }

        if !orphans.is_empty() {
            log::info!("Dropped {} records for closed tabs", orphans.len());
        }
        Ok(orphans)
    }
}
