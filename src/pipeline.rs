/// The per-tab processing pipeline: extract -> summarize -> categorize -> persist
use crate::badge::BadgeCount;
use crate::categorizer::categorize;
use crate::error::StoreError;
use crate::extractor::{ExtractLimits, Extraction, Placeholder, extract, is_system_url, system_page_summary};
use crate::host::{AiCapability, BadgeSink, ExtractionHost, KeyValueStore, Timer};
use crate::registry::{Commit, TabRegistry};
use crate::settings::Settings;
use crate::summarizer::summarize;
use crate::tab_data::{Category, TabId, TabInfo, TabRecord};
use crate::timeout::Deadline;
use chrono::Utc;
use std::rc::Rc;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Another run for the same tab was already in flight
    Dropped,
    Stored(TabRecord),
    /// The tab was removed while this run was in flight
    Stale,
    Abandoned(AbandonReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AbandonReason {
    TabGone,
    Storage(StoreError),
}

pub struct TabPipeline<S, H, A, B, T>
where
    S: KeyValueStore,
    H: ExtractionHost,
    A: AiCapability,
    B: BadgeSink,
    T: Timer,
{
    registry: Rc<TabRegistry<S>>,
    host: H,
    ai: A,
    badge: B,
    timer: T,
    settings: Settings,
}

impl<S, H, A, B, T> TabPipeline<S, H, A, B, T>
where
    S: KeyValueStore,
    H: ExtractionHost,
    A: AiCapability,
    B: BadgeSink,
    T: Timer,
{
    pub fn new(registry: Rc<TabRegistry<S>>, host: H, ai: A, badge: B, timer: T, settings: Settings) -> Self {
        TabPipeline {
            registry,
            host,
            ai,
            badge,
            timer,
            settings,
        }
    }

    pub fn registry(&self) -> &TabRegistry<S> {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn ai(&self) -> &A {
        &self.ai
    }

    pub fn badge(&self) -> &B {
        &self.badge
    }

    /// Entry point for every "tab finished loading" event
    pub async fn run_pipeline(&self, tab: TabInfo) -> RunOutcome {
        let Some(run) = self.registry.try_begin(tab.id) else {
            log::debug!("Tab {} already processing, dropping event", tab.id);
            return RunOutcome::Dropped;
        };

        let run_id = Uuid::new_v4();
        log::debug!("[{}] Processing tab {} ({})", run_id, tab.id, tab.url);

        let record = match self.build_record(&tab).await {
            Ok(record) => record,
            Err(reason) => {
                log::warn!("[{}] Abandoned tab {}: {:?}", run_id, tab.id, reason);
                return RunOutcome::Abandoned(reason);
            }
        };

        let outcome = match self.registry.commit(&run, &record).await {
            Ok(Commit::Written) => {
                log::info!("[{}] Stored tab {} as {}", run_id, tab.id, record.category);
                RunOutcome::Stored(record)
            }
            Ok(Commit::Stale) => return RunOutcome::Stale,
            Err(e) => {
                log::error!("[{}] Failed to store tab {}: {}", run_id, tab.id, e);
                return RunOutcome::Abandoned(AbandonReason::Storage(e));
            }
        };
        drop(run);

        self.refresh_badge().await;
        outcome
    }

    async fn build_record(&self, tab: &TabInfo) -> Result<TabRecord, AbandonReason> {
        if is_system_url(&tab.url) {
            let summary = system_page_summary(&tab.title);
            return Ok(TabRecord::from_tab(tab, summary, Category::Miscellaneous, Utc::now()));
        }

        let deadline = Deadline::new(&self.timer, self.settings.stage_timeout_ms);
        let limits = ExtractLimits {
            char_limit: self.settings.snapshot_char_limit,
            min_chars: self.settings.min_content_chars,
        };

        let extraction = extract(&self.host, &deadline, tab, limits).await;
        if extraction == Extraction::Failed(Placeholder::TabGone) {
            return Err(AbandonReason::TabGone);
        }
        log::debug!("Tab {} extraction: {:?}", tab.id, extraction);

        let text = extraction.into_text(&tab.title);
        let options = self.settings.summary_options();
        let summary = summarize(&self.ai, &deadline, &text, &tab.title, &options).await;
        let category = categorize(&self.ai, &deadline, &summary, &tab.title).await;

        Ok(TabRecord::from_tab(tab, summary, category, Utc::now()))
    }

    /// Entry point for every "tab removed" event
    pub async fn handle_removed(&self, tab_id: TabId) -> Result<(), StoreError> {
        if let Err(e) = self.registry.remove(tab_id).await {
            log::error!("Failed to remove tab {}: {}", tab_id, e);
            return Err(e);
        }
        self.refresh_badge().await;
        Ok(())
    }

    /// Rescan the registry and publish the category count
    pub async fn refresh_badge(&self) -> Option<BadgeCount> {
        let badge = match self.registry.badge_count().await {
            Ok(badge) => badge,
            Err(e) => {
                log::error!("Badge recompute failed: {}", e);
                return None;
            }
        };

        if let Err(e) = self.badge.publish(&badge.text(), &badge.tooltip()).await {
            log::warn!("Failed to publish badge: {}", e);
        }
        log::info!("Badge updated: {} tabs", badge.total());
        Some(badge)
    }
}
