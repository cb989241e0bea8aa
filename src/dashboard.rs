/// Dashboard presenter state.
///
/// Holds the working set of cards shown in the dashboard and applies live tab
/// events to it. Filter and search only toggle visibility; cards leave the
/// working set only when their tab closes.
use crate::operations::{CategoryFilter, SortKey, is_visible, sort_records};
use crate::tab_data::{Category, TabId, TabInfo, TabRecord};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

pub const LOADING_SUMMARY: &str = "Loading summary...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    Loaded(Vec<TabRecord>),
    TabUpdated(TabInfo, DateTime<Utc>),
    RecordStored(TabRecord),
    TabRemoved(TabId),
    /// Switching to the tab failed; it is gone
    ActivateFailed(TabId),
    SetFilter(CategoryFilter),
    SetSearch(String),
    SetSort(SortKey),
    SetLayout(Layout),
    DismissNotice(u32),
}

#[derive(Debug)]
pub struct Card<'a> {
    pub record: &'a TabRecord,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    records: HashMap<TabId, TabRecord>,
    order: Vec<TabId>,
    filter: CategoryFilter,
    search: String,
    sort: SortKey,
    layout: Layout,
    notice: Option<Notice>,
    next_notice: u32,
    loading: bool,
    /// Tab events that arrived before the initial load finished
    pending: Vec<DashboardAction>,
}

pub fn placeholder_record(tab: &TabInfo, now: DateTime<Utc>) -> TabRecord {
    TabRecord::from_tab(tab, LOADING_SUMMARY.to_string(), Category::Miscellaneous, now)
}

/// Stored records for the open tabs, with placeholders for tabs not yet processed
pub fn initial_records(open_tabs: &[TabInfo], stored: &BTreeMap<TabId, TabRecord>, now: DateTime<Utc>) -> Vec<TabRecord> {
    open_tabs
        .iter()
        .map(|tab| {
            stored
                .get(&tab.id)
                .cloned()
                .unwrap_or_else(|| placeholder_record(tab, now))
        })
        .collect()
}

impl DashboardState {
    pub fn new() -> Self {
        DashboardState {
            loading: true,
            ..DashboardState::default()
        }
    }

    pub fn apply(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::Loaded(records) => {
                self.records = records.into_iter().map(|r| (r.id, r)).collect();
                self.loading = false;
                self.resort();
                for pending in std::mem::take(&mut self.pending) {
                    self.apply(pending);
                }
            }
            DashboardAction::TabUpdated(..) | DashboardAction::RecordStored(_) | DashboardAction::TabRemoved(_)
                if self.loading =>
            {
                self.pending.push(action);
            }
            DashboardAction::TabUpdated(tab, now) => self.upsert(placeholder_record(&tab, now)),
            DashboardAction::RecordStored(record) => self.upsert(record),
            DashboardAction::TabRemoved(tab_id) => {
                self.remove(tab_id);
            }
            DashboardAction::ActivateFailed(tab_id) => {
                self.remove(tab_id);
                self.show_notice("This tab no longer exists");
            }
            DashboardAction::SetFilter(filter) => self.filter = filter,
            DashboardAction::SetSearch(search) => self.search = search,
            DashboardAction::SetSort(sort) => {
                self.sort = sort;
                self.resort();
            }
            DashboardAction::SetLayout(layout) => self.layout = layout,
            DashboardAction::DismissNotice(id) => {
                if self.notice.as_ref().is_some_and(|n| n.id == id) {
                    self.notice = None;
                }
            }
        }
    }

    fn upsert(&mut self, record: TabRecord) {
        self.records.insert(record.id, record);
        self.resort();
    }

    fn remove(&mut self, tab_id: TabId) -> bool {
        let removed = self.records.remove(&tab_id).is_some();
        self.order.retain(|id| *id != tab_id);
        removed
    }

    /// Rebuild display order from the working set, no refetch
    fn resort(&mut self) {
        self.order = sort_records(self.records.values(), self.sort);
    }

    fn show_notice(&mut self, message: &str) {
        self.next_notice += 1;
        self.notice = Some(Notice {
            id: self.next_notice,
            message: message.to_string(),
        });
    }

    pub fn cards(&self) -> Vec<Card<'_>> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .map(|record| Card {
                record,
                visible: is_visible(record, self.filter, &self.search),
            })
            .collect()
    }

    pub fn get(&self, tab_id: TabId) -> Option<&TabRecord> {
        self.records.get(&tab_id)
    }

    pub fn tab_count(&self) -> usize {
        self.records.len()
    }

    pub fn visible_count(&self) -> usize {
        self.cards().iter().filter(|card| card.visible).count()
    }

    pub fn count_label(&self) -> String {
        match self.tab_count() {
            1 => "1 tab".to_string(),
            n => format!("{} tabs", n),
        }
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 28, 10, minute, 0).unwrap()
    }

    fn create_test_record(id: TabId, title: &str, summary: &str, category: Category, minute: u32) -> TabRecord {
        TabRecord::from_tab(
            &TabInfo::new(id, &format!("https://example.com/{}", id), title),
            summary.to_string(),
            category,
            at(minute),
        )
    }

    fn loaded() -> DashboardState {
        let mut state = DashboardState::new();
        state.apply(DashboardAction::Loaded(vec![
            create_test_record(1, "Course X", "Homework: submit PDF", Category::Assignments, 1),
            create_test_record(2, "Course Y", "Problem set 3", Category::Assignments, 2),
            create_test_record(3, "Paper", "A PDF preprint on graphs", Category::Research, 3),
            create_test_record(4, "Week 5 slides", "Lecture on sorting", Category::LectureNotes, 4),
        ]));
        state
    }

    fn visible_ids(state: &DashboardState) -> Vec<TabId> {
        state
            .cards()
            .iter()
            .filter(|card| card.visible)
            .map(|card| card.record.id)
            .collect()
    }

    #[test]
    fn test_initial_records_use_placeholders() {
        let open = vec![
            TabInfo::new(1, "https://example.com/1", "Stored"),
            TabInfo::new(2, "https://example.com/2", "Fresh"),
        ];
        let mut stored = BTreeMap::new();
        stored.insert(1, create_test_record(1, "Stored", "Real summary", Category::Research, 0));

        let records = initial_records(&open, &stored, at(5));

        assert_eq!(records[0].summary, "Real summary");
        assert_eq!(records[1].summary, LOADING_SUMMARY);
        assert_eq!(records[1].category, Category::Miscellaneous);
    }

    #[test]
    fn test_default_order_is_most_recent_first() {
        let state = loaded();

        assert!(!state.is_loading());
        assert_eq!(visible_ids(&state), vec![4, 3, 2, 1]);
        assert_eq!(state.count_label(), "4 tabs");
    }

    #[test]
    fn test_filter_toggles_visibility_only() {
        let mut state = loaded();

        state.apply(DashboardAction::SetFilter(CategoryFilter::parse("assignments").unwrap()));

        assert_eq!(visible_ids(&state), vec![2, 1]);
        assert_eq!(state.cards().len(), 4);
        assert_eq!(state.tab_count(), 4);
    }

    #[test]
    fn test_filter_and_search_are_anded() {
        let mut state = loaded();

        state.apply(DashboardAction::SetFilter(CategoryFilter::parse("assignments").unwrap()));
        state.apply(DashboardAction::SetSearch("pdf".to_string()));

        assert_eq!(visible_ids(&state), vec![1]);
        assert_eq!(state.visible_count(), 1);

        state.apply(DashboardAction::SetFilter(CategoryFilter::All));
        assert_eq!(visible_ids(&state), vec![3, 1]);
    }

    #[test]
    fn test_resort_keeps_working_set() {
        let mut state = loaded();

        state.apply(DashboardAction::SetSort(SortKey::Title));
        let titles: Vec<&str> = state.cards().iter().map(|c| c.record.title.as_str()).collect();
        assert_eq!(titles, vec!["Course X", "Course Y", "Paper", "Week 5 slides"]);

        state.apply(DashboardAction::SetSort(SortKey::Category));
        let ids: Vec<TabId> = state.cards().iter().map(|c| c.record.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_tab_updated_shows_placeholder_then_real_record() {
        let mut state = loaded();
        let tab = TabInfo::new(9, "https://lms.example.edu", "Course Z");

        state.apply(DashboardAction::TabUpdated(tab.clone(), at(10)));
        let placeholder = state.get(9).unwrap();
        assert_eq!(placeholder.summary, LOADING_SUMMARY);
        assert_eq!(placeholder.category, Category::Miscellaneous);
        assert_eq!(state.tab_count(), 5);

        state.apply(DashboardAction::RecordStored(create_test_record(9, "Course Z", "Quiz 2 due", Category::Assignments, 11)));
        assert_eq!(state.get(9).unwrap().category, Category::Assignments);
        assert_eq!(state.tab_count(), 5);
    }

    #[test]
    fn test_tab_removed_drops_card_and_count() {
        let mut state = loaded();

        state.apply(DashboardAction::TabRemoved(3));

        assert_eq!(state.tab_count(), 3);
        assert!(state.get(3).is_none());
        assert!(state.cards().iter().all(|c| c.record.id != 3));

        state.apply(DashboardAction::TabRemoved(3));
        assert_eq!(state.tab_count(), 3);
    }

    #[test]
    fn test_activate_failure_shows_transient_notice() {
        let mut state = loaded();

        state.apply(DashboardAction::ActivateFailed(2));
        let notice = state.notice().cloned().unwrap();
        assert_eq!(notice.message, "This tab no longer exists");
        assert!(state.get(2).is_none());

        state.apply(DashboardAction::DismissNotice(notice.id + 1));
        assert!(state.notice().is_some());
        state.apply(DashboardAction::DismissNotice(notice.id));
        assert!(state.notice().is_none());
    }

    #[test]
    fn test_events_during_load_apply_after_loaded() {
        let mut state = DashboardState::new();

        state.apply(DashboardAction::TabUpdated(TabInfo::new(9, "https://lms.example.edu", "Course Z"), at(10)));
        state.apply(DashboardAction::RecordStored(create_test_record(2, "Course Y", "Problem set 4", Category::Assignments, 12)));
        state.apply(DashboardAction::TabRemoved(3));
        assert_eq!(state.tab_count(), 0);

        state.apply(DashboardAction::Loaded(vec![
            create_test_record(2, "Course Y", "Problem set 3", Category::Assignments, 2),
            create_test_record(3, "Paper", "A PDF preprint on graphs", Category::Research, 3),
        ]));

        assert!(!state.is_loading());
        assert_eq!(state.tab_count(), 2);
        assert_eq!(state.get(9).unwrap().summary, LOADING_SUMMARY);
        assert_eq!(state.get(2).unwrap().summary, "Problem set 4");
        assert!(state.get(3).is_none());
        assert_eq!(visible_ids(&state), vec![2, 9]);
    }

    #[test]
    fn test_count_label_singular() {
        let mut state = DashboardState::new();
        state.apply(DashboardAction::Loaded(vec![create_test_record(1, "Only", "", Category::Research, 0)]));

        assert_eq!(state.count_label(), "1 tab");
    }
}
