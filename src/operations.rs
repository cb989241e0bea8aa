/// Record operations for the dashboard: filtering, searching, sorting

use crate::tab_data::{Category, TabId, TabRecord};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// "all" or a category label in any case; anything else is rejected
    pub fn parse(key: &str) -> Option<CategoryFilter> {
        if key.trim().eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        Category::from_key(key).map(CategoryFilter::Only)
    }

    pub fn key(self) -> String {
        match self {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(category) => category.label().to_lowercase(),
        }
    }

    pub fn matches(self, record: &TabRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => record.category == category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    LastUpdated,
    Title,
    Category,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::LastUpdated, SortKey::Title, SortKey::Category];

    /// Values used by the sort selector
    pub fn value(self) -> &'static str {
        match self {
            SortKey::LastUpdated => "date",
            SortKey::Title => "name",
            SortKey::Category => "category",
        }
    }

    pub fn from_value(value: &str) -> Option<SortKey> {
        SortKey::ALL.into_iter().find(|key| key.value() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::LastUpdated => "Last updated",
            SortKey::Title => "Title",
            SortKey::Category => "Category",
        }
    }
}

/// Case-insensitive substring match over title and summary. An empty query matches everything.
pub fn matches_search(record: &TabRecord, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    record.title.to_lowercase().contains(&query) || record.summary.to_lowercase().contains(&query)
}

/// Filter and search must both pass
pub fn is_visible(record: &TabRecord, filter: CategoryFilter, query: &str) -> bool {
    filter.matches(record) && matches_search(record, query)
}

fn compare(a: &TabRecord, b: &TabRecord, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::LastUpdated => b.last_updated.cmp(&a.last_updated),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Category => a.category.label().cmp(b.category.label()),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Display order for a set of records
pub fn sort_records<'a, I>(records: I, key: SortKey) -> Vec<TabId>
where
    I: IntoIterator<Item = &'a TabRecord>,
{
    let mut sorted: Vec<&TabRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| compare(a, b, key));
    sorted.into_iter().map(|record| record.id).collect()
}
