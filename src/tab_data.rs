/// Data structures for Tab Lens
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type TabId = i32;

pub const DEFAULT_FAVICON: &str = "assets/default-favicon.png";

/// Information about a browser tab, as reported by the tabs API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}

impl TabInfo {
    pub fn new(id: TabId, url: &str, title: &str) -> TabInfo {
        TabInfo {
            id,
            url: url.to_string(),
            title: title.to_string(),
            fav_icon_url: None,
        }
    }

    pub fn favicon(&self) -> String {
        self.fav_icon_url
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .unwrap_or(DEFAULT_FAVICON)
            .to_string()
    }
}

/// The closed set of categories a tab can be filed under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Research,
    Assignments,
    #[serde(rename = "Lecture Notes")]
    LectureNotes,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Research,
        Category::Assignments,
        Category::LectureNotes,
        Category::Miscellaneous,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Research => "Research",
            Category::Assignments => "Assignments",
            Category::LectureNotes => "Lecture Notes",
            Category::Miscellaneous => "Miscellaneous",
        }
    }

    /// Exact label match. "research" is not a category, "Research" is.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Case-insensitive match, for filter keys coming from the UI
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The derived record kept for every tracked tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: TabId,
    pub title: String,
    pub url: String,
    #[serde(default = "default_favicon")]
    pub favicon: String,
    pub summary: String,
    pub category: Category,
    pub last_updated: DateTime<Utc>,
}

fn default_favicon() -> String {
    DEFAULT_FAVICON.to_string()
}

impl TabRecord {
    pub fn from_tab(tab: &TabInfo, summary: String, category: Category, now: DateTime<Utc>) -> TabRecord {
        TabRecord {
            id: tab.id,
            title: tab.title.clone(),
            url: tab.url.clone(),
            favicon: tab.favicon(),
            summary,
            category,
            last_updated: now,
        }
    }
}
