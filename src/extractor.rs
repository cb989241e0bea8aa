/// Page content extraction: turns a live tab into a bounded text snapshot
use crate::error::HostError;
use crate::host::{ExtractionHost, Timer};
use crate::tab_data::TabInfo;
use crate::timeout::Deadline;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

const SYSTEM_SCHEMES: [&str; 5] = ["chrome", "chrome-extension", "edge", "about", "chrome-search"];

/// Prefixes of every placeholder the pipeline can produce in place of real content
const SENTINEL_PREFIXES: [&str; 4] = [
    "System page:",
    "Unable to access",
    "No content available",
    "Tab no longer exists",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    TabGone,
    Inaccessible,
    NoContent,
}

impl Placeholder {
    pub fn message(self, title: &str) -> String {
        match self {
            Placeholder::TabGone => "Tab no longer exists".to_string(),
            Placeholder::Inaccessible => format!("Unable to access content: {}", title),
            Placeholder::NoContent => format!("No content available for: {}", title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    SystemPage,
    Failed(Placeholder),
}

impl Extraction {
    /// The string handed to the next stage. Never empty.
    pub fn into_text(self, title: &str) -> String {
        match self {
            Extraction::Text(text) => text,
            Extraction::SystemPage => system_page_summary(title),
            Extraction::Failed(placeholder) => placeholder.message(title),
        }
    }
}

pub fn system_page_summary(title: &str) -> String {
    format!("System page: {}", title)
}

/// Internal browser pages can't be scripted and carry no user content
pub fn is_system_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => SYSTEM_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

pub fn is_placeholder_text(text: &str) -> bool {
    SENTINEL_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Collapse whitespace runs, trim, and keep at most `limit` characters
pub fn clean_snapshot_text(raw: &str, limit: usize) -> String {
    let collapsed = whitespace().replace_all(raw, " ");
    collapsed.trim().chars().take(limit).collect()
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractLimits {
    pub char_limit: usize,
    pub min_chars: usize,
}

pub async fn extract<H, T>(host: &H, deadline: &Deadline<'_, T>, tab: &TabInfo, limits: ExtractLimits) -> Extraction
where
    H: ExtractionHost,
    T: Timer,
{
    if is_system_url(&tab.url) {
        return Extraction::SystemPage;
    }

    match deadline.run("tab lookup", host.tab(tab.id)).await {
        Ok(Ok(_)) => {}
        Ok(Err(HostError::TabGone(_))) => return Extraction::Failed(Placeholder::TabGone),
        Ok(Err(e)) => {
            log::warn!("Tab {} lookup failed: {}", tab.id, e);
            return Extraction::Failed(Placeholder::Inaccessible);
        }
        Err(_) => return Extraction::Failed(Placeholder::Inaccessible),
    }

    let raw = match deadline.run("snapshot", host.snapshot_text(tab.id)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(HostError::TabGone(_))) => return Extraction::Failed(Placeholder::TabGone),
        Ok(Err(e)) => {
            log::warn!("Snapshot of tab {} failed: {}", tab.id, e);
            return Extraction::Failed(Placeholder::Inaccessible);
        }
        Err(_) => return Extraction::Failed(Placeholder::Inaccessible),
    };

    let text = clean_snapshot_text(&raw, limits.char_limit);
    if text.chars().count() < limits.min_chars {
        return Extraction::Failed(Placeholder::NoContent);
    }

    Extraction::Text(text)
}
