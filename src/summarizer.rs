/// Summarization client over the platform AI capability
use crate::extractor::is_placeholder_text;
use crate::host::{AiCapability, Timer};
use crate::timeout::Deadline;
use serde::{Deserialize, Serialize};

/// Options forwarded to the capability. Unknown keys are ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryOptions {
    pub max_length: usize,
    pub format: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummaryOptions {
            max_length: 100,
            format: "paragraph".to_string(),
        }
    }
}

pub fn fallback_summary(title: &str) -> String {
    format!("Content from: {}", title)
}

/// Summarize extracted page text. Never fails: capability errors, timeouts and
/// empty replies all degrade to a string derived from the title.
pub async fn summarize<A, T>(
    ai: &A,
    deadline: &Deadline<'_, T>,
    text: &str,
    title: &str,
    options: &SummaryOptions,
) -> String
where
    A: AiCapability,
    T: Timer,
{
    // Placeholders pass through untouched so the categorizer still recognizes them
    if is_placeholder_text(text) {
        return text.to_string();
    }

    match deadline.run("summarize", ai.summarize(text, options)).await {
        Ok(Ok(summary)) => {
            let summary = summary.trim();
            if summary.is_empty() {
                format!("Unable to summarize: {}", title)
            } else {
                // A zero limit still keeps one character so the summary is never empty
                summary.chars().take(options.max_length.max(1)).collect()
            }
        }
        Ok(Err(e)) => {
            log::warn!("AI summarization failed for {:?}: {}", title, e);
            fallback_summary(title)
        }
        Err(_) => fallback_summary(title),
    }
}
