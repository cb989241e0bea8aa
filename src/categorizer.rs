/// Closed-world categorization of a summarized tab
use crate::extractor::is_placeholder_text;
use crate::host::{AiCapability, Timer};
use crate::tab_data::Category;
use crate::timeout::Deadline;

pub fn build_prompt(summary: &str, title: &str) -> String {
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    format!(
        "Categorize the following content into one of these categories: {}. Content: Title: {}\nContent: {}",
        labels.join(", "),
        title,
        summary
    )
}

/// Anything that isn't exactly one of the category labels is Miscellaneous
pub fn parse_label(reply: &str) -> Category {
    Category::from_label(reply.trim()).unwrap_or(Category::Miscellaneous)
}

pub async fn categorize<A, T>(ai: &A, deadline: &Deadline<'_, T>, summary: &str, title: &str) -> Category
where
    A: AiCapability,
    T: Timer,
{
    if is_placeholder_text(summary) {
        return Category::Miscellaneous;
    }

    let prompt = build_prompt(summary, title);
    match deadline.run("categorize", ai.generate(&prompt)).await {
        Ok(Ok(reply)) => {
            let category = parse_label(&reply);
            log::debug!("Categorized {:?} as {} (reply {:?})", title, category, reply);
            category
        }
        Ok(Err(e)) => {
            log::warn!("Categorization failed for {:?}: {}", title, e);
            Category::Miscellaneous
        }
        Err(_) => Category::Miscellaneous,
    }
}
