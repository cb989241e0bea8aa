/// Category counting for the toolbar badge
use crate::tab_data::{Category, TabRecord};
use std::collections::HashMap;

/// Count records per category. Categories with no records are absent.
pub fn count_categories(records: &[TabRecord]) -> HashMap<Category, usize> {
    records
        .iter()
        .map(|record| record.category)
        .fold(HashMap::new(), |mut counts, category| {
            *counts.entry(category).or_insert(0) += 1;
            counts
        })
}

/// Aggregate count derived from a full scan of the registry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BadgeCount {
    counts: HashMap<Category, usize>,
}

impl BadgeCount {
    pub fn from_records(records: &[TabRecord]) -> Self {
        BadgeCount {
            counts: count_categories(records),
        }
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Categories by count descending, then in their declared order
    pub fn ranked(&self) -> Vec<(Category, usize)> {
        let mut ranked: Vec<(Category, usize)> = Category::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
            .filter(|(_, count)| *count > 0)
            .collect();

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Empty when nothing is tracked, which clears the badge
    pub fn text(&self) -> String {
        match self.total() {
            0 => String::new(),
            n => n.to_string(),
        }
    }

    pub fn tooltip(&self) -> String {
        if self.total() == 0 {
            return "No tabs tracked".to_string();
        }
        self.ranked()
            .into_iter()
            .map(|(category, count)| format!("{}: {}", category, count))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_data::TabInfo;
    use chrono::Utc;

    fn record(id: i32, category: Category) -> TabRecord {
        TabRecord::from_tab(
            &TabInfo::new(id, "https://example.com", "Example"),
            "summary".to_string(),
            category,
            Utc::now(),
        )
    }

    #[test]
    fn test_count_categories() {
        let records = vec![
            record(1, Category::Research),
            record(2, Category::Assignments),
            record(3, Category::Research),
            record(4, Category::Miscellaneous),
        ];

        let counts = count_categories(&records);

        assert_eq!(counts.get(&Category::Research), Some(&2));
        assert_eq!(counts.get(&Category::Assignments), Some(&1));
        assert_eq!(counts.get(&Category::LectureNotes), None);
    }

    #[test]
    fn test_ranked_with_ties() {
        let badge = BadgeCount::from_records(&[
            record(1, Category::Miscellaneous),
            record(2, Category::LectureNotes),
            record(3, Category::Assignments),
            record(4, Category::Assignments),
        ]);

        assert_eq!(
            badge.ranked(),
            vec![
                (Category::Assignments, 2),
                (Category::LectureNotes, 1),
                (Category::Miscellaneous, 1),
            ]
        );
    }

    #[test]
    fn test_text_and_tooltip() {
        let badge = BadgeCount::from_records(&[record(1, Category::Research), record(2, Category::Research)]);

        assert_eq!(badge.text(), "2");
        assert_eq!(badge.tooltip(), "Research: 2");
    }

    #[test]
    fn test_empty_badge() {
        let badge = BadgeCount::from_records(&[]);

        assert_eq!(badge.total(), 0);
        assert_eq!(badge.text(), "");
        assert_eq!(badge.tooltip(), "No tabs tracked");
    }
}
