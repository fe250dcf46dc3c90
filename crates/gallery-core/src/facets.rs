//! Facet derivation.
//!
//! Facets are the distinct categories and tags of the *full* record set,
//! in order of first appearance, plus per-category record counts for the
//! quick-filter row. They never depend on the current filter state, so a
//! [`Facets`] value is computed once per loaded record set and reused.
//!
//! Values are compared exactly. A blank category is a facet like any
//! other, so records without a category get their own quick filter.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::AppRecord;

/// Number of records in the full set carrying one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Distinct-value sets derived from a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// Same order as `categories`.
    pub category_counts: Vec<CategoryCount>,
}

impl Facets {
    pub fn derive(records: &[AppRecord]) -> Self {
        let categories = distinct(records.iter().map(|r| r.category.as_str()));
        let tags = distinct(records.iter().flat_map(|r| r.tags.iter().map(String::as_str)));

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for r in records {
            *counts.entry(r.category.as_str()).or_default() += 1;
        }
        let category_counts = categories
            .iter()
            .map(|c| CategoryCount {
                category: c.clone(),
                count: counts.get(c.as_str()).copied().unwrap_or(0),
            })
            .collect();

        Self {
            categories,
            tags,
            category_counts,
        }
    }

    /// Count of records in the full set whose category is `category`.
    pub fn count_for(&self, category: &str) -> usize {
        self.category_counts
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Distinct values, first appearance wins.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, category: &str, tags: &[&str]) -> AppRecord {
        AppRecord {
            id: id.to_string(),
            title: format!("App {}", id),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_appearance_order_no_duplicates() {
        let records = vec![
            rec("1", "Productivity", &["ai", "chat"]),
            rec("2", "Creative", &["ai", "image"]),
            rec("3", "Productivity", &["chat", "notes"]),
        ];
        let f = Facets::derive(&records);
        assert_eq!(f.categories, vec!["Productivity", "Creative"]);
        assert_eq!(f.tags, vec!["ai", "chat", "image", "notes"]);
    }

    #[test]
    fn test_counts_follow_category_order() {
        let records = vec![
            rec("1", "Productivity", &[]),
            rec("2", "Creative", &[]),
            rec("3", "Productivity", &[]),
        ];
        let f = Facets::derive(&records);
        assert_eq!(
            f.category_counts,
            vec![
                CategoryCount { category: "Productivity".into(), count: 2 },
                CategoryCount { category: "Creative".into(), count: 1 },
            ]
        );
        assert_eq!(f.count_for("Creative"), 1);
        assert_eq!(f.count_for("Unknown"), 0);
    }

    #[test]
    fn test_duplicate_tags_within_record() {
        let f = Facets::derive(&[rec("1", "Dev", &["rust", "rust", "cli"])]);
        assert_eq!(f.tags, vec!["rust", "cli"]);
    }

    #[test]
    fn test_blank_values_are_facets() {
        let records = vec![
            rec("1", "", &["", "ai"]),
            rec("2", "Dev", &["  "]),
            rec("3", "", &[]),
        ];
        let f = Facets::derive(&records);
        assert_eq!(f.categories, vec!["", "Dev"]);
        assert_eq!(f.tags, vec!["", "ai", "  "]);
        assert_eq!(f.count_for(""), 2);
        assert_eq!(f.count_for("Dev"), 1);
    }

    #[test]
    fn test_empty_set() {
        let f = Facets::derive(&[]);
        assert!(f.categories.is_empty());
        assert!(f.tags.is_empty());
        assert!(f.category_counts.is_empty());
    }
}
