//! Filter state and the visibility predicate.
//!
//! A record is visible iff its title contains the query (case-insensitive)
//! AND it passes the category selection AND it passes the tag selection.
//! An empty query and two `All` selections form the identity filter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::AppRecord;

/// Sentinel value meaning "no restriction" in dropdowns and query strings.
pub const ALL: &str = "all";

/// A dropdown selection: either no restriction or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse a user-supplied value. Only `"all"` means [`Selection::All`];
    /// the empty string selects records with a blank value.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Selection::parse).unwrap_or_default()
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn as_value(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::Only(v) => v,
        }
    }

    pub fn admits(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_value())
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Selection::parse(&value)
    }
}

impl From<Selection> for String {
    fn from(value: Selection) -> Self {
        value.as_value().to_string()
    }
}

/// The three user-controlled filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub category: Selection,
    #[serde(default)]
    pub tag: Selection,
}

impl Filter {
    pub fn new(query: impl Into<String>, category: Selection, tag: Selection) -> Self {
        Self {
            query: query.into(),
            category,
            tag,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.query.is_empty() && self.category.is_all() && self.tag.is_all()
    }

    pub fn matches(&self, record: &AppRecord) -> bool {
        self.admits(record, &self.query.to_lowercase())
    }

    fn admits(&self, record: &AppRecord, query_lower: &str) -> bool {
        (query_lower.is_empty() || record.title.to_lowercase().contains(query_lower))
            && self.category.admits(&record.category)
            && match &self.tag {
                Selection::All => true,
                Selection::Only(t) => record.tags.iter().any(|rt| rt == t),
            }
    }
}

/// Records passing `filter`, in their original order.
pub fn filter_records<'a>(records: &'a [AppRecord], filter: &Filter) -> Vec<&'a AppRecord> {
    if filter.is_identity() {
        return records.iter().collect();
    }
    let query_lower = filter.query.to_lowercase();
    records
        .iter()
        .filter(|r| filter.admits(r, &query_lower))
        .collect()
}
