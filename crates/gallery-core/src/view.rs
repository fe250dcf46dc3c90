//! The gallery view: load phase, filter state, and the render model.
//!
//! # Phases
//!
//! ```text
//! Loading ──finish_load(Ok)──▶ Loaded(catalog)
//!    │
//!    └────finish_load(Err)──▶ Failed(error)
//! ```
//!
//! There is no way back to `Loading`: once the single fetch has resolved,
//! later completions are ignored. Filter operations work in every phase;
//! outside `Loaded` they operate over an empty record set.
//!
//! [`GalleryView::page`] produces a [`GalleryPage`], the serializable
//! render model every frontend (HTML, text, JSON) draws from.

use serde::Serialize;
use std::sync::Arc;

use crate::error::StoreUnavailable;
use crate::facets::Facets;
use crate::filter::{filter_records, Filter, Selection};
use crate::load::Catalog;
use crate::models::AppRecord;

/// Advisory shown when the loaded set has no record passing the filters.
pub const NO_MATCHES_MESSAGE: &str = "No apps found matching your criteria.";
/// Notice shown while the fetch is outstanding.
pub const LOADING_MESSAGE: &str = "Loading apps...";
/// Prefix of the notice shown when the fetch failed.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load apps";

/// Where the single fetch stands.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded(Arc<Catalog>),
    Failed(StoreUnavailable),
}

impl LoadState {
    pub fn from_result(result: Result<Catalog, StoreUnavailable>) -> Self {
        match result {
            Ok(catalog) => LoadState::Loaded(Arc::new(catalog)),
            Err(e) => LoadState::Failed(e),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            LoadState::Loading => Phase::Loading,
            LoadState::Loaded(_) => Phase::Loaded,
            LoadState::Failed(_) => Phase::Failed,
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            LoadState::Loaded(c) => Some(c.as_ref()),
            _ => None,
        }
    }
}

/// Tag of a [`LoadState`], for render models and health output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Loaded,
    Failed,
}

/// A message shown instead of (or in the absence of) cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Loading { message: String },
    LoadFailed { message: String },
    NoMatches { message: String },
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Loading { message }
            | Notice::LoadFailed { message }
            | Notice::NoMatches { message } => message,
        }
    }
}

/// One category button with its unfiltered count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickFilter {
    pub category: String,
    pub count: usize,
    /// Whether this category is the current selection.
    pub active: bool,
}

/// Everything a frontend needs to draw the gallery once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryPage {
    pub phase: Phase,
    pub filter: Filter,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub quick_filters: Vec<QuickFilter>,
    pub cards: Vec<AppRecord>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Per-viewer gallery state over a shared load state.
#[derive(Debug, Clone, Default)]
pub struct GalleryView {
    state: LoadState,
    filter: Filter,
}

impl GalleryView {
    /// A fresh view in the `Loading` phase with the identity filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// A view over an already resolved (or still pending) load.
    pub fn with_state(state: LoadState) -> Self {
        Self {
            state,
            filter: Filter::default(),
        }
    }

    /// Record the outcome of the fetch.
    ///
    /// Returns `false` and changes nothing if the view already left
    /// `Loading`.
    pub fn finish_load(&mut self, result: Result<Catalog, StoreUnavailable>) -> bool {
        if !matches!(self.state, LoadState::Loading) {
            return false;
        }
        self.state = LoadState::from_result(result);
        true
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.filter.query = text.into();
    }

    /// `"all"` clears the restriction.
    pub fn set_category(&mut self, value: &str) {
        self.filter.category = Selection::parse(value);
    }

    /// `"all"` clears the restriction.
    pub fn set_tag(&mut self, value: &str) {
        self.filter.tag = Selection::parse(value);
    }

    /// Category button click: selects `category`, leaves query and tag alone.
    pub fn select_quick_filter(&mut self, category: &str) {
        self.filter.category = Selection::Only(category.to_string());
    }

    /// Full record set; empty unless loaded.
    pub fn records(&self) -> &[AppRecord] {
        self.state
            .catalog()
            .map(|c| c.records.as_slice())
            .unwrap_or(&[])
    }

    pub fn facets(&self) -> Facets {
        self.state
            .catalog()
            .map(|c| c.facets.clone())
            .unwrap_or_default()
    }

    /// Records passing the current filter, in store order.
    pub fn visible(&self) -> Vec<&AppRecord> {
        filter_records(self.records(), &self.filter)
    }

    /// Build the render model for the current state.
    pub fn page(&self) -> GalleryPage {
        let facets = self.facets();
        let cards: Vec<AppRecord> = self.visible().into_iter().cloned().collect();

        let notice = match &self.state {
            LoadState::Loading => Some(Notice::Loading {
                message: LOADING_MESSAGE.to_string(),
            }),
            LoadState::Failed(e) => Some(Notice::LoadFailed {
                message: format!("{}: {}", LOAD_FAILED_MESSAGE, e),
            }),
            LoadState::Loaded(_) if cards.is_empty() => Some(Notice::NoMatches {
                message: NO_MATCHES_MESSAGE.to_string(),
            }),
            LoadState::Loaded(_) => None,
        };

        let quick_filters = facets
            .category_counts
            .iter()
            .map(|c| QuickFilter {
                category: c.category.clone(),
                count: c.count,
                active: self.filter.category.as_value() == c.category
                    && !self.filter.category.is_all(),
            })
            .collect();

        GalleryPage {
            phase: self.phase(),
            filter: self.filter.clone(),
            categories: facets.categories,
            tags: facets.tags,
            quick_filters,
            total: self.records().len(),
            cards,
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, title: &str, category: &str, tags: &[&str]) -> AppRecord {
        AppRecord {
            id: id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn loaded_view() -> GalleryView {
        let mut view = GalleryView::new();
        view.finish_load(Ok(Catalog::new(vec![
            rec("1", "Chat Bot", "Productivity", &["ai", "chat"]),
            rec("2", "Image Gen", "Creative", &["ai", "image"]),
        ])));
        view
    }

    fn visible_ids(view: &GalleryView) -> Vec<String> {
        view.visible().iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_scenario_query_category_tag() {
        let mut view = loaded_view();

        view.set_query("chat");
        assert_eq!(visible_ids(&view), vec!["1"]);

        view.set_query("");
        view.set_category("Creative");
        assert_eq!(visible_ids(&view), vec!["2"]);

        view.set_category("all");
        view.set_tag("ai");
        assert_eq!(visible_ids(&view), vec!["1", "2"]);
    }

    #[test]
    fn test_empty_collection_after_load() {
        let mut view = GalleryView::new();
        view.finish_load(Ok(Catalog::new(Vec::new())));
        let page = view.page();
        assert_eq!(page.phase, Phase::Loaded);
        assert!(page.categories.is_empty());
        assert!(page.tags.is_empty());
        assert!(page.quick_filters.is_empty());
        assert_eq!(
            page.notice,
            Some(Notice::NoMatches {
                message: NO_MATCHES_MESSAGE.to_string()
            })
        );
    }

    #[test]
    fn test_no_notice_when_cards_present() {
        let view = loaded_view();
        let page = view.page();
        assert_eq!(page.cards.len(), 2);
        assert!(page.notice.is_none());
    }

    #[test]
    fn test_quick_filter_counts_ignore_query_and_tag() {
        let mut view = loaded_view();
        view.set_query("zzz");
        view.set_tag("image");
        view.select_quick_filter("Productivity");
        let page = view.page();
        assert!(page.cards.is_empty());
        assert_eq!(
            page.quick_filters,
            vec![
                QuickFilter { category: "Productivity".into(), count: 1, active: true },
                QuickFilter { category: "Creative".into(), count: 1, active: false },
            ]
        );
        // Quick filter leaves query and tag untouched.
        assert_eq!(page.filter.query, "zzz");
        assert_eq!(page.filter.tag, Selection::parse("image"));
    }

    #[test]
    fn test_blank_category_quick_filter_agrees_with_dropdown() {
        let mut view = GalleryView::new();
        view.finish_load(Ok(Catalog::new(vec![
            rec("1", "Scratch Pad", "", &[""]),
            rec("2", "Linter", "Dev", &[]),
        ])));
        let page = view.page();
        assert_eq!(page.categories, vec!["", "Dev"]);
        assert_eq!(page.tags, vec![""]);
        assert_eq!(
            page.quick_filters[0],
            QuickFilter { category: String::new(), count: 1, active: false }
        );

        view.select_quick_filter("");
        assert_eq!(visible_ids(&view), vec!["1"]);
        assert!(view.page().quick_filters[0].active);

        view.set_category("Dev");
        view.set_category("");
        assert_eq!(visible_ids(&view), vec!["1"]);

        view.set_category("all");
        assert_eq!(visible_ids(&view), vec!["1", "2"]);
    }

    #[test]
    fn test_facets_ignore_filter_state() {
        let mut view = loaded_view();
        let before = view.page();
        view.set_category("Creative");
        view.set_query("image");
        let after = view.page();
        assert_eq!(before.categories, after.categories);
        assert_eq!(before.tags, after.tags);
        assert_eq!(after.tags, vec!["ai", "chat", "image"]);
    }

    #[test]
    fn test_loading_phase_filters_over_empty_set() {
        let mut view = GalleryView::new();
        view.set_query("chat");
        let page = view.page();
        assert_eq!(page.phase, Phase::Loading);
        assert!(page.cards.is_empty());
        assert_eq!(page.notice.as_ref().map(Notice::message), Some(LOADING_MESSAGE));
    }

    #[test]
    fn test_failed_phase_is_distinct_from_empty() {
        let mut view = GalleryView::new();
        view.finish_load(Err(StoreUnavailable::new("apps", "connection refused")));
        let page = view.page();
        assert_eq!(page.phase, Phase::Failed);
        match page.notice {
            Some(Notice::LoadFailed { message }) => {
                assert!(message.starts_with(LOAD_FAILED_MESSAGE));
                assert!(message.contains("connection refused"));
                assert_ne!(message, NO_MATCHES_MESSAGE);
            }
            other => panic!("expected LoadFailed notice, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_load_only_once() {
        let mut view = loaded_view();
        let accepted = view.finish_load(Err(StoreUnavailable::new("apps", "late failure")));
        assert!(!accepted);
        assert_eq!(view.phase(), Phase::Loaded);
        assert_eq!(view.records().len(), 2);
    }

    #[test]
    fn test_page_serializes_notice_kind() {
        let mut view = loaded_view();
        view.set_query("nothing matches");
        let json = serde_json::to_value(view.page()).unwrap();
        assert_eq!(json["phase"], "loaded");
        assert_eq!(json["notice"]["kind"], "no_matches");
        assert_eq!(json["filter"]["category"], "all");
        assert_eq!(json["total"], 2);
    }
}
