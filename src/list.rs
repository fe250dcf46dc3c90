//! `gallery list` and `gallery facets`.
//!
//! Both commands perform the single collection read, feed the outcome
//! into a [`GalleryView`], and print from its render model. A failed read
//! is an error exit carrying the "failed to load" message; an empty
//! collection or an empty filter result is not.

use anyhow::{bail, Result};
use gallery_core::load::load_catalog;
use gallery_core::view::{GalleryView, LoadState, LOAD_FAILED_MESSAGE};

use crate::config::Config;
use crate::render::render_text;
use crate::store::open_store;

/// Read the collection once and return a view in its resolved phase.
pub async fn load_view(config: &Config) -> Result<GalleryView> {
    let store = open_store(&config.store)?;
    let result = load_catalog(
        store.as_ref(),
        &config.store.collection,
        config.gallery.malformed,
    )
    .await;

    let mut view = GalleryView::new();
    view.finish_load(result);
    if let LoadState::Failed(e) = view.state() {
        bail!("{}: {}", LOAD_FAILED_MESSAGE, e);
    }
    Ok(view)
}

/// Print the apps passing the given filters.
pub async fn run_list(
    config: &Config,
    query: Option<String>,
    category: Option<String>,
    tag: Option<String>,
    json: bool,
) -> Result<()> {
    let mut view = load_view(config).await?;

    if let Some(q) = query {
        view.set_query(q);
    }
    if let Some(c) = category {
        view.set_category(&c);
    }
    if let Some(t) = tag {
        view.set_tag(&t);
    }

    let page = view.page();
    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", render_text(&page));
    }
    Ok(())
}

/// Print categories with their record counts, then the tag list.
pub async fn run_facets(config: &Config) -> Result<()> {
    let view = load_view(config).await?;
    let facets = view.facets();

    println!("{:<32} APPS", "CATEGORY");
    for c in &facets.category_counts {
        println!("{:<32} {}", c.category, c.count);
    }
    println!();
    println!("TAGS ({})", facets.tags.len());
    for tag in &facets.tags {
        println!("  {}", tag);
    }
    Ok(())
}
