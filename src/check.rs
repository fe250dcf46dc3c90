//! `gallery check`: verify configuration and store connectivity.
//!
//! Reports the backend, the collection, how many records decoded, and
//! every malformed document, so data problems can be found without
//! opening the gallery.

use anyhow::Result;
use gallery_core::load::{load_catalog, MalformedPolicy};

use crate::config::Config;
use crate::store::open_store;

pub async fn run_check(config: &Config) -> Result<()> {
    let store = open_store(&config.store)?;

    println!("{:<12} {}", "BACKEND", store.describe());
    println!("{:<12} {}", "COLLECTION", config.store.collection);

    let catalog = match load_catalog(
        store.as_ref(),
        &config.store.collection,
        config.gallery.malformed,
    )
    .await
    {
        Ok(c) => c,
        Err(e) => {
            println!("{:<12} UNAVAILABLE", "STATUS");
            anyhow::bail!(e);
        }
    };

    println!("{:<12} OK", "STATUS");
    println!("{:<12} {}", "RECORDS", catalog.len());
    println!("{:<12} {}", "CATEGORIES", catalog.facets.categories.len());
    println!("{:<12} {}", "TAGS", catalog.facets.tags.len());
    println!("{:<12} {}", "MALFORMED", catalog.malformed.len());

    let action = match config.gallery.malformed {
        MalformedPolicy::Accept => "kept",
        MalformedPolicy::Skip => "skipped",
    };
    for m in &catalog.malformed {
        println!("  {} ({}): {}", m.id, action, m.problems.join("; "));
    }

    Ok(())
}
