//! # Gallery Core
//!
//! Shared logic for App Gallery: the record model, facet derivation,
//! filtering, the gallery view state machine, and the store abstraction.
//!
//! This crate contains no tokio, HTTP client, or filesystem I/O. Frontends
//! (CLI, HTTP server) supply a [`store::RecordStore`] implementation and
//! drive a [`view::GalleryView`].

pub mod error;
pub mod facets;
pub mod filter;
pub mod load;
pub mod models;
pub mod store;
pub mod view;
