//! # App Gallery
//!
//! A searchable, filterable gallery over a curated directory of apps kept
//! in a remote document store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ RecordStore │──▶│ load_catalog │──▶│ GalleryView  │
//! │ Firestore/  │   │ decode+facets│   │ filter state │
//! │ file        │   └──────────────┘   └──────┬───────┘
//! └─────────────┘                             │
//!                        ┌────────────────────┤
//!                        ▼                    ▼
//!                  ┌──────────┐         ┌──────────┐
//!                  │   CLI    │         │   HTTP   │
//!                  │(gallery) │         │ (serve)  │
//!                  └──────────┘         └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export GALLERY_API_KEY=...            # never stored in the config file
//! gallery check                         # verify store access
//! gallery list --query chat --tag ai    # filter from the terminal
//! gallery serve                         # serve the gallery page
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`firestore`] | Firestore REST store |
//! | [`file_store`] | JSON snapshot store |
//! | [`store`] | Backend selection |
//! | [`render`] | HTML and text rendering |
//! | [`server`] | HTTP server |
//! | [`list`] | `list` and `facets` commands |
//! | [`check`] | `check` command |
//!
//! Record model, facets, filtering and the view state machine live in the
//! `gallery-core` crate.

pub mod check;
pub mod config;
pub mod file_store;
pub mod firestore;
pub mod list;
pub mod render;
pub mod server;
pub mod store;
