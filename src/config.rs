//! TOML configuration.
//!
//! Connection parameters for the document store come from the config file;
//! secrets never do. The API key is read from the environment variable
//! named by `store.api_key_env`, and `GALLERY_PROJECT_ID` overrides
//! `store.project_id` so one file can serve several environments.
//!
//! ```toml
//! [store]
//! backend = "firestore"
//! project_id = "my-project"
//! collection = "apps"
//!
//! [gallery]
//! title = "App Gallery"
//! malformed = "accept"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! ```

use anyhow::{Context, Result};
use gallery_core::load::MalformedPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding `store.project_id`.
pub const PROJECT_ID_ENV: &str = "GALLERY_PROJECT_ID";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Snapshot file for the `file` backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_backend() -> String {
    "firestore".to_string()
}
fn default_database() -> String {
    "(default)".to_string()
}
fn default_collection() -> String {
    "apps".to_string()
}
fn default_endpoint() -> String {
    "https://firestore.googleapis.com".to_string()
}
fn default_api_key_env() -> String {
    "GALLERY_API_KEY".to_string()
}
fn default_page_size() -> u32 {
    300
}
fn default_timeout_secs() -> u64 {
    15
}

impl StoreConfig {
    /// The API key from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GalleryConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default)]
    pub malformed: MalformedPolicy,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            tagline: default_tagline(),
            malformed: MalformedPolicy::default(),
        }
    }
}

fn default_title() -> String {
    "App Gallery".to_string()
}
fn default_tagline() -> String {
    "A curated directory of apps, searchable by name, category, and tag.".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Read, override from the environment, and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config file")
}

/// Apply environment overrides through `lookup` (normally `std::env::var`).
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(project) = lookup(PROJECT_ID_ENV).filter(|p| !p.trim().is_empty()) {
        config.store.project_id = Some(project);
    }
}

pub fn validate(config: &Config) -> Result<()> {
    let store = &config.store;

    if store.collection.trim().is_empty() {
        anyhow::bail!("store.collection must not be empty");
    }
    if store.page_size == 0 {
        anyhow::bail!("store.page_size must be > 0");
    }
    if store.timeout_secs == 0 {
        anyhow::bail!("store.timeout_secs must be > 0");
    }

    match store.backend.as_str() {
        "firestore" => {
            let missing = store
                .project_id
                .as_deref()
                .map(|p| p.trim().is_empty())
                .unwrap_or(true);
            if missing {
                anyhow::bail!(
                    "store.project_id must be set (or {} exported) when backend is 'firestore'",
                    PROJECT_ID_ENV
                );
            }
        }
        "file" => {
            if store.path.is_none() {
                anyhow::bail!("store.path must be set when backend is 'file'");
            }
        }
        other => anyhow::bail!(
            "Unknown store backend: '{}'. Must be firestore or file.",
            other
        ),
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[store]
project_id = "demo-project"
"#;

    #[test]
    fn test_defaults() {
        let config = parse_config(MINIMAL).unwrap();
        assert_eq!(config.store.backend, "firestore");
        assert_eq!(config.store.database, "(default)");
        assert_eq!(config.store.collection, "apps");
        assert_eq!(config.store.endpoint, "https://firestore.googleapis.com");
        assert_eq!(config.store.api_key_env, "GALLERY_API_KEY");
        assert_eq!(config.store.page_size, 300);
        assert_eq!(config.gallery.malformed, MalformedPolicy::Accept);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_env_override_project() {
        let mut config = parse_config(MINIMAL).unwrap();
        apply_env_overrides(&mut config, |key| {
            (key == PROJECT_ID_ENV).then(|| "prod-project".to_string())
        });
        assert_eq!(config.store.project_id.as_deref(), Some("prod-project"));
    }

    #[test]
    fn test_env_override_fills_missing_project() {
        let mut config = parse_config("[store]\n").unwrap();
        assert!(validate(&config).is_err());
        apply_env_overrides(&mut config, |_| Some("from-env".to_string()));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let config = parse_config("[store]\nbackend = \"mongo\"\n").unwrap();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("Unknown store backend"), "got: {}", err);
    }

    #[test]
    fn test_file_backend_requires_path() {
        let config = parse_config("[store]\nbackend = \"file\"\n").unwrap();
        assert!(validate(&config).unwrap_err().to_string().contains("store.path"));

        let config =
            parse_config("[store]\nbackend = \"file\"\npath = \"apps.json\"\n").unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = parse_config("[store]\nproject_id = \"p\"\npage_size = 0\n").unwrap();
        assert!(validate(&config).unwrap_err().to_string().contains("page_size"));
    }

    #[test]
    fn test_malformed_policy_parsed() {
        let config =
            parse_config("[store]\nproject_id = \"p\"\n\n[gallery]\nmalformed = \"skip\"\n")
                .unwrap();
        assert_eq!(config.gallery.malformed, MalformedPolicy::Skip);
        assert_eq!(config.gallery.title, "App Gallery");
    }
}
