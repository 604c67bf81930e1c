//! spacetraveling: a server-rendered blog frontend for a headless CMS
//!
//! Content lives in a Prismic-compatible content repository; this crate
//! fetches it over HTTP, renders the listing and post pages with Tera
//! templates and serves them with axum. Known posts are pre-rendered at
//! startup; unknown identifiers are generated on first request.

pub mod cache;
pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main application
#[derive(Clone)]
pub struct App {
    /// Site configuration
    pub config: config::AppConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
}

impl App {
    /// Create a new App from a directory, reading `spacetraveling.yml`
    /// when present.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("spacetraveling.yml");

        let config = if config_path.exists() {
            config::AppConfig::load(&config_path)?
        } else {
            config::AppConfig::from_defaults()
        };

        Ok(Self { config, base_dir })
    }

    /// Start the HTTP server.
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        commands::serve::run(self, ip, port).await
    }

    /// List posts from the content API.
    pub async fn list(&self, all: bool) -> Result<()> {
        commands::list::run(self, all).await
    }
}
