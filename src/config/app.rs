//! Application configuration (spacetraveling.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable consulted for the content API access token, so the
/// secret can stay out of the config file.
const ACCESS_TOKEN_ENV: &str = "SPACETRAVELING_ACCESS_TOKEN";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteSection,
    pub cms: CmsSection,
    pub listing: ListingSection,
    pub server: ServerSection,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Site identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub title: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Space Traveling".to_string(),
        }
    }
}

/// Content repository endpoint and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsSection {
    /// API root, e.g. `https://repo.cdn.prismic.io/api/v2`
    pub api_url: String,

    /// Optional access token; `SPACETRAVELING_ACCESS_TOKEN` overrides it
    pub access_token: Option<String>,
}

impl Default for CmsSection {
    fn default() -> Self {
        Self {
            api_url: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
        }
    }
}

/// Listing page behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSection {
    /// Posts per fetched page
    pub page_size: usize,

    /// Seconds between listing recomputations
    pub revalidate_secs: u64,
}

impl Default for ListingSection {
    fn default() -> Self {
        Self {
            page_size: 2,
            revalidate_secs: 1800,
        }
    }
}

/// Server bind address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: AppConfig = serde_yaml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_defaults() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.is_empty() {
                self.cms.access_token = Some(token);
            }
        }
    }
}
