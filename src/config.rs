use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_URL: &str = "https://coinmarketcap.com/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0 Safari/537.36";

/// Cell indices of the market table, counted from zero.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnLayout {
    pub name: usize,
    pub price: usize,
    pub change_24h: usize,
    pub market_cap: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: 2,
            price: 3,
            change_24h: 5,
            market_cap: 7,
        }
    }
}

impl ColumnLayout {
    /// Minimum number of cells a row needs to be usable.
    pub fn min_cells(&self) -> usize {
        [self.name, self.price, self.change_24h, self.market_cap]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub url: String,
    pub user_agent: String,
    pub limit: usize,
    pub output_dir: PathBuf,
    pub timeout_seconds: u64,
    pub columns: ColumnLayout,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limit: 20,
            output_dir: PathBuf::from("output"),
            timeout_seconds: 30,
            columns: ColumnLayout::default(),
        }
    }
}

impl AppConfig {
    /// Replaces the URL when the environment provides one.
    pub fn with_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.url = url;
        }
        self
    }
}

/// Loads the config file; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
