// Core structs: MarketRecord, SummaryStats, Report
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the market table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub name: String,
    pub symbol: String,
    /// Price in USD.
    pub price: f64,
    /// Market capitalization in USD.
    pub market_cap: f64,
    /// Signed 24h change in percent (-1.25 means -1.25 %).
    pub change_24h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_count: usize,
    pub total_market_cap: f64,
    pub average_price: f64,
    pub average_change_24h: f64,
    pub highest_priced: Option<String>,
    pub top_gainer: Option<String>,
    pub top_loser: Option<String>,
    pub top_by_market_cap: Vec<MarketRecord>,
    pub generated_at: DateTime<Utc>,
}

/// The JSON export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: SummaryStats,
    pub records: Vec<MarketRecord>,
}

#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub url: String,
    pub limit: usize,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected HTTP status {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid selector: {0}")]
    SelectorError(String),
    #[error("page layout changed, missing element: {0}")]
    MissingElement(String),
    #[error("no market rows could be parsed")]
    NoRecords,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("refusing to overwrite {}", .0.display())]
    Collision(std::path::PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure that aborts a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("fetch failed: {0}")]
    Scraper(#[from] ScraperError),
    #[error("parse failed: {0}")]
    Parser(#[from] ParserError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
