use crate::analyzer::Analyzer;
use crate::exporter::{ExportPaths, Exporter};
use crate::model::{AppError, MarketRecord, ScrapeRequest, SummaryStats};
use crate::parser::Parser;
use crate::scraper::Scraper;
use crate::utils::{file_stamp, format_change, format_compact_usd, format_thousands};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct RunOutcome {
    pub records: Vec<MarketRecord>,
    pub stats: SummaryStats,
    pub paths: ExportPaths,
}

/// Fetch, parse, analyze and export, strictly in that order.
pub struct Pipeline<'a> {
    pub scraper: &'a dyn Scraper,
    pub parser: &'a dyn Parser,
    pub analyzer: &'a dyn Analyzer,
    pub exporter: Exporter,
    /// Where to dump the fetched page when parsing fails.
    pub debug_html_dir: Option<PathBuf>,
}

impl Pipeline<'_> {
    pub async fn run(&self, request: &ScrapeRequest) -> Result<RunOutcome, AppError> {
        info!("Fetching live cryptocurrency market data...");
        let html = self.scraper.fetch(request).await?;

        info!("Parsing HTML...");
        let records = match self.parser.parse(&html, request.limit) {
            Ok(records) => records,
            Err(e) => {
                if let Some(dir) = &self.debug_html_dir {
                    log_and_save_html(dir, &html);
                }
                return Err(e.into());
            }
        };

        info!("Analyzing data for {} cryptocurrencies...", records.len());
        let stats = self.analyzer.summarize(&records);

        let paths = self.exporter.export(&records, &stats)?;
        Ok(RunOutcome {
            records,
            stats,
            paths,
        })
    }
}

/// Saves the page that failed to parse, for inspecting layout changes.
fn log_and_save_html(folder: &Path, html: &str) {
    if let Err(e) = fs::create_dir_all(folder) {
        warn!("Failed to create debug folder: {}", e);
        return;
    }
    let filename = folder.join(format!("debug-{}.html", file_stamp(&Utc::now())));
    if let Err(e) = fs::write(&filename, html) {
        warn!("Failed to write debug HTML: {}", e);
    } else {
        info!("Saved debug HTML: {}", filename.display());
    }
}

/// Console summary printed after a successful run.
pub fn render_summary(stats: &SummaryStats) -> String {
    let mut out = String::from("Summary:\n");
    out.push_str(&format!("Total Cryptocurrencies: {}\n", stats.total_count));
    out.push_str(&format!(
        "Total Market Cap: {}\n",
        format_compact_usd(stats.total_market_cap)
    ));
    out.push_str(&format!(
        "Average Price (USD): ${}\n",
        format_thousands(stats.average_price, 2)
    ));
    out.push_str(&format!(
        "Average 24h Change: {}\n",
        format_change(stats.average_change_24h)
    ));
    if let Some(name) = &stats.highest_priced {
        out.push_str(&format!("Highest Priced Coin: {}\n", name));
    }
    out.push_str("Top 5 by Market Cap:\n");
    for (i, r) in stats.top_by_market_cap.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} ({}) - {}\n",
            i + 1,
            r.name,
            r.symbol,
            format_compact_usd(r.market_cap)
        ));
    }
    out.push_str(&format!(
        "Timestamp: {}\n",
        stats.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out
}
