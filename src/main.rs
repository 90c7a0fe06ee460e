mod analyzer;
mod config;
mod exporter;
mod model;
mod normalizer;
mod parser;
mod pipeline;
mod scraper;
mod utils;

use analyzer::AnalyzerImpl;
use clap::Parser as _;
use crate::scraper::ScraperImpl;
use config::{load_config, AppConfig};
use exporter::Exporter;
use model::{AppError, ScrapeRequest};
use parser::CoinTableParser;
use pipeline::{render_summary, Pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

pub const URL_ENV: &str = "COIN_SNAPSHOT_URL";

/// Snapshot the cryptocurrency market into CSV, JSON and PDF reports.
#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file; defaults are used when it does not exist.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Market page to scrape.
    #[arg(long)]
    url: Option<String>,

    /// Maximum number of table rows to read (0 reads all).
    #[arg(long)]
    limit: Option<usize>,

    /// Directory for the exported files.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Cli {
    /// Flags win over the environment, which wins over the file.
    fn apply(self, config: AppConfig, env_url: Option<String>) -> AppConfig {
        let mut config = config.with_url_override(env_url);
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = cli.config.clone();
    let config = cli.apply(load_config(&config_path)?, std::env::var(URL_ENV).ok());

    let scraper = ScraperImpl::new(
        &config.user_agent,
        Duration::from_secs(config.timeout_seconds),
    )?;
    let parser = CoinTableParser::new(config.columns.clone())?;
    let analyzer = AnalyzerImpl::new();

    let pipeline = Pipeline {
        scraper: &scraper,
        parser: &parser,
        analyzer: &analyzer,
        exporter: Exporter::new(&config.output_dir),
        debug_html_dir: Some(PathBuf::from("logs/html")),
    };

    let request = ScrapeRequest {
        url: config.url.clone(),
        limit: config.limit,
    };
    let outcome = pipeline.run(&request).await?;

    println!("{}", render_summary(&outcome.stats));
    info!(
        "Wrote {} records to {}, {} and {}",
        outcome.records.len(),
        outcome.paths.csv.display(),
        outcome.paths.json.display(),
        outcome.paths.pdf.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    fn file_config() -> AppConfig {
        AppConfig {
            url: "http://from-file/".into(),
            limit: 7,
            output_dir: PathBuf::from("file-out"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn flags_win_over_env_and_file() {
        let cli = Cli::try_parse_from([
            "coin-snapshot",
            "--url",
            "http://from-flag/",
            "--limit",
            "3",
            "--output-dir",
            "flag-out",
        ])
        .unwrap();
        let config = cli.apply(file_config(), Some("http://from-env/".into()));

        assert_eq!(config.url, "http://from-flag/");
        assert_eq!(config.limit, 3);
        assert_eq!(config.output_dir, PathBuf::from("flag-out"));
    }

    #[test]
    fn env_wins_over_file_without_flags() {
        let cli = Cli::try_parse_from(["coin-snapshot"]).unwrap();
        let config = cli.apply(file_config(), Some("http://from-env/".into()));

        assert_eq!(config.url, "http://from-env/");
        assert_eq!(config.limit, 7);
        assert_eq!(config.output_dir, PathBuf::from("file-out"));
    }

    #[test]
    fn file_values_stand_alone() {
        let cli = Cli::try_parse_from(["coin-snapshot", "--config", "other.json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("other.json"));
        let config = cli.apply(file_config(), None);

        assert_eq!(config.url, "http://from-file/");
        assert_eq!(config.limit, 7);
    }
}
