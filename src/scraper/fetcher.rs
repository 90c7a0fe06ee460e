use crate::model::{ScrapeRequest, ScraperError};
use crate::scraper::traits::Scraper;

use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub struct ScraperImpl {
    pub client: Client,
}

impl ScraperImpl {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        Ok(Self { client })
    }
}

fn map_reqwest(e: reqwest::Error) -> ScraperError {
    if e.is_timeout() {
        ScraperError::Timeout
    } else {
        ScraperError::HttpError(e.to_string())
    }
}

#[async_trait::async_trait]
impl Scraper for ScraperImpl {
    async fn fetch(&self, req: &ScrapeRequest) -> Result<String, ScraperError> {
        info!("GET {}", req.url);
        let response = self.client.get(&req.url).send().await.map_err(map_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::InvalidResponse(status.as_u16()));
        }

        let body = response.text().await.map_err(map_reqwest)?;
        info!("Received {} bytes [{}]", body.len(), status);
        Ok(body)
    }
}
