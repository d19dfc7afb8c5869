pub mod extract;

use crate::config::SourcesConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use tracing::instrument;

// Some quote pages refuse requests without a browser-looking user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[async_trait]
pub trait QuoteOperations {
    async fn fetch_dollar(&self) -> Result<String>;

    async fn fetch_bitcoin(&self) -> Result<String>;

    async fn fetch_ethereum(&self) -> Result<String>;
}

pub struct QuoteClient {
    client: reqwest::Client,
    sources: SourcesConfig,
}

impl QuoteClient {
    pub fn new(sources: SourcesConfig) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, sources })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Scrape(format!(
                "Unexpected status {} from {}",
                response.status(),
                url
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl QuoteOperations for QuoteClient {
    #[instrument(name = "Fetching dollar rate", skip_all)]
    async fn fetch_dollar(&self) -> Result<String> {
        let html = self.fetch_html(&self.sources.dollar_url).await?;
        extract::dollar_rate(&html)
    }

    #[instrument(name = "Fetching bitcoin quote", skip_all)]
    async fn fetch_bitcoin(&self) -> Result<String> {
        let html = self.fetch_html(&self.sources.bitcoin_url).await?;
        extract::bitcoin_quote(&html)
    }

    #[instrument(name = "Fetching ethereum quote", skip_all)]
    async fn fetch_ethereum(&self) -> Result<String> {
        let html = self.fetch_html(&self.sources.ethereum_url).await?;
        extract::ethereum_quote(&html)
    }
}
