pub mod error;
mod types;

pub use error::{ExaError, Result};
pub use types::ContentResult;

use std::time::Duration;

use tracing::debug;

use types::{ContentsRequest, ContentsResponse};

const EXA_API_URL: &str = "https://api.exa.ai";

pub struct ExaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExaClient {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: EXA_API_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch the crawled text content for a single URL via the Exa
    /// /contents endpoint. `livecrawl` requests a fresh crawl instead
    /// of whatever is in the provider's index.
    pub async fn contents(&self, url: &str, livecrawl: bool) -> Result<ContentResult> {
        let endpoint = format!("{}/contents", self.base_url);

        let request = ContentsRequest {
            urls: vec![url.to_string()],
            text: true,
            livecrawl: livecrawl.then(|| "always".to_string()),
        };

        debug!(url, livecrawl, "Exa contents request");

        let resp = self
            .client
            .post(&endpoint)
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ExaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ContentsResponse = resp.json().await?;
        body.results
            .into_iter()
            .next()
            .ok_or_else(|| ExaError::Empty(url.to_string()))
    }
}
