pub mod error;

pub use error::{EmbedError, Result};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct OpenAiEmbedder {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| EmbedError::Network(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Create an embedding for a single text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);

        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: text.to_string(),
        };

        debug!(model = %self.model, chars = text.len(), "OpenAI embedding request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if is_context_length_error(status.as_u16(), &error_text) {
                return Err(EmbedError::ContextTooLarge);
            }
            return Err(EmbedError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let embed_response: EmbeddingResponse = response.json().await?;

        embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbedError::Empty)
    }
}

/// OpenAI reports oversized input as a 400 whose body names the context
/// length; there is no dedicated status code for it.
fn is_context_length_error(status: u16, body: &str) -> bool {
    status == 400
        && (body.contains("context_length_exceeded") || body.contains("maximum context length"))
}
