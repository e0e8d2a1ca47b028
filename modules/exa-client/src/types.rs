use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ContentsRequest {
    pub urls: Vec<String>,
    pub text: bool,
    /// "always" forces a fresh crawl instead of serving from the index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livecrawl: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentsResponse {
    #[serde(default)]
    pub results: Vec<ContentResult>,
}

/// One crawled document. `text` carries the provider's flattened
/// rendering of the page, including its metadata conventions for
/// social profiles.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentResult {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}
