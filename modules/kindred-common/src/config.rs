use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Content fetching
    pub exa_api_key: String,

    // Embeddings
    pub openai_api_key: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    /// Wall-clock budget for one full profile pipeline run. Expiry
    /// forces the profile to `failed` rather than leaving it stuck in
    /// `processing` forever.
    pub pipeline_deadline: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            exa_api_key: required_env("EXA_API_KEY"),
            openai_api_key: required_env("OPENAI_API_KEY"),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            pipeline_deadline: Duration::from_secs(
                env::var("PIPELINE_DEADLINE_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()
                    .expect("PIPELINE_DEADLINE_SECS must be a number"),
            ),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
