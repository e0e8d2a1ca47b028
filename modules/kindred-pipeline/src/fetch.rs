//! Multi-source fetch orchestration: every declared source is fetched
//! concurrently with a bounded per-source retry loop, and the step
//! joins on all of them before the pipeline moves on. Individual
//! failures become labeled strings; only zero successes aborts the
//! profile build, and that decision belongs to the caller.

use std::time::Duration;

use futures::future::join_all;
use tracing::warn;

use kindred_common::types::{ProfileSubmission, RawRecord};

use crate::traits::ContentFetcher;

/// Retry budget for one source fetch. The delay is injectable so tests
/// run without real sleeping.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per source (first try + retries).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
    /// Fresh-crawl mode is requested only on this many leading
    /// attempts; later retries fall back to the provider's index to
    /// balance freshness against fetch cost.
    pub livecrawl_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            delay: Duration::from_secs(2),
            livecrawl_attempts: 2,
        }
    }
}

impl RetryPolicy {
    /// Zero-delay policy for deterministic tests.
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Outcome of one orchestrated fetch. `other_links` is index-aligned
/// with the declared links so the formatter can keep link numbering
/// stable across partial failures.
#[derive(Debug, Default)]
pub struct FetchedSources {
    pub twitter: Option<RawRecord>,
    pub linkedin: Option<RawRecord>,
    pub website: Option<RawRecord>,
    pub other_links: Vec<Option<RawRecord>>,
    /// One labeled description per failed source, in canonical source
    /// order.
    pub errors: Vec<String>,
}

impl FetchedSources {
    /// True when not a single source produced data — the only case
    /// that fails the whole pipeline.
    pub fn is_empty(&self) -> bool {
        self.twitter.is_none()
            && self.linkedin.is_none()
            && self.website.is_none()
            && self.other_links.iter().all(Option::is_none)
    }
}

/// Canonical profile URL for a Twitter/X handle.
pub fn twitter_profile_url(handle: &str) -> String {
    format!("https://x.com/{handle}")
}

/// Fetch one URL with the bounded retry loop: up to
/// `policy.max_attempts` tries, fixed delay in between, livecrawl on
/// the leading attempts only.
pub async fn fetch_with_retry(
    fetcher: &dyn ContentFetcher,
    url: &str,
    policy: &RetryPolicy,
) -> anyhow::Result<RawRecord> {
    let mut last_error = None;

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            tokio::time::sleep(policy.delay).await;
        }

        let livecrawl = attempt < policy.livecrawl_attempts;
        match fetcher.fetch(url, livecrawl).await {
            Ok(record) => return Ok(record),
            Err(e) => {
                warn!(url, attempt = attempt + 1, error = %e, "Source fetch attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.expect("at least one attempt"))
}

/// Fetch all declared sources concurrently and join on every outcome.
/// A slow or failing source never blocks the others from being
/// collected, but the barrier holds until each source has resolved or
/// exhausted its retries.
pub async fn fetch_all_sources(
    fetcher: &dyn ContentFetcher,
    submission: &ProfileSubmission,
    policy: &RetryPolicy,
) -> FetchedSources {
    let twitter_fut = async {
        match &submission.twitter_handle {
            Some(handle) => {
                Some(fetch_with_retry(fetcher, &twitter_profile_url(handle), policy).await)
            }
            None => None,
        }
    };

    let linkedin_fut = async {
        match &submission.linkedin_url {
            Some(url) => Some(fetch_with_retry(fetcher, url, policy).await),
            None => None,
        }
    };

    let website_fut = async {
        match &submission.personal_website {
            Some(url) => Some(fetch_with_retry(fetcher, url, policy).await),
            None => None,
        }
    };

    let other_fut = async {
        match &submission.other_links {
            Some(links) => {
                join_all(
                    links
                        .iter()
                        .map(|url| fetch_with_retry(fetcher, url, policy)),
                )
                .await
            }
            None => Vec::new(),
        }
    };

    let (twitter, linkedin, website, others) =
        tokio::join!(twitter_fut, linkedin_fut, website_fut, other_fut);

    let mut fetched = FetchedSources::default();

    match twitter {
        Some(Ok(record)) => fetched.twitter = Some(record),
        Some(Err(e)) => fetched.errors.push(format!("Twitter data fetch failed: {e}")),
        None => {}
    }

    match linkedin {
        Some(Ok(record)) => fetched.linkedin = Some(record),
        Some(Err(e)) => fetched
            .errors
            .push(format!("LinkedIn data fetch failed: {e}")),
        None => {}
    }

    match website {
        Some(Ok(record)) => fetched.website = Some(record),
        Some(Err(e)) => fetched
            .errors
            .push(format!("Website data fetch failed: {e}")),
        None => {}
    }

    let links = submission.other_links.as_deref().unwrap_or_default();
    for (url, outcome) in links.iter().zip(others) {
        match outcome {
            Ok(record) => fetched.other_links.push(Some(record)),
            Err(e) => {
                fetched
                    .errors
                    .push(format!("Other link fetch failed for {url}: {e}"));
                fetched.other_links.push(None);
            }
        }
    }

    fetched
}
