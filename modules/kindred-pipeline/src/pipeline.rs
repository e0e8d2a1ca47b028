//! The full profile build: fetch → normalize → format → embed →
//! persist, with the lifecycle transitions and the single terminal
//! derived-field write. Collaborators are constructor-injected so
//! tests run against mocks with zero-delay retries.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use uuid::Uuid;

use kindred_common::types::{Profile, ProfileSubmission, ProcessingStatus};
use kindred_common::validation::validate_submission;
use kindred_common::KindredError;

use crate::embed::embed_canonical_text;
use crate::fetch::{fetch_all_sources, FetchedSources, RetryPolicy};
use crate::format::{format_profile_text, FormatInput};
use crate::normalize::{clean_linkedin, clean_twitter, clean_website};
use crate::traits::{
    ContentFetcher, DerivedUpdate, NoopNotifier, ProfileNotifier, ProfileStore, TextEmbedder,
};

const NO_DATA_MESSAGE: &str = "No social data could be fetched. All attempts failed.";

const DEFAULT_DEADLINE: Duration = Duration::from_secs(120);

pub struct Pipeline {
    fetcher: Arc<dyn ContentFetcher>,
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn ProfileStore>,
    notifier: Arc<dyn ProfileNotifier>,
    retry: RetryPolicy,
    deadline: Duration,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            fetcher,
            embedder,
            store,
            notifier: Arc::new(NoopNotifier),
            retry: RetryPolicy::default(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ProfileNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Validate a submission and create or reset the profile record.
    /// Returns the pending snapshot; the caller decides when to spawn
    /// `run` for it (the API does so fire-and-forget).
    pub async fn submit(&self, submission: &ProfileSubmission) -> Result<Profile, KindredError> {
        validate_submission(submission)?;

        let existing = match &submission.twitter_handle {
            Some(handle) => self
                .store
                .get_by_handle(handle)
                .await
                .map_err(|e| KindredError::Store(e.to_string()))?,
            None => None,
        };

        let profile = match existing {
            Some(mut profile) => {
                info!(profile_id = %profile.id, "Resubmission, resetting derived state");
                profile.reset(submission);
                profile
            }
            None => Profile::new(submission),
        };

        self.store
            .upsert(profile)
            .await
            .map_err(|e| KindredError::Store(e.to_string()))
    }

    /// Execute one full pipeline run for a previously submitted
    /// profile. Never returns an error: every failure path lands in
    /// the profile record as terminal `failed` with a message.
    pub async fn run(&self, profile: &Profile) {
        if !profile
            .processing_status
            .can_transition_to(ProcessingStatus::Processing)
        {
            warn!(
                profile_id = %profile.id,
                status = %profile.processing_status,
                "Refusing pipeline run from non-pending status"
            );
            return;
        }

        if let Err(e) = self
            .store
            .set_status(profile.id, ProcessingStatus::Processing, None)
            .await
        {
            error!(profile_id = %profile.id, error = %e, "Failed to mark profile processing");
            return;
        }
        self.notify(profile.id).await;

        let outcome = match tokio::time::timeout(self.deadline, self.process(profile)).await {
            Ok(result) => result,
            Err(_) => Err(KindredError::Pipeline(format!(
                "deadline of {}s exceeded",
                self.deadline.as_secs()
            ))),
        };

        let failure = outcome.err().map(|e| e.to_string());

        if let Some(message) = failure {
            error!(profile_id = %profile.id, error = %message, "Profile pipeline failed");
            if let Err(e) = self
                .store
                .update_derived(
                    profile.id,
                    ProcessingStatus::Failed,
                    DerivedUpdate {
                        error_message: Some(message),
                        ..Default::default()
                    },
                )
                .await
            {
                error!(profile_id = %profile.id, error = %e, "Failed to record pipeline failure");
            }
            self.notify(profile.id).await;
        }
    }

    async fn process(&self, profile: &Profile) -> Result<(), KindredError> {
        let submission = declared_sources(profile);
        let fetched = fetch_all_sources(self.fetcher.as_ref(), &submission, &self.retry).await;

        if fetched.is_empty() {
            info!(profile_id = %profile.id, errors = fetched.errors.len(), "No sources fetched");
            self.store
                .update_derived(
                    profile.id,
                    ProcessingStatus::Failed,
                    DerivedUpdate {
                        error_message: Some(NO_DATA_MESSAGE.to_string()),
                        ..Default::default()
                    },
                )
                .await
                .map_err(|e| KindredError::Store(e.to_string()))?;
            self.notify(profile.id).await;
            return Ok(());
        }

        let text = canonical_text(profile, &fetched);
        let embedded = embed_canonical_text(self.embedder.as_ref(), &text).await?;

        let error_message = if fetched.errors.is_empty() {
            None
        } else {
            Some(format!(
                "Partial success. Some data fetches failed: {}",
                fetched.errors.join("; ")
            ))
        };

        let successful_links: Vec<_> = fetched.other_links.iter().flatten().cloned().collect();

        self.store
            .update_derived(
                profile.id,
                ProcessingStatus::Completed,
                DerivedUpdate {
                    twitter_data: fetched.twitter,
                    linkedin_data: fetched.linkedin,
                    website_data: fetched.website,
                    other_links_data: (!successful_links.is_empty()).then_some(successful_links),
                    stringified_data: Some(embedded.text),
                    embedding: Some(embedded.embedding),
                    error_message,
                },
            )
            .await
            .map_err(|e| KindredError::Store(e.to_string()))?;

        info!(profile_id = %profile.id, "Profile pipeline completed");
        self.notify(profile.id).await;
        Ok(())
    }

    async fn notify(&self, profile_id: Uuid) {
        match self.store.get(profile_id).await {
            Ok(Some(snapshot)) => self.notifier.notify(&snapshot).await,
            Ok(None) => {}
            Err(e) => warn!(profile_id = %profile_id, error = %e, "Snapshot read for notify failed"),
        }
    }
}

/// A profile's declared sources, as a submission-shaped value the
/// orchestrator can fetch from.
fn declared_sources(profile: &Profile) -> ProfileSubmission {
    ProfileSubmission {
        gender: profile.gender,
        twitter_handle: profile.twitter_handle.clone(),
        linkedin_url: profile.linkedin_url.clone(),
        personal_website: profile.personal_website.clone(),
        other_links: profile.other_links.clone(),
    }
}

/// Normalize every fetched record and format the canonical text in
/// fixed section order.
fn canonical_text(profile: &Profile, fetched: &FetchedSources) -> String {
    let twitter = fetched.twitter.as_ref().map(clean_twitter);
    let linkedin = fetched.linkedin.as_ref().map(clean_linkedin);
    let website = fetched.website.as_ref().map(clean_website);
    let other_links_data: Vec<_> = fetched
        .other_links
        .iter()
        .map(|link| link.as_ref().map(clean_website))
        .collect();

    let empty_links: Vec<String> = Vec::new();
    let input = FormatInput {
        gender: Some(profile.gender),
        twitter_handle: profile.twitter_handle.as_deref(),
        linkedin_url: profile.linkedin_url.as_deref(),
        personal_website: profile.personal_website.as_deref(),
        other_links: profile.other_links.as_deref().unwrap_or(&empty_links),
        twitter: twitter.as_ref(),
        linkedin: linkedin.as_ref(),
        website: website.as_ref(),
        other_links_data: &other_links_data,
    };

    format_profile_text(&input)
}
