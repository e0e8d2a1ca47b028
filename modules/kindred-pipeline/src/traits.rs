// Trait abstractions for the pipeline's collaborators.
//
// ContentFetcher — one URL in, one raw record out (Exa in production).
// TextEmbedder — canonical text in, fixed-length vector out (OpenAI).
// ProfileStore — the profile repository (in-memory implementation in
//   `store`; persistence is an opaque collaborator behind this trait).
// ProfileNotifier — status-change push channel for the API's stream.
//
// These enable deterministic testing with the mocks in `testing`:
// no network, no real sleeping.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use ai_client::{EmbedError, OpenAiEmbedder};
use exa_client::ExaClient;
use kindred_common::types::{Gender, Profile, ProcessingStatus, RawRecord};

// ---------------------------------------------------------------------------
// ContentFetcher
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the raw crawled record for a URL. `livecrawl` asks the
    /// provider for a fresh crawl instead of an index hit.
    async fn fetch(&self, url: &str, livecrawl: bool) -> Result<RawRecord>;
}

#[async_trait]
impl ContentFetcher for ExaClient {
    async fn fetch(&self, url: &str, livecrawl: bool) -> Result<RawRecord> {
        let result = self.contents(url, livecrawl).await?;
        Ok(RawRecord {
            url: result.url,
            title: result.title,
            author: result.author,
            text: result.text,
        })
    }
}

// ---------------------------------------------------------------------------
// TextEmbedder
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed one text. Errors keep the `EmbedError` type so the
    /// pipeline can recognize `ContextTooLarge` and truncate-retry.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbedError>;
}

#[async_trait]
impl TextEmbedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbedError> {
        OpenAiEmbedder::embed(self, text).await
    }
}

// ---------------------------------------------------------------------------
// ProfileStore
// ---------------------------------------------------------------------------

/// One pipeline run's terminal write. All derived fields land together
/// so a reader never observes a completed profile without its
/// embedding or canonical text.
#[derive(Debug, Clone, Default)]
pub struct DerivedUpdate {
    pub twitter_data: Option<RawRecord>,
    pub linkedin_data: Option<RawRecord>,
    pub website_data: Option<RawRecord>,
    pub other_links_data: Option<Vec<RawRecord>>,
    pub stringified_data: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub error_message: Option<String>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>>;

    async fn get_by_handle(&self, handle: &str) -> Result<Option<Profile>>;

    /// Full replace keyed by id; inserts when absent.
    async fn upsert(&self, profile: Profile) -> Result<Profile>;

    /// Status-only write (used for the pending→processing transition
    /// and for failure recording).
    async fn set_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        error_message: Option<String>,
    ) -> Result<()>;

    /// Atomic write of status + all derived fields.
    async fn update_derived(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        update: DerivedUpdate,
    ) -> Result<()>;

    /// Delete by natural key. Returns whether a profile existed.
    async fn delete_by_handle(&self, handle: &str) -> Result<bool>;

    /// All completed profiles of `gender` with a non-null embedding —
    /// the match candidate set.
    async fn completed_with_embedding(&self, gender: Gender) -> Result<Vec<Profile>>;
}

// ---------------------------------------------------------------------------
// ProfileNotifier
// ---------------------------------------------------------------------------

/// Receives a snapshot after every status write. Consumers must treat
/// repeated identical events as idempotent no-ops.
#[async_trait]
pub trait ProfileNotifier: Send + Sync {
    async fn notify(&self, profile: &Profile);
}

/// Default notifier for contexts with no observer (tests, CLIs).
pub struct NoopNotifier;

#[async_trait]
impl ProfileNotifier for NoopNotifier {
    async fn notify(&self, _profile: &Profile) {}
}
