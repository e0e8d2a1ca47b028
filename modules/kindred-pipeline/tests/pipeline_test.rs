//! End-to-end pipeline scenarios against the trait-boundary mocks:
//! no network, no real sleeping.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use kindred_common::types::{Gender, ProcessingStatus, Profile, ProfileSubmission};
use kindred_common::KindredError;
use kindred_pipeline::testing::{raw_record, FixedEmbedder, MockFetcher, OversizeEmbedder};
use kindred_pipeline::{
    find_matches, MatchOutcome, MemoryStore, Pipeline, ProfileNotifier, ProfileStore, RetryPolicy,
    EMBED_MAX_CHARS,
};

const TWITTER_FIXTURE: &str = "Building analytical engines. | location: London \
| followers_count: 1200 | friends_count: 300 | statuses_count: 4500 \
| created_at: Mon Jan 01 2024 | favorite_count: 42 | retweet_count: 7 | count: 1 | lang: en \
Punched cards are the original source code ";

fn submission(
    gender: Gender,
    handle: Option<&str>,
    website: Option<&str>,
) -> ProfileSubmission {
    ProfileSubmission {
        gender,
        twitter_handle: handle.map(String::from),
        linkedin_url: None,
        personal_website: website.map(String::from),
        other_links: None,
    }
}

fn pipeline(fetcher: MockFetcher, embedder: impl kindred_pipeline::TextEmbedder + 'static) -> (Pipeline, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let pipeline = Pipeline::new(Arc::new(fetcher), Arc::new(embedder), store.clone())
        .with_retry_policy(RetryPolicy::immediate());
    (pipeline, store)
}

/// Notifier that records each observed status for ordering assertions.
struct RecordingNotifier {
    statuses: Mutex<Vec<ProcessingStatus>>,
}

#[async_trait]
impl ProfileNotifier for RecordingNotifier {
    async fn notify(&self, profile: &Profile) {
        self.statuses
            .lock()
            .expect("test lock")
            .push(profile.processing_status);
    }
}

async fn seed_completed(
    store: &MemoryStore,
    gender: Gender,
    handle: &str,
    embedding: Vec<f32>,
) -> Profile {
    let mut profile = Profile::new(&submission(gender, Some(handle), None));
    profile.processing_status = ProcessingStatus::Completed;
    profile.stringified_data = Some(format!("Profile Type: {gender}"));
    profile.embedding = Some(embedding);
    store.upsert(profile).await.unwrap()
}

// --- Match ranking scenarios ---

#[tokio::test]
async fn ranking_scenario_identical_and_orthogonal_candidates() {
    let store = MemoryStore::new();
    let query = seed_completed(&store, Gender::Female, "a", vec![1.0, 0.0]).await;
    let b = seed_completed(&store, Gender::Male, "b", vec![1.0, 0.0]).await;
    let c = seed_completed(&store, Gender::Male, "c", vec![0.0, 1.0]).await;

    let (returned_query, outcome) = find_matches(&store, query.id).await.unwrap();
    assert_eq!(returned_query.id, query.id);

    let MatchOutcome::Ranked { matches, top } = outcome else {
        panic!("expected ranked outcome");
    };
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].profile_id, b.id);
    assert!((matches[0].similarity - 1.0).abs() < 1e-6);
    assert_eq!(matches[1].profile_id, c.id);
    assert!(matches[1].similarity.abs() < 1e-6);
    assert_eq!(top.id, b.id);
}

#[tokio::test]
async fn candidates_never_share_the_query_category() {
    let store = MemoryStore::new();
    let query = seed_completed(&store, Gender::Female, "a", vec![1.0, 0.0]).await;
    seed_completed(&store, Gender::Female, "same1", vec![1.0, 0.0]).await;
    seed_completed(&store, Gender::Female, "same2", vec![1.0, 0.0]).await;
    let only_male = seed_completed(&store, Gender::Male, "m", vec![0.5, 0.5]).await;

    let (_, outcome) = find_matches(&store, query.id).await.unwrap();
    let MatchOutcome::Ranked { matches, .. } = outcome else {
        panic!("expected ranked outcome");
    };
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].profile_id, only_male.id);
}

#[tokio::test]
async fn empty_candidate_set_is_not_an_error() {
    let store = MemoryStore::new();
    let query = seed_completed(&store, Gender::Female, "a", vec![1.0, 0.0]).await;

    let (_, outcome) = find_matches(&store, query.id).await.unwrap();
    assert!(matches!(outcome, MatchOutcome::NoCandidates));
}

#[tokio::test]
async fn missing_embedding_is_not_eligible() {
    let store = MemoryStore::new();
    let profile = store
        .upsert(Profile::new(&submission(Gender::Female, Some("a"), None)))
        .await
        .unwrap();

    let result = find_matches(&store, profile.id).await;
    assert!(matches!(result, Err(KindredError::NotEligible(_))));
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let store = MemoryStore::new();
    let result = find_matches(&store, uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(KindredError::NotFound(_))));
}

// --- Pipeline scenarios ---

#[tokio::test]
async fn all_fetches_failing_ends_in_failed_with_null_embedding() {
    let fetcher = MockFetcher::new().failing("https://x.com/ada");
    let (pipeline, store) = pipeline(fetcher, FixedEmbedder::new(vec![1.0, 0.0]));

    let profile = pipeline
        .submit(&submission(Gender::Female, Some("ada"), None))
        .await
        .unwrap();
    pipeline.run(&profile).await;

    let finished = store.get(profile.id).await.unwrap().unwrap();
    assert_eq!(finished.processing_status, ProcessingStatus::Failed);
    assert!(finished.embedding.is_none());
    assert!(finished.stringified_data.is_none());
    let message = finished.error_message.expect("failure message recorded");
    assert!(message.contains("No social data could be fetched"));
}

#[tokio::test]
async fn partial_failure_completes_with_partial_error_note() {
    let fetcher = MockFetcher::new()
        .on("https://x.com/ada", raw_record("https://x.com/ada", TWITTER_FIXTURE))
        .failing("https://ada.dev");
    let (pipeline, store) = pipeline(fetcher, FixedEmbedder::new(vec![1.0, 0.0]));

    let profile = pipeline
        .submit(&submission(Gender::Female, Some("ada"), Some("https://ada.dev")))
        .await
        .unwrap();
    pipeline.run(&profile).await;

    let finished = store.get(profile.id).await.unwrap().unwrap();
    assert_eq!(finished.processing_status, ProcessingStatus::Completed);
    assert!(finished.embedding.is_some());

    let text = finished.stringified_data.expect("canonical text present");
    assert!(text.contains("Twitter Profile:"));
    assert!(!text.contains("Personal Website:"));

    let message = finished.error_message.expect("partial note recorded");
    assert!(message.contains("Partial success"));
    assert!(message.contains("Website data fetch failed"));
}

#[tokio::test]
async fn oversized_text_is_truncated_and_stored_truncated() {
    // A website body large enough to push the canonical text past the
    // embedding budget.
    let big_body = "a".repeat(50_000);
    let fetcher = MockFetcher::new().on(
        "https://ada.dev",
        raw_record("https://ada.dev", &big_body),
    );
    let embedder = OversizeEmbedder::new(vec![0.3, 0.4], EMBED_MAX_CHARS);
    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(embedder);
    let pipeline = Pipeline::new(Arc::new(fetcher), embedder.clone(), store.clone())
        .with_retry_policy(RetryPolicy::immediate());

    let profile = pipeline
        .submit(&submission(Gender::Female, None, Some("https://ada.dev")))
        .await
        .unwrap();
    pipeline.run(&profile).await;

    let finished = store.get(profile.id).await.unwrap().unwrap();
    assert_eq!(finished.processing_status, ProcessingStatus::Completed);
    assert_eq!(embedder.calls(), 2);

    let stored = finished.stringified_data.expect("canonical text present");
    assert_eq!(stored.chars().count(), EMBED_MAX_CHARS);
    // The stored text is exactly what was embedded, not the original.
    assert_eq!(embedder.last_input().as_deref(), Some(stored.as_str()));
}

#[tokio::test]
async fn completed_profile_satisfies_lifecycle_invariant() {
    let fetcher = MockFetcher::new().on(
        "https://x.com/ada",
        raw_record("https://x.com/ada", TWITTER_FIXTURE),
    );
    let (pipeline, store) = pipeline(fetcher, FixedEmbedder::new(vec![1.0, 0.0]));

    let profile = pipeline
        .submit(&submission(Gender::Female, Some("ada"), None))
        .await
        .unwrap();
    pipeline.run(&profile).await;

    let finished = store.get(profile.id).await.unwrap().unwrap();
    assert_eq!(finished.processing_status, ProcessingStatus::Completed);
    assert!(finished.embedding.is_some());
    assert!(finished.stringified_data.is_some());
    assert!(finished.error_message.is_none());
}

#[tokio::test]
async fn resubmission_resets_and_reruns() {
    let fetcher = MockFetcher::new().on(
        "https://x.com/ada",
        raw_record("https://x.com/ada", TWITTER_FIXTURE),
    );
    let (pipeline, store) = pipeline(fetcher, FixedEmbedder::new(vec![1.0, 0.0]));

    let first = pipeline
        .submit(&submission(Gender::Female, Some("ada"), None))
        .await
        .unwrap();
    pipeline.run(&first).await;

    // Same natural key: same id, derived state cleared.
    let second = pipeline
        .submit(&submission(Gender::Female, Some("ada"), None))
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.processing_status, ProcessingStatus::Pending);
    assert!(second.embedding.is_none());
    assert!(second.stringified_data.is_none());

    pipeline.run(&second).await;
    let finished = store.get(first.id).await.unwrap().unwrap();
    assert_eq!(finished.processing_status, ProcessingStatus::Completed);
}

#[tokio::test]
async fn notifier_observes_processing_then_terminal() {
    let fetcher = MockFetcher::new().on(
        "https://x.com/ada",
        raw_record("https://x.com/ada", TWITTER_FIXTURE),
    );
    let notifier = Arc::new(RecordingNotifier {
        statuses: Mutex::new(Vec::new()),
    });
    let store = Arc::new(MemoryStore::new());
    let pipeline = Pipeline::new(
        Arc::new(fetcher),
        Arc::new(FixedEmbedder::new(vec![1.0, 0.0])),
        store.clone(),
    )
    .with_retry_policy(RetryPolicy::immediate())
    .with_notifier(notifier.clone());

    let profile = pipeline
        .submit(&submission(Gender::Female, Some("ada"), None))
        .await
        .unwrap();
    pipeline.run(&profile).await;

    let statuses = notifier.statuses.lock().expect("test lock").clone();
    assert_eq!(
        statuses,
        vec![ProcessingStatus::Processing, ProcessingStatus::Completed]
    );
}

#[tokio::test]
async fn rejects_invalid_submission_before_any_work() {
    let (pipeline, store) = pipeline(MockFetcher::new(), FixedEmbedder::new(vec![1.0]));

    let result = pipeline
        .submit(&submission(Gender::Female, Some("not a handle!"), None))
        .await;
    assert!(matches!(result, Err(KindredError::Validation(_))));
    assert!(store.get_by_handle("not a handle!").await.unwrap().is_none());
}
