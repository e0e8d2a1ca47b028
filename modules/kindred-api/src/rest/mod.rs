use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use kindred_common::types::{Profile, ProfileSubmission};
use kindred_common::KindredError;
use kindred_pipeline::{find_matches, MatchOutcome};

use crate::AppState;

/// Map the error taxonomy onto the HTTP surface: validation and
/// eligibility problems are the caller's fault, missing records are
/// 404, everything else is a 500.
fn error_response(err: &KindredError) -> Response {
    let status = match err {
        KindredError::Validation(_) | KindredError::NotEligible(_) => StatusCode::BAD_REQUEST,
        KindredError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

// --- POST /api/profile ---

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ProfileSubmission>,
) -> Response {
    let profile = match state.pipeline.submit(&submission).await {
        Ok(profile) => profile,
        Err(e) => return error_response(&e),
    };

    // Open the status channel before the run so subscribers can't miss
    // it, then kick off the pipeline fire-and-forget: the response
    // returns immediately and the client observes progress via the
    // updates stream.
    state.events.register(&profile).await;
    let pipeline = state.pipeline.clone();
    let snapshot = profile.clone();
    tokio::spawn(async move {
        pipeline.run(&snapshot).await;
    });

    info!(profile_id = %profile.id, "Profile submission accepted");
    Json(profile).into_response()
}

// --- GET /api/profile ---

#[derive(Deserialize)]
pub struct GetProfileParams {
    id: Option<Uuid>,
    twitter_handle: Option<String>,
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GetProfileParams>,
) -> Response {
    let lookup = match (params.id, params.twitter_handle) {
        (Some(id), _) => state.store.get(id).await,
        (None, Some(handle)) => state.store.get_by_handle(&handle).await,
        (None, None) => {
            return error_response(&KindredError::Validation("ID or handle required".into()))
        }
    };

    match lookup {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => error_response(&KindredError::NotFound("Profile not found".into())),
        Err(e) => error_response(&KindredError::Store(e.to_string())),
    }
}

// --- DELETE /api/profile ---

#[derive(Deserialize)]
pub struct DeleteProfileParams {
    twitter_handle: Option<String>,
}

pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteProfileParams>,
) -> Response {
    let Some(handle) = params.twitter_handle else {
        return error_response(&KindredError::Validation("Handle required".into()));
    };

    match state.store.delete_by_handle(&handle).await {
        Ok(true) => {
            info!(%handle, "Profile deleted");
            Json(serde_json::json!({ "message": "Profile deleted" })).into_response()
        }
        Ok(false) => error_response(&KindredError::NotFound("Profile not found".into())),
        Err(e) => error_response(&KindredError::Store(e.to_string())),
    }
}

// --- GET /api/profile/{id}/updates ---

fn status_event(profile: &Profile) -> Event {
    Event::default()
        .json_data(serde_json::json!({
            "status": profile.processing_status,
            "data": profile,
        }))
        .expect("profile snapshot serializes")
}

/// Server-push status stream: emits a `{status, data}` event for the
/// current snapshot and then for every change until the status is
/// terminal. The client abandoning the stream has no effect on the
/// in-flight pipeline.
pub async fn profile_updates(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    let initial = match state.store.get(id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return error_response(&KindredError::NotFound("Profile not found".into())),
        Err(e) => return error_response(&KindredError::Store(e.to_string())),
    };

    let receiver = state.events.subscribe(id).await;

    let stream = async_stream::stream! {
        let mut receiver = receiver;
        let mut current = initial;
        loop {
            yield Ok::<Event, Infallible>(status_event(&current));
            if current.processing_status.is_terminal() {
                break;
            }
            let Some(rx) = receiver.as_mut() else {
                // No run in flight and not terminal: nothing further
                // to report on this stream.
                break;
            };
            if rx.changed().await.is_err() {
                // Publisher gone; emit whatever it left last.
                current = rx.borrow().clone();
                yield Ok(status_event(&current));
                break;
            }
            current = rx.borrow_and_update().clone();
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

// --- GET /api/match ---

#[derive(Deserialize)]
pub struct MatchParams {
    profile_id: Option<Uuid>,
}

pub async fn find_match(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MatchParams>,
) -> Response {
    let Some(profile_id) = params.profile_id else {
        return error_response(&KindredError::Validation("Profile ID required".into()));
    };

    let (query, outcome) = match find_matches(state.store.as_ref(), profile_id).await {
        Ok(result) => result,
        Err(e) => return error_response(&e),
    };

    match outcome {
        MatchOutcome::NoCandidates => Json(serde_json::json!({
            "matches": [],
            "message": format!("No {} profiles found for matching", query.gender.opposite()),
        }))
        .into_response(),
        MatchOutcome::Ranked { matches, top } => Json(serde_json::json!({
            "matches": matches
                .iter()
                .map(|m| serde_json::json!({
                    "profile_id": m.profile_id,
                    "similarity": m.similarity,
                }))
                .collect::<Vec<_>>(),
            "top_match": {
                "profile_id": top.id,
                "stringified_data": top.stringified_data,
            },
            "profile": {
                "profile_id": query.id,
                "stringified_data": query.stringified_data,
            },
        }))
        .into_response(),
    }
}
