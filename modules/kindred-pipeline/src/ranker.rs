//! Match ranking: cosine similarity over stored embeddings, opposite
//! category only, top-K with a deterministic tie-break. Read-only —
//! two calls against an unchanged candidate set return identical
//! output.

use std::cmp::Ordering;

use uuid::Uuid;

use kindred_common::types::Profile;
use kindred_common::KindredError;

use crate::traits::ProfileStore;

/// Fixed result size for the match surface.
pub const TOP_K: usize = 3;

/// Cosine similarity = dot(A,B) / (‖A‖·‖B‖). Undefined inputs — a
/// zero-magnitude vector or mismatched dimensionality — yield 0.0
/// rather than NaN or a panic.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let magnitude = norm_a.sqrt() * norm_b.sqrt();
    if magnitude == 0.0 {
        return 0.0;
    }
    dot / magnitude
}

#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub profile_id: Uuid,
    pub similarity: f32,
}

/// Result of a match query for an eligible profile. An empty candidate
/// set is an explicit outcome, never an error.
#[derive(Debug)]
pub enum MatchOutcome {
    Ranked {
        /// Up to TOP_K matches, best first.
        matches: Vec<RankedMatch>,
        /// Full record of the best match, for immediate display.
        top: Profile,
    },
    NoCandidates,
}

/// Canonical total order: descending similarity, then ascending id.
fn rank(query_embedding: &[f32], candidates: &[Profile]) -> Vec<RankedMatch> {
    let mut scored: Vec<RankedMatch> = candidates
        .iter()
        .map(|candidate| RankedMatch {
            profile_id: candidate.id,
            similarity: cosine_similarity(
                query_embedding,
                candidate.embedding.as_deref().unwrap_or_default(),
            ),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });
    scored.truncate(TOP_K);
    scored
}

/// Look up the query profile, check eligibility, and rank the opposite
/// category's completed profiles. Returns the query profile alongside
/// the outcome so callers can render both sides.
pub async fn find_matches(
    store: &dyn ProfileStore,
    profile_id: Uuid,
) -> Result<(Profile, MatchOutcome), KindredError> {
    let query = store
        .get(profile_id)
        .await
        .map_err(|e| KindredError::Store(e.to_string()))?
        .ok_or_else(|| KindredError::NotFound(format!("Profile {profile_id} not found")))?;

    let Some(query_embedding) = query.embedding.as_deref() else {
        return Err(KindredError::NotEligible(format!(
            "Profile {profile_id} has no embedding"
        )));
    };

    let candidates = store
        .completed_with_embedding(query.gender.opposite())
        .await
        .map_err(|e| KindredError::Store(e.to_string()))?;

    if candidates.is_empty() {
        return Ok((query, MatchOutcome::NoCandidates));
    }

    let matches = rank(query_embedding, &candidates);
    let top = candidates
        .iter()
        .find(|c| c.id == matches[0].profile_id)
        .cloned()
        .expect("top match came from candidates");

    Ok((query, MatchOutcome::Ranked { matches, top }))
}
