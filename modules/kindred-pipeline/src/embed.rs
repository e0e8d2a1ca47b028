//! Embedding step with the one allowed recovery: when the provider
//! rejects the input as exceeding its context window, truncate to a
//! fixed character budget and retry exactly once. Any other failure
//! propagates — there is no silent fallback vector.

use tracing::{debug, warn};

use ai_client::EmbedError;
use kindred_common::KindredError;

use crate::traits::TextEmbedder;

/// Token budget kept under text-embedding-3-small's 8,192-token
/// context window.
const EMBED_MAX_TOKENS: usize = 8_000;
/// Rough characters-per-token ratio for English prose.
const APPROX_CHARS_PER_TOKEN: usize = 4;
/// Character budget used when the provider reports the input too
/// large.
pub const EMBED_MAX_CHARS: usize = EMBED_MAX_TOKENS * APPROX_CHARS_PER_TOKEN;

/// The vector plus the text that actually produced it. The caller must
/// persist `text`, not the original input, so the stored canonical
/// text and the embedding stay consistent after a truncation.
#[derive(Debug, Clone)]
pub struct EmbeddedText {
    pub text: String,
    pub embedding: Vec<f32>,
}

pub async fn embed_canonical_text(
    embedder: &dyn TextEmbedder,
    text: &str,
) -> Result<EmbeddedText, KindredError> {
    match embedder.embed(text).await {
        Ok(embedding) => {
            debug!(chars = text.len(), dims = embedding.len(), "Embedding generated");
            Ok(EmbeddedText {
                text: text.to_string(),
                embedding,
            })
        }
        Err(EmbedError::ContextTooLarge) => {
            let truncated = truncate_chars(text, EMBED_MAX_CHARS);
            warn!(
                original_chars = text.len(),
                truncated_chars = truncated.len(),
                "Embedding input too large, retrying once with truncated text"
            );
            let embedding = embedder
                .embed(&truncated)
                .await
                .map_err(|e| KindredError::Embedding(e.to_string()))?;
            Ok(EmbeddedText {
                text: truncated,
                embedding,
            })
        }
        Err(e) => Err(KindredError::Embedding(e.to_string())),
    }
}

/// Truncate to at most `max` chars, never splitting a char.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
