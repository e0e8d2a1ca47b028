//! The profile-matching core: fetch declared sources, normalize and
//! format them into one canonical text, embed it, and rank profiles of
//! the opposite category by cosine similarity.

pub mod embed;
pub mod fetch;
pub mod format;
pub mod normalize;
pub mod pipeline;
pub mod ranker;
pub mod store;
pub mod testing;
pub mod traits;

pub use embed::{embed_canonical_text, EmbeddedText, EMBED_MAX_CHARS};
pub use fetch::{fetch_all_sources, FetchedSources, RetryPolicy};
pub use format::{format_profile_text, FormatInput};
pub use pipeline::Pipeline;
pub use ranker::{cosine_similarity, find_matches, MatchOutcome, RankedMatch, TOP_K};
pub use store::MemoryStore;
pub use traits::{ContentFetcher, DerivedUpdate, ProfileNotifier, ProfileStore, TextEmbedder};
