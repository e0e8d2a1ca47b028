//! Per-provider cleaners. Each takes one raw fetched record and
//! produces a typed cleaned record with only the fields that matter
//! for matching quality.
//!
//! The raw text layouts are an external, unversioned contract of the
//! crawl provider — these parsers are deliberately isolated pure
//! functions with fixture tests so a provider format change shows up
//! as a contained test failure, not a scattered one.
//!
//! None of the cleaners error: a missing or empty text blob just
//! yields an empty cleaned record, and a field whose pattern does not
//! match is absent, never zero or empty-string.

mod linkedin;
mod twitter;
mod website;

pub use linkedin::clean_linkedin;
pub use twitter::clean_twitter;
pub use website::clean_website;

/// Shared helper: trim and drop empty captures so "absent" stays
/// `None` all the way through.
pub(crate) fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
