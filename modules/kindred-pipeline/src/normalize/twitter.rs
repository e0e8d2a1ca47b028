use std::sync::OnceLock;

use regex::Regex;

use kindred_common::types::{CleanedTwitter, RawRecord, Tweet};

use super::non_empty;

/// Delimiter between the profile-metadata segment and each tweet
/// segment in the provider's flattened rendering.
const TWEET_DELIMITER: &str = "| created_at:";

fn followers_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"followers_count: (\d+)").expect("valid regex"))
}

fn following_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"friends_count: (\d+)").expect("valid regex"))
}

fn tweet_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"statuses_count: (\d+)").expect("valid regex"))
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"location: ([^|]+)").expect("valid regex"))
}

fn favorite_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"favorite_count: (\d+)").expect("valid regex"))
}

fn retweet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"retweet_count: (\d+)").expect("valid regex"))
}

fn tweet_body_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"count: \d+\s*\|\s*lang: \w+\s+([^|]+)").expect("valid regex"))
}

fn capture_u64(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Clean one raw Twitter/X profile record. The raw blob is the
/// provider-metadata segment followed by one segment per tweet,
/// separated by `| created_at:`.
pub fn clean_twitter(record: &RawRecord) -> CleanedTwitter {
    let Some(text) = record.text.as_deref().filter(|t| !t.trim().is_empty()) else {
        return CleanedTwitter::default();
    };

    let mut segments = text.split(TWEET_DELIMITER);

    // Everything before the first tweet is profile metadata; the bio
    // is the part before the first field separator.
    let profile_info = segments.next().unwrap_or("");
    let bio = profile_info.split('|').next().and_then(non_empty);

    let tweets = segments.filter_map(parse_tweet).collect();

    CleanedTwitter {
        handle: record.author.as_deref().and_then(non_empty),
        bio,
        location: location_re()
            .captures(text)
            .and_then(|c| non_empty(c.get(1).map_or("", |m| m.as_str()))),
        follower_count: capture_u64(followers_re(), text),
        following_count: capture_u64(following_re(), text),
        tweet_count: capture_u64(tweet_count_re(), text),
        tweets,
    }
}

/// Parse one tweet segment. Returns None when no body text could be
/// extracted — a tweet without content is useless for matching.
fn parse_tweet(segment: &str) -> Option<Tweet> {
    let text = tweet_body_re()
        .captures(segment)
        .and_then(|c| non_empty(c.get(1).map_or("", |m| m.as_str())))?;

    let date = segment.split('|').next().and_then(non_empty);

    Some(Tweet {
        text,
        date,
        favorites: capture_u64(favorite_re(), segment),
        retweets: capture_u64(retweet_re(), segment),
    })
}
