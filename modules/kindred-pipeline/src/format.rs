//! Canonical profile text. This is the exact string that gets embedded,
//! so its structure determines matching quality, and it has to be
//! deterministic: same cleaned records in, byte-identical text out.
//!
//! Sections come out in a fixed order (category, Twitter, professional,
//! website, other links) regardless of fetch-completion order. A
//! section for an undeclared source — or one whose fetch produced no
//! cleaned record — is omitted entirely rather than rendered as an
//! empty header.

use kindred_common::types::{CleanedLinkedIn, CleanedTwitter, CleanedWebsite, Gender};

/// Declared identifiers plus whatever subset of cleaned records the
/// fetch produced. `other_links_data` is index-aligned with
/// `other_links`; a failed link keeps its slot as `None`.
#[derive(Debug, Default)]
pub struct FormatInput<'a> {
    pub gender: Option<Gender>,
    pub twitter_handle: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
    pub personal_website: Option<&'a str>,
    pub other_links: &'a [String],
    pub twitter: Option<&'a CleanedTwitter>,
    pub linkedin: Option<&'a CleanedLinkedIn>,
    pub website: Option<&'a CleanedWebsite>,
    pub other_links_data: &'a [Option<CleanedWebsite>],
}

/// Join all cleaned per-source records into the one canonical text
/// blob used for both embedding and display.
pub fn format_profile_text(input: &FormatInput<'_>) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(gender) = input.gender {
        sections.push(format!("Profile Type: {gender}"));
    }

    if let Some(twitter) = input.twitter {
        sections.push("\nTwitter Profile:".to_string());

        // Cleaned handle when the crawl captured it, declared handle
        // otherwise.
        let handle = twitter
            .handle
            .as_deref()
            .or(input.twitter_handle)
            .unwrap_or_default();
        sections.push(format!("Handle: @{handle}"));

        if let Some(bio) = &twitter.bio {
            sections.push(format!("Bio: {bio}"));
        }
        if let Some(location) = &twitter.location {
            sections.push(format!("Location: {location}"));
        }
        if let Some(followers) = twitter.follower_count {
            sections.push(format!("Followers: {followers}"));
        }
        if let Some(total) = twitter.tweet_count {
            sections.push(format!("Total Tweets: {total}"));
        }

        if !twitter.tweets.is_empty() {
            sections.push("\nRecent Popular Tweets:".to_string());
            for tweet in &twitter.tweets {
                sections.push(format!("- {}", tweet.text));
                sections.push(format!(
                    "  {} likes • {} retweets • {}",
                    tweet.favorites.unwrap_or(0),
                    tweet.retweets.unwrap_or(0),
                    tweet.date.as_deref().unwrap_or(""),
                ));
            }
        }
    }

    if let Some(linkedin) = input.linkedin {
        sections.push("\nProfessional Background:".to_string());

        if let Some(role) = &linkedin.current_role {
            sections.push(format!("Current Role: {role}"));
        }
        if let Some(location) = &linkedin.location {
            sections.push(format!("Location: {location}"));
        }
        if let Some(connections) = &linkedin.connections {
            sections.push(format!("Network: {connections}"));
        }
        if !linkedin.experiences.is_empty() {
            sections.push("Experience:".to_string());
            for exp in &linkedin.experiences {
                sections.push(format!("- {exp}"));
            }
        }
        if !linkedin.education.is_empty() {
            sections.push("Education:".to_string());
            for edu in &linkedin.education {
                sections.push(format!("- {edu}"));
            }
        }
        if !linkedin.languages.is_empty() {
            sections.push("Languages:".to_string());
            for lang in &linkedin.languages {
                sections.push(format!("- {lang}"));
            }
        }
    }

    if let Some(website) = input.website {
        sections.push("\nPersonal Website:".to_string());
        if let Some(url) = input.personal_website {
            sections.push(format!("URL: {url}"));
        }
        if let Some(title) = &website.title {
            sections.push(format!("Title: {title}"));
        }
        if let Some(content) = &website.content {
            sections.push(format!("Content:\n{content}"));
        }
    }

    if input.other_links_data.iter().any(Option::is_some) {
        sections.push("\nOther Online Presence:".to_string());
        for (index, link) in input.other_links.iter().enumerate() {
            sections.push(format!("Link {}: {link}", index + 1));
            if let Some(Some(data)) = input.other_links_data.get(index) {
                if let Some(content) = &data.content {
                    sections.push(format!("Content: {content}"));
                }
            }
        }
    }

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_common::types::Tweet;

    fn cleaned_twitter() -> CleanedTwitter {
        CleanedTwitter {
            handle: Some("ada".into()),
            bio: Some("Building analytical engines.".into()),
            location: Some("London".into()),
            follower_count: Some(1200),
            following_count: Some(300),
            tweet_count: Some(4500),
            tweets: vec![Tweet {
                text: "Punched cards are the original source code".into(),
                date: Some("Mon Jan 01 2024".into()),
                favorites: Some(42),
                retweets: Some(7),
            }],
        }
    }

    #[test]
    fn deterministic_output() {
        let twitter = cleaned_twitter();
        let input = FormatInput {
            gender: Some(Gender::Female),
            twitter_handle: Some("ada"),
            twitter: Some(&twitter),
            ..Default::default()
        };
        assert_eq!(format_profile_text(&input), format_profile_text(&input));
    }

    #[test]
    fn renders_twitter_section() {
        let twitter = cleaned_twitter();
        let input = FormatInput {
            gender: Some(Gender::Female),
            twitter_handle: Some("ada"),
            twitter: Some(&twitter),
            ..Default::default()
        };
        let text = format_profile_text(&input);
        assert!(text.starts_with("Profile Type: female"));
        assert!(text.contains("Handle: @ada"));
        assert!(text.contains("Bio: Building analytical engines."));
        assert!(text.contains("Followers: 1200"));
        assert!(text.contains("- Punched cards are the original source code"));
        assert!(text.contains("42 likes • 7 retweets • Mon Jan 01 2024"));
    }

    #[test]
    fn website_only_profile_has_no_other_sections() {
        let website = CleanedWebsite {
            title: Some("Ada's notebook".into()),
            content: Some("Essays on computation.".into()),
        };
        let input = FormatInput {
            gender: Some(Gender::Female),
            personal_website: Some("https://ada.dev"),
            website: Some(&website),
            ..Default::default()
        };
        let text = format_profile_text(&input);
        assert!(text.contains("Personal Website:"));
        assert!(text.contains("URL: https://ada.dev"));
        assert!(!text.contains("Twitter Profile:"));
        assert!(!text.contains("Professional Background:"));
        assert!(!text.contains("Other Online Presence:"));
    }

    #[test]
    fn handle_falls_back_to_declared_when_crawl_missed_it() {
        let twitter = CleanedTwitter {
            bio: Some("Engine designer.".into()),
            ..Default::default()
        };
        let input = FormatInput {
            gender: Some(Gender::Male),
            twitter_handle: Some("charles_b"),
            twitter: Some(&twitter),
            ..Default::default()
        };
        let text = format_profile_text(&input);
        assert!(text.contains("Handle: @charles_b"));
    }

    #[test]
    fn declared_but_failed_source_is_omitted() {
        // Website declared but its fetch failed: no cleaned record, so
        // no website section at all.
        let twitter = cleaned_twitter();
        let input = FormatInput {
            gender: Some(Gender::Female),
            twitter_handle: Some("ada"),
            personal_website: Some("https://ada.dev"),
            twitter: Some(&twitter),
            website: None,
            ..Default::default()
        };
        let text = format_profile_text(&input);
        assert!(text.contains("Twitter Profile:"));
        assert!(!text.contains("Personal Website:"));
    }

    #[test]
    fn other_links_render_index_url_and_content() {
        let data = vec![
            Some(CleanedWebsite {
                title: None,
                content: Some("A conference talk transcript".into()),
            }),
            None,
        ];
        let links = vec![
            "https://example.com/talk".to_string(),
            "https://example.com/gone".to_string(),
        ];
        let input = FormatInput {
            gender: Some(Gender::Female),
            other_links: &links,
            other_links_data: &data,
            ..Default::default()
        };
        let text = format_profile_text(&input);
        assert!(text.contains("Link 1: https://example.com/talk"));
        assert!(text.contains("Content: A conference talk transcript"));
        assert!(text.contains("Link 2: https://example.com/gone"));
    }
}
