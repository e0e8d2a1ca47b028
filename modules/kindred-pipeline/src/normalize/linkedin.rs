use std::sync::OnceLock;

use regex::Regex;

use kindred_common::types::{CleanedLinkedIn, RawRecord};

use super::non_empty;

const EXPERIENCES_MARKER: &str = "Experiences:";
const EDUCATION_MARKER: &str = "Education:";
const LANGUAGES_MARKER: &str = "Languages:";

fn position_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Position: ([^\n]*)").expect("valid regex"))
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Location: ([^\n]*)").expect("valid regex"))
}

fn connections_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Number of connections: ([^\n]*)").expect("valid regex"))
}

fn language_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"language: ([^\n]*)\nproficiency: ([^\n]*)").expect("valid regex"))
}

fn line_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| non_empty(c.get(1).map_or("", |m| m.as_str())))
}

/// Clean one raw LinkedIn profile record. The blob is line-oriented:
/// headline fields, then an `Experiences:` block running until
/// `Education:`, an `Education:` block running until `Languages:` or
/// end-of-text, and `language:`/`proficiency:` line pairs.
///
/// Role, location and connection count stay opaque strings — the
/// provider's formats for them ("500+", "Greater London Area") are not
/// worth parsing.
pub fn clean_linkedin(record: &RawRecord) -> CleanedLinkedIn {
    let Some(text) = record.text.as_deref().filter(|t| !t.trim().is_empty()) else {
        return CleanedLinkedIn::default();
    };

    let mut experiences = Vec::new();
    let mut in_experiences = false;
    for line in text.lines() {
        if line.starts_with(EXPERIENCES_MARKER) {
            in_experiences = true;
        } else if in_experiences && line.starts_with(EDUCATION_MARKER) {
            break;
        } else if in_experiences {
            if let Some(entry) = non_empty(line) {
                experiences.push(entry);
            }
        }
    }

    let mut education = Vec::new();
    if let Some(start) = text.find(EDUCATION_MARKER) {
        let after = &text[start + EDUCATION_MARKER.len()..];
        let block = match after.find(LANGUAGES_MARKER) {
            Some(end) => &after[..end],
            None => after,
        };
        if let Some(entry) = non_empty(block) {
            education.push(entry);
        }
    }

    let languages = language_re()
        .captures_iter(text)
        .map(|c| format!("{} ({})", c[1].trim(), c[2].trim()))
        .collect();

    CleanedLinkedIn {
        current_role: line_capture(position_re(), text),
        location: line_capture(location_re(), text),
        connections: line_capture(connections_re(), text),
        experiences,
        education,
        languages,
    }
}
