use std::sync::OnceLock;

use regex::Regex;

use crate::error::KindredError;
use crate::types::ProfileSubmission;

/// Maximum number of additional arbitrary links per submission.
pub const MAX_OTHER_LINKS: usize = 5;

fn handle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("valid regex"))
}

/// Twitter handle rules: 1-15 chars, alphanumeric or underscore.
pub fn is_valid_twitter_handle(handle: &str) -> bool {
    handle_re().is_match(handle)
}

/// Syntactically valid absolute http/https URL.
pub fn is_valid_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(parsed) => parsed.scheme() == "http" || parsed.scheme() == "https",
        Err(_) => false,
    }
}

/// Reject a submission before any pipeline work begins. Validation
/// failures are reported synchronously to the caller.
pub fn validate_submission(submission: &ProfileSubmission) -> Result<(), KindredError> {
    if let Some(handle) = &submission.twitter_handle {
        if !is_valid_twitter_handle(handle) {
            return Err(KindredError::Validation(format!(
                "Invalid Twitter handle: {handle}"
            )));
        }
    }

    if let Some(url) = &submission.linkedin_url {
        if !is_valid_url(url) {
            return Err(KindredError::Validation(format!(
                "Invalid LinkedIn URL: {url}"
            )));
        }
    }

    if let Some(url) = &submission.personal_website {
        if !is_valid_url(url) {
            return Err(KindredError::Validation(format!(
                "Invalid website URL: {url}"
            )));
        }
    }

    if let Some(links) = &submission.other_links {
        if links.len() > MAX_OTHER_LINKS {
            return Err(KindredError::Validation(format!(
                "Too many links: {} (max {MAX_OTHER_LINKS})",
                links.len()
            )));
        }
        for link in links {
            if !is_valid_url(link) {
                return Err(KindredError::Validation(format!("Invalid link URL: {link}")));
            }
        }
    }

    Ok(())
}
