use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Enums ---

/// The two-valued partition profiles are matched across, never within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The category a profile of this gender is matched against.
    pub fn opposite(self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    /// Lifecycle guard: pending → processing → completed | failed.
    /// Terminal states only re-enter via Pending (a fresh submission
    /// resets all derived state first).
    pub fn can_transition_to(self, next: ProcessingStatus) -> bool {
        use ProcessingStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Completed, Pending)
                | (Failed, Pending)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed)
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

// --- Raw fetched content ---

/// One raw fetched record as returned by the content fetcher. The text
/// blob's internal format is an external, unversioned contract of the
/// provider; the normalizer is the only code that looks inside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// --- Cleaned per-source records ---

/// One tweet extracted from the raw Twitter blob. Engagement counts are
/// absent (not zero) when the provider omitted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub text: String,
    pub date: Option<String>,
    pub favorites: Option<u64>,
    pub retweets: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedTwitter {
    pub handle: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub follower_count: Option<u64>,
    pub following_count: Option<u64>,
    pub tweet_count: Option<u64>,
    pub tweets: Vec<Tweet>,
}

impl CleanedTwitter {
    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
            && self.bio.is_none()
            && self.location.is_none()
            && self.follower_count.is_none()
            && self.following_count.is_none()
            && self.tweet_count.is_none()
            && self.tweets.is_empty()
    }
}

/// Connection count stays an opaque string ("500+" and similar); the
/// provider's format is not stable enough to parse into a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedLinkedIn {
    pub current_role: Option<String>,
    pub location: Option<String>,
    pub connections: Option<String>,
    pub experiences: Vec<String>,
    pub education: Vec<String>,
    pub languages: Vec<String>,
}

impl CleanedLinkedIn {
    pub fn is_empty(&self) -> bool {
        self.current_role.is_none()
            && self.location.is_none()
            && self.connections.is_none()
            && self.experiences.is_empty()
            && self.education.is_empty()
            && self.languages.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedWebsite {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl CleanedWebsite {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

// --- Profile ---

/// The declared identities of one submission. Natural key is the
/// Twitter handle when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSubmission {
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_links: Option<Vec<String>>,
}

/// The central entity: one person tracked for matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub gender: Gender,
    pub twitter_handle: Option<String>,
    pub linkedin_url: Option<String>,
    pub personal_website: Option<String>,
    pub other_links: Option<Vec<String>>,

    // Raw per-source data, present only after a successful fetch.
    pub twitter_data: Option<RawRecord>,
    pub linkedin_data: Option<RawRecord>,
    pub website_data: Option<RawRecord>,
    pub other_links_data: Option<Vec<RawRecord>>,

    /// Canonical text: the single formatted string all fetched data is
    /// synthesized into. This exact text is what got embedded.
    pub stringified_data: Option<String>,
    pub embedding: Option<Vec<f32>>,

    pub processing_status: ProcessingStatus,
    pub error_message: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile from a validated submission, no derived state yet.
    pub fn new(submission: &ProfileSubmission) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            gender: submission.gender,
            twitter_handle: submission.twitter_handle.clone(),
            linkedin_url: submission.linkedin_url.clone(),
            personal_website: submission.personal_website.clone(),
            other_links: submission.other_links.clone(),
            twitter_data: None,
            linkedin_data: None,
            website_data: None,
            other_links_data: None,
            stringified_data: None,
            embedding: None,
            processing_status: ProcessingStatus::Pending,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Resubmission with the same natural key: overwrite the declared
    /// sources and null every derived field before the pipeline reruns.
    pub fn reset(&mut self, submission: &ProfileSubmission) {
        self.gender = submission.gender;
        self.twitter_handle = submission.twitter_handle.clone();
        self.linkedin_url = submission.linkedin_url.clone();
        self.personal_website = submission.personal_website.clone();
        self.other_links = submission.other_links.clone();
        self.twitter_data = None;
        self.linkedin_data = None;
        self.website_data = None;
        self.other_links_data = None;
        self.stringified_data = None;
        self.embedding = None;
        self.processing_status = ProcessingStatus::Pending;
        self.error_message = None;
        self.updated_at = Utc::now();
    }

    /// Eligible as a match candidate: terminal success with a vector.
    pub fn is_matchable(&self) -> bool {
        self.processing_status == ProcessingStatus::Completed && self.embedding.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ProfileSubmission {
        ProfileSubmission {
            gender: Gender::Female,
            twitter_handle: Some("ada".into()),
            linkedin_url: None,
            personal_website: Some("https://ada.dev".into()),
            other_links: None,
        }
    }

    #[test]
    fn lifecycle_transitions() {
        use ProcessingStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(Completed.can_transition_to(Pending));
        assert!(Failed.can_transition_to(Pending));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Processing));
        assert!(!Failed.can_transition_to(Completed));
    }

    #[test]
    fn reset_clears_derived_state() {
        let mut profile = Profile::new(&submission());
        profile.processing_status = ProcessingStatus::Completed;
        profile.stringified_data = Some("text".into());
        profile.embedding = Some(vec![1.0, 0.0]);
        profile.error_message = Some("partial".into());

        profile.reset(&submission());

        assert_eq!(profile.processing_status, ProcessingStatus::Pending);
        assert!(profile.stringified_data.is_none());
        assert!(profile.embedding.is_none());
        assert!(profile.error_message.is_none());
        assert!(profile.twitter_data.is_none());
    }

    #[test]
    fn matchable_requires_completed_and_embedding() {
        let mut profile = Profile::new(&submission());
        assert!(!profile.is_matchable());

        profile.processing_status = ProcessingStatus::Completed;
        assert!(!profile.is_matchable());

        profile.embedding = Some(vec![0.1]);
        assert!(profile.is_matchable());
    }

    #[test]
    fn opposite_gender() {
        assert_eq!(Gender::Male.opposite(), Gender::Female);
        assert_eq!(Gender::Female.opposite(), Gender::Male);
    }
}
