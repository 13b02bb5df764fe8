//! Social platforms and per-platform publish outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A social destination a video can be published to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Platform {
    /// YouTube Shorts.
    #[serde(alias = "youtube")]
    Youtube,
    /// Instagram Reels.
    #[serde(alias = "instagram")]
    Instagram,
    /// Facebook Reels.
    #[serde(alias = "facebook")]
    Facebook,
}

impl Platform {
    /// Every supported platform, in display order.
    pub const ALL: [Platform; 3] = [Platform::Youtube, Platform::Instagram, Platform::Facebook];

    /// Human readable name for messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Youtube => "YouTube",
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
        }
    }
}

/// Result of publishing one video to one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    /// Destination platform.
    pub platform: Platform,
    /// Whether the post is live.
    pub success: bool,
    /// Platform post id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    /// Public permalink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Classified failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the URL was supplied by the user rather than the publisher.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub manual_url: bool,
    /// When the outcome was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl PublishOutcome {
    /// A successful publish.
    pub fn posted(platform: Platform, post_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            platform,
            success: true,
            post_id: Some(post_id.into()),
            url: Some(url.into()),
            error: None,
            manual_url: false,
            recorded_at: Some(Utc::now()),
        }
    }

    /// A failed publish carrying a classified message.
    pub fn failed(platform: Platform, error: impl Into<String>) -> Self {
        Self {
            platform,
            success: false,
            post_id: None,
            url: None,
            error: Some(error.into()),
            manual_url: false,
            recorded_at: Some(Utc::now()),
        }
    }

    /// A URL recorded by hand for a post made outside the orchestrator.
    pub fn manual(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform,
            success: true,
            post_id: None,
            url: Some(url.into()),
            error: None,
            manual_url: true,
            recorded_at: Some(Utc::now()),
        }
    }
}

/// Stored entry shape: older rows hold bare platform names.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredOutcome {
    Legacy(Platform),
    Structured(PublishOutcome),
}

impl From<StoredOutcome> for PublishOutcome {
    fn from(stored: StoredOutcome) -> Self {
        match stored {
            StoredOutcome::Legacy(platform) => Self {
                platform,
                success: true,
                post_id: None,
                url: None,
                error: None,
                manual_url: false,
                recorded_at: None,
            },
            StoredOutcome::Structured(outcome) => outcome,
        }
    }
}

/// Ordered per-platform publish outcomes of a video, at most one per platform.
///
/// Deserialization accepts legacy bare-string entries and normalizes them, so
/// the rest of the code only ever sees [`PublishOutcome`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostedPlatforms(Vec<PublishOutcome>);

impl<'de> Deserialize<'de> for PostedPlatforms {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = Option::<Vec<StoredOutcome>>::deserialize(deserializer)?.unwrap_or_default();
        let mut posted = Self::default();
        for entry in stored {
            posted.upsert(entry.into());
        }
        Ok(posted)
    }
}

impl PostedPlatforms {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an outcome, replacing any existing entry for the same platform in place.
    pub fn upsert(&mut self, outcome: PublishOutcome) {
        match self.0.iter_mut().find(|o| o.platform == outcome.platform) {
            Some(existing) => *existing = outcome,
            None => self.0.push(outcome),
        }
    }

    /// Merge a batch of outcomes by platform key.
    pub fn merge(&mut self, outcomes: impl IntoIterator<Item = PublishOutcome>) {
        for outcome in outcomes {
            self.upsert(outcome);
        }
    }

    /// Drop the entries for the given platforms. Returns how many were removed.
    pub fn remove(&mut self, platforms: &[Platform]) -> usize {
        let before = self.0.len();
        self.0.retain(|o| !platforms.contains(&o.platform));
        before - self.0.len()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Outcome recorded for a platform.
    pub fn get(&self, platform: Platform) -> Option<&PublishOutcome> {
        self.0.iter().find(|o| o.platform == platform)
    }

    /// Whether a platform holds a successful entry.
    pub fn is_posted(&self, platform: Platform) -> bool {
        self.get(platform).is_some_and(|o| o.success)
    }

    /// Whether any platform holds a successful entry.
    pub fn any_posted(&self) -> bool {
        self.0.iter().any(|o| o.success)
    }

    /// Platforms with a successful entry.
    pub fn posted_platforms(&self) -> Vec<Platform> {
        self.0.iter().filter(|o| o.success).map(|o| o.platform).collect()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PublishOutcome> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
