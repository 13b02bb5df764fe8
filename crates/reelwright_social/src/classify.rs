//! Vendor error classification.
//!
//! Platform APIs report failures as free text. Known patterns are rewritten
//! into a message that tells the user what to do, with a bounded excerpt of
//! the original kept for diagnostics. Unrecognized text passes through as is.

use reelwright_core::Platform;
use serde::{Deserialize, Serialize};

/// What went wrong, as far as the user is concerned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PublishErrorCategory {
    /// Too many requests.
    RateLimited,
    /// Access token expired or revoked.
    TokenExpired,
    /// Token lacks a publishing scope.
    MissingPermission,
    /// Account flagged for spam or restricted.
    SpamRestricted,
    /// Content already posted.
    Duplicate,
    /// Copyright or IP claim.
    Copyright,
    /// Upload or processing failed.
    UploadFailed,
}

// Checked in order; the first category with a matching needle wins.
const PATTERNS: &[(PublishErrorCategory, &[&str])] = &[
    (
        PublishErrorCategory::RateLimited,
        &[
            "application request limit reached",
            "user request limit reached",
            "rate limit",
            "too many requests",
            "quota exceeded",
            "quotaexceeded",
        ],
    ),
    (
        PublishErrorCategory::TokenExpired,
        &[
            "session has expired",
            "error validating access token",
            "invalid oauth",
            "token has expired",
            "token expired",
            "invalid_grant",
            "invalid credentials",
        ],
    ),
    (
        PublishErrorCategory::MissingPermission,
        &[
            "permission",
            "not authorized",
            "insufficient",
            "(#200)",
            "(#10)",
            "forbidden",
        ],
    ),
    (
        PublishErrorCategory::SpamRestricted,
        &["spam", "restricted", "temporarily blocked"],
    ),
    (
        PublishErrorCategory::Duplicate,
        &["duplicate", "already posted", "already been posted"],
    ),
    (
        PublishErrorCategory::Copyright,
        &["copyright", "intellectual property"],
    ),
    (
        PublishErrorCategory::UploadFailed,
        &["upload", "processing failed", "transcod"],
    ),
];

impl PublishErrorCategory {
    /// Match raw vendor text, case-insensitively.
    pub fn detect(raw: &str) -> Option<Self> {
        let haystack = raw.to_lowercase();
        PATTERNS
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| haystack.contains(n)))
            .map(|(category, _)| *category)
    }

    /// Actionable message for a platform.
    pub fn message(self, platform: Platform) -> String {
        let name = platform.display_name();
        match self {
            Self::RateLimited => format!(
                "{name} rate limit reached. Wait a while before publishing again."
            ),
            Self::TokenExpired => format!(
                "Your {name} connection has expired or was revoked. Reconnect the account and try again."
            ),
            Self::MissingPermission => format!(
                "The connected {name} account is missing a publishing permission. Reconnect it and grant all requested permissions."
            ),
            Self::SpamRestricted => format!(
                "{name} has flagged or restricted this account. Check the account status on {name} before retrying."
            ),
            Self::Duplicate => format!("{name} rejected this video as a duplicate of an earlier post."),
            Self::Copyright => format!(
                "{name} blocked this video over a copyright claim. Replace the flagged audio or visuals and try again."
            ),
            Self::UploadFailed => format!(
                "{name} could not process the uploaded video. Try publishing again, and regenerate the video if it keeps failing."
            ),
        }
    }
}

/// The first `max_chars` characters of `raw`, marked when cut.
pub fn excerpt(raw: &str, max_chars: usize) -> String {
    let raw = raw.trim();
    if raw.chars().count() <= max_chars {
        return raw.to_string();
    }
    let mut cut: String = raw.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

/// Rewrite a raw vendor error into a user-facing message.
///
/// # Examples
///
/// ```
/// use reelwright_core::Platform;
/// use reelwright_social::classify_error;
///
/// let msg = classify_error(Platform::Facebook, "(#4) Application request limit reached", 150);
/// assert!(msg.starts_with("Facebook rate limit reached"));
/// assert!(msg.contains("Application request limit reached"));
///
/// assert_eq!(classify_error(Platform::Facebook, "Something odd", 150), "Something odd");
/// ```
pub fn classify_error(platform: Platform, raw: &str, excerpt_chars: usize) -> String {
    match PublishErrorCategory::detect(raw) {
        Some(category) => format!(
            "{} (Details: {})",
            category.message(platform),
            excerpt(raw, excerpt_chars)
        ),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_category_wins() {
        // Mentions both a rate limit and an upload; rate limit is checked first.
        let raw = "Upload rejected: rate limit exceeded";
        assert_eq!(
            PublishErrorCategory::detect(raw),
            Some(PublishErrorCategory::RateLimited)
        );
    }

    #[test]
    fn test_excerpt_counts_characters() {
        assert_eq!(excerpt("ééé", 2), "éé…");
        assert_eq!(excerpt("  short  ", 10), "short");
    }
}
