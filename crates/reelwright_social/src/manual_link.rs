//! Validation of user-supplied post URLs.

use reelwright_core::Platform;
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://((www|m)\.)?(youtube\.com/(shorts/[\w-]+|watch\?(.*&)?v=[\w-]+)|youtu\.be/[\w-]+)",
    )
    .expect("Valid YouTube URL regex")
});

static INSTAGRAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(www\.)?instagram\.com/(reels?|p)/[\w-]+")
        .expect("Valid Instagram URL regex")
});

static FACEBOOK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://((www|m|web)\.)?(facebook\.com|fb\.watch)/\S+")
        .expect("Valid Facebook URL regex")
});

fn invalid(reason: impl Into<String>) -> ReelError {
    ReelError::new(ReelErrorKind::validation("url", reason))
}

/// Check that `raw` is a well-formed URL of a known shape for `platform`.
///
/// Returns the trimmed URL.
///
/// # Errors
///
/// Returns a validation error on the `url` field.
pub fn validate_manual_url(platform: Platform, raw: &str) -> ReelResult<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).map_err(|e| invalid(format!("not a valid URL ({e})")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid("must be an http(s) URL"));
    }

    let pattern: &Regex = match platform {
        Platform::Youtube => &YOUTUBE,
        Platform::Instagram => &INSTAGRAM,
        Platform::Facebook => &FACEBOOK,
    };
    if !pattern.is_match(raw) {
        return Err(invalid(format!(
            "not a recognized {} post URL",
            platform.display_name()
        )));
    }
    Ok(raw.to_string())
}
