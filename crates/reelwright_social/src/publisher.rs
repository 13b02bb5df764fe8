//! The per-platform publishing seam.

use async_trait::async_trait;
use derive_getters::Getters;
use reelwright_core::{Platform, SocialAccount};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to publish.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    /// Local file holding the assembled video.
    video_path: PathBuf,
    /// Publicly reachable URL of the same file, for platforms that fetch it themselves.
    public_url: Option<String>,
    /// Post title.
    title: String,
    /// Caption or description.
    caption: String,
}

impl PublishRequest {
    /// Describe a video to publish.
    pub fn new(
        video_path: impl Into<PathBuf>,
        public_url: Option<String>,
        title: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            video_path: video_path.into(),
            public_url,
            title: title.into(),
            caption: caption.into(),
        }
    }

    /// Read the whole video file.
    pub async fn read_video(&self) -> ReelResult<Vec<u8>> {
        let bytes = tokio::fs::read(&self.video_path).await.map_err(|e| {
            ReelError::new(ReelErrorKind::Io(format!(
                "cannot read {}: {e}",
                self.video_path.display()
            )))
        })?;
        if bytes.is_empty() {
            return Err(ReelError::new(ReelErrorKind::Io(format!(
                "video file {} is empty",
                self.video_path.display()
            ))));
        }
        Ok(bytes)
    }
}

/// A live post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedPost {
    /// Platform post id.
    pub post_id: String,
    /// Public permalink (or its deterministic fallback).
    pub url: String,
}

/// Publishes assembled videos to one platform.
///
/// Implementations return vendor failures as [`ReelErrorKind::Publish`]
/// carrying the raw vendor text; classification happens in the orchestrator
/// so that every exit is treated the same way.
#[async_trait]
pub trait VideoPublisher: Send + Sync {
    /// Platform served.
    fn platform(&self) -> Platform;

    /// Upload and publish, using the account's stored credential.
    async fn publish(
        &self,
        account: &SocialAccount,
        request: &PublishRequest,
    ) -> ReelResult<PublishedPost>;
}

/// A raw vendor failure for `platform`.
#[track_caller]
pub fn publish_error(platform: Platform, message: impl Into<String>) -> ReelError {
    ReelError::new(ReelErrorKind::Publish {
        platform: platform.display_name().to_string(),
        message: message.into(),
    })
}
