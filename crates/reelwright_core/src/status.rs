//! Video lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a video.
///
/// Wire values are upper-case (`QUEUED`, `GENERATING`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoStatus {
    /// Waiting for a worker.
    Queued,
    /// A worker is producing script, audio, images or the final file.
    Generating,
    /// Images and audio exist; assembly waits for human approval.
    Review,
    /// Assembled and waiting for a scheduled publish.
    Scheduled,
    /// Assembled and publishable.
    Ready,
    /// Published to at least one platform.
    Posted,
    /// Failed or stopped by the user.
    Failed,
}

impl VideoStatus {
    /// QUEUED and GENERATING count against the single-in-flight rule.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Queued | Self::Generating)
    }

    /// Retry is only legal from FAILED or QUEUED.
    pub fn can_retry(self) -> bool {
        matches!(self, Self::Failed | Self::Queued)
    }

    /// Publish is only legal from READY or POSTED.
    pub fn can_publish(self) -> bool {
        matches!(self, Self::Ready | Self::Posted)
    }

    /// Stop is only legal while the video is in flight.
    pub fn can_stop(self) -> bool {
        self.is_active()
    }
}
