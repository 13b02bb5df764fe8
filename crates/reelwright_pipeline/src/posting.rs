//! Publishing transitions: publish, reset-posted, manual links.

use crate::lifecycle::{LifecycleService, state_conflict};
use reelwright_core::{Platform, PublishOutcome, Video, VideoId, VideoStatus};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_interface::{AutomationRepository, Caller};
use reelwright_social::{PublishRequest, validate_manual_url};
use tracing::{info, instrument, warn};

const UNTITLED: &str = "Untitled";

impl LifecycleService {
    /// Platforms to publish to when the caller names none.
    async fn default_platforms(&self, video: &Video) -> ReelResult<Vec<Platform>> {
        let automation = self.store.automation_for_series(video.series_id()).await?;
        Ok(automation
            .map(|a| a.target_platforms().clone())
            .unwrap_or_default())
    }

    fn publish_request(&self, video: &Video) -> ReelResult<PublishRequest> {
        let artifact = video
            .video_url()
            .as_deref()
            .ok_or_else(|| state_conflict("video has not been assembled"))?;
        let path = self
            .media
            .local_path(artifact)
            .ok_or_else(|| state_conflict("assembled video is not stored locally"))?;
        let title = video.title().clone().unwrap_or_else(|| UNTITLED.to_string());
        Ok(PublishRequest::new(
            path,
            self.media.public_url(artifact),
            title.clone(),
            title,
        ))
    }

    /// Publish a READY or POSTED video.
    ///
    /// Each platform is attempted independently. Outcomes are merged by
    /// platform in one write; the status becomes POSTED only if something is
    /// posted, so a partial failure leaves a READY video re-publishable.
    #[instrument(skip(self, caller), fields(video_id = %id, user_id = %caller.user_id))]
    pub async fn publish(
        &self,
        id: &VideoId,
        platforms: Option<Vec<Platform>>,
        caller: &Caller,
    ) -> ReelResult<Video> {
        let video = self.owned_video(id, caller).await?;
        if !video.status().can_publish() {
            return Err(state_conflict(format!(
                "only READY or POSTED videos can be published (status is {})",
                video.status()
            )));
        }
        let platforms = match platforms {
            Some(platforms) => platforms,
            None => self.default_platforms(&video).await?,
        };
        if platforms.is_empty() {
            return Err(ReelError::new(ReelErrorKind::validation(
                "platforms",
                "no target platforms given or configured",
            )));
        }
        let request = self.publish_request(&video)?;

        let outcomes = self
            .publisher
            .publish(self.store.as_ref(), video.user_id(), &platforms, &request)
            .await;
        for failed in outcomes.iter().filter(|o| !o.success) {
            warn!(platform = %failed.platform, error = ?failed.error, "Platform publish failed");
        }

        let video = self
            .mutate_video(id, |video| {
                video.posted_platforms_mut().merge(outcomes.iter().cloned());
                if video.posted_platforms().any_posted() {
                    video.set_status(VideoStatus::Posted);
                }
                Ok(())
            })
            .await?;
        info!(status = %video.status(), "Publish recorded");
        Ok(video)
    }

    /// Forget publish outcomes.
    ///
    /// No platforms, or an empty list, clears every entry. A POSTED video with
    /// nothing left posted drops back to READY.
    #[instrument(skip(self, caller), fields(video_id = %id, user_id = %caller.user_id))]
    pub async fn reset_posted(
        &self,
        id: &VideoId,
        platforms: Option<Vec<Platform>>,
        caller: &Caller,
    ) -> ReelResult<Video> {
        self.owned_video(id, caller).await?;
        let platforms = platforms.unwrap_or_default();
        self.mutate_video(id, |video| {
            if platforms.is_empty() {
                video.posted_platforms_mut().clear();
            } else {
                video.posted_platforms_mut().remove(&platforms);
            }
            if *video.status() == VideoStatus::Posted && !video.posted_platforms().any_posted() {
                video.set_status(VideoStatus::Ready);
            }
            Ok(())
        })
        .await
    }

    /// Record a URL the user posted outside the orchestrator.
    #[instrument(skip(self, url, caller), fields(video_id = %id, user_id = %caller.user_id, platform = %platform))]
    pub async fn update_manual_link(
        &self,
        id: &VideoId,
        platform: Platform,
        url: &str,
        caller: &Caller,
    ) -> ReelResult<Video> {
        let url = validate_manual_url(platform, url)?;
        self.owned_video(id, caller).await?;
        let video = self
            .mutate_video(id, |video| {
                if !matches!(
                    video.status(),
                    VideoStatus::Ready | VideoStatus::Scheduled | VideoStatus::Posted
                ) {
                    return Err(state_conflict(format!(
                        "cannot record a link for a video in status {}",
                        video.status()
                    )));
                }
                video
                    .posted_platforms_mut()
                    .upsert(PublishOutcome::manual(platform, url.clone()));
                video.set_status(VideoStatus::Posted);
                Ok(())
            })
            .await?;
        info!("Manual link recorded");
        Ok(video)
    }
}
