//! Automation trigger: one firing of a recurring configuration.

use crate::JobInputs;
use crate::lifecycle::{LifecycleService, MAX_WRITE_ATTEMPTS, state_conflict};
use chrono::Utc;
use reelwright_core::{Automation, AutomationId, JobId, Series, SeriesId, Video, VideoStatus};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_interface::{AutomationRepository, Caller, SeriesRepository, VideoRepository};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Result of a successful trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOutcome {
    /// The queued video.
    pub video: Video,
    /// Series the video belongs to.
    pub series_id: SeriesId,
    /// Queue-assigned job id.
    pub job_id: JobId,
}

/// Fires automations. Called by the external scheduler or a user.
#[derive(Clone)]
pub struct AutomationTrigger {
    lifecycle: LifecycleService,
}

impl AutomationTrigger {
    /// Trigger sharing the lifecycle's collaborators.
    pub fn new(lifecycle: LifecycleService) -> Self {
        Self { lifecycle }
    }

    /// The automation's series, created and bound on first use or after deletion.
    ///
    /// The binding is a compare-and-swap. A trigger that loses the race drops
    /// the series it created and follows the winner's.
    async fn ensure_series(&self, automation: &Automation) -> ReelResult<Series> {
        let store = &self.lifecycle.store;
        let mut bound = automation.series_id().clone();
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            if let Some(series_id) = &bound {
                match store.get_series(series_id).await {
                    Ok(series) => return Ok(series),
                    Err(e) if matches!(e.kind(), ReelErrorKind::NotFound { .. }) => {
                        info!(series_id = %series_id, "Bound series is gone, creating a new one");
                    }
                    Err(e) => return Err(e),
                }
            }
            let series = automation.new_series();
            store.insert_series(&series).await?;
            if store
                .swap_series(automation.id(), bound.as_ref(), Some(series.id()))
                .await?
            {
                info!(series_id = %series.id(), "Series created for automation");
                return Ok(series);
            }
            store.delete_series(series.id()).await?;
            bound = store.get_automation(automation.id()).await?.series_id().clone();
            debug!(attempt, bound = ?bound, "Lost series binding race, following the winner");
        }
        Err(state_conflict("automation series binding kept changing"))
    }

    /// Queue a new video for `id`.
    ///
    /// Fails with a state conflict while the series already has a QUEUED or
    /// GENERATING video; the store re-checks on insert so concurrent triggers
    /// cannot both succeed. `last_run_at` is stamped only after the job is
    /// accepted by the queue, and no other automation field is written back.
    #[instrument(skip(self, caller), fields(automation_id = %id, user_id = %caller.user_id))]
    pub async fn trigger(&self, id: &AutomationId, caller: &Caller) -> ReelResult<TriggerOutcome> {
        let store = &self.lifecycle.store;
        let automation = store.get_automation(id).await?;
        caller.authorize_owner(automation.user_id())?;

        let series = self.ensure_series(&automation).await?;
        if let Some(active) = store.active_video(series.id()).await? {
            return Err(state_conflict(format!(
                "series already has video {} in progress",
                active.id()
            )));
        }

        let video = Video::builder()
            .series_id(series.id().clone())
            .user_id(series.user_id().clone())
            .status(VideoStatus::Queued)
            .target_duration_secs(*automation.target_duration_secs())
            .build()
            .map_err(|e| ReelError::new(ReelErrorKind::Builder(e.to_string())))?;
        let inputs = JobInputs {
            overrides: automation.providers().clone(),
            character_id: automation.character_id().clone(),
            music_path: automation.music_path().clone(),
            ..JobInputs::default()
        };
        let job = self.lifecycle.planner.plan(&series, &video, inputs).await?;

        let video = store.insert_video(&video).await?;
        let job_id = self.lifecycle.submit(&video, job).await?;

        store.record_run(automation.id(), Utc::now()).await?;
        info!(video_id = %video.id(), job_id = %job_id, "Automation triggered");
        Ok(TriggerOutcome {
            video,
            series_id: series.id().clone(),
            job_id,
        })
    }
}
