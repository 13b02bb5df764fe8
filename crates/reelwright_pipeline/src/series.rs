//! Series deletion and automation schedules.

use crate::lifecycle::LifecycleService;
use chrono::NaiveTime;
use reelwright_core::{AutomationId, AutomationSchedule, SeriesId};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_interface::{AutomationRepository, Caller, SeriesRepository, VideoRepository};
use serde::Serialize;
use std::io::ErrorKind;
use tracing::{debug, info, instrument, warn};

/// What a series deletion removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDeletion {
    /// Video rows deleted.
    pub videos_deleted: usize,
    /// Artifact files removed from disk.
    pub files_removed: usize,
}

fn validate_schedule(schedule: &AutomationSchedule) -> ReelResult<()> {
    if schedule.times.is_empty() {
        return Err(ReelError::new(ReelErrorKind::validation(
            "times",
            "at least one time of day is required",
        )));
    }
    if let Some(bad) = schedule
        .times
        .iter()
        .find(|t| NaiveTime::parse_from_str(t, "%H:%M").is_err())
    {
        return Err(ReelError::new(ReelErrorKind::validation(
            "times",
            format!("{bad:?} is not an HH:MM time"),
        )));
    }
    if schedule.timezone.trim().is_empty() {
        return Err(ReelError::new(ReelErrorKind::validation(
            "timezone",
            "must not be empty",
        )));
    }
    Ok(())
}

impl LifecycleService {
    /// Delete a series with its videos and their files.
    ///
    /// Files go first, then video rows, then the series. An automation bound
    /// to the series is unbound so its next trigger creates a fresh one.
    #[instrument(skip(self, caller), fields(series_id = %id, user_id = %caller.user_id))]
    pub async fn delete_series(&self, id: &SeriesId, caller: &Caller) -> ReelResult<SeriesDeletion> {
        let series = self.store.get_series(id).await?;
        caller.authorize_owner(series.user_id())?;

        let videos = self.store.list_series_videos(id).await?;
        let mut deletion = SeriesDeletion::default();
        for video in &videos {
            for artifact in video.artifact_paths() {
                let Some(path) = self.media.local_path(&artifact) else {
                    debug!(artifact = %artifact, "Skipping artifact outside media root");
                    continue;
                };
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => deletion.files_removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => warn!(path = %path.display(), error = %e, "Could not remove artifact"),
                }
            }
            self.store.delete_video(video.id()).await?;
            deletion.videos_deleted += 1;
        }

        if let Some(automation) = self.store.automation_for_series(id).await?
            && !self.store.swap_series(automation.id(), Some(id), None).await?
        {
            debug!(automation_id = %automation.id(), "Automation was rebound meanwhile");
        }
        self.store.delete_series(id).await?;
        info!(
            videos = deletion.videos_deleted,
            files = deletion.files_removed,
            "Series deleted"
        );
        Ok(deletion)
    }

    /// Replace an automation's schedule.
    ///
    /// Returns whether it changed; a change clears the last-run stamp.
    #[instrument(skip(self, schedule, caller), fields(automation_id = %id, user_id = %caller.user_id))]
    pub async fn update_schedule(
        &self,
        id: &AutomationId,
        schedule: AutomationSchedule,
        caller: &Caller,
    ) -> ReelResult<bool> {
        validate_schedule(&schedule)?;
        let automation = self.store.get_automation(id).await?;
        caller.authorize_owner(automation.user_id())?;
        let changed = self.store.replace_schedule(id, schedule).await?;
        if changed {
            info!("Schedule updated");
        }
        Ok(changed)
    }
}
