//! Video lifecycle state machine.
//!
//! ```text
//! QUEUED → GENERATING → REVIEW → GENERATING → READY → POSTED
//!    └──────────┴──→ FAILED (stop, or a worker failure)
//! ```
//!
//! Every mutation is a read-modify-write of the whole video row guarded by
//! its version. On a version conflict the row is reloaded and the change
//! re-applied, including its state checks, so concurrent edits serialize
//! instead of overwriting each other.

use crate::{JobInputs, JobPlanner, MediaConfig};
use reelwright_core::{
    Capability, GenerationJob, ImageSet, JobId, JobMode, Series, Video, VideoId, VideoStatus, stages,
};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_interface::{
    Caller, GeneratedScript, ImageRequestBuilder, JobQueue, ProviderRegistry, ScriptParamsBuilder,
    SeriesRepository, SettingsSource, Store, VideoRepository,
};
use reelwright_social::PublishOrchestrator;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Versioned writes give up after this many conflicts.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// A video handed to the worker queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// The video as stored after the transition.
    pub video: Video,
    /// Queue-assigned job id.
    pub job_id: JobId,
}

pub(crate) fn state_conflict(message: impl Into<String>) -> ReelError {
    ReelError::new(ReelErrorKind::StateConflict(message.into()))
}

fn ensure_status(video: &Video, allowed: &[VideoStatus], action: &str) -> ReelResult<()> {
    if allowed.contains(video.status()) {
        Ok(())
    } else {
        Err(state_conflict(format!(
            "cannot {action} a video in status {}",
            video.status()
        )))
    }
}

fn ensure_retryable(video: &Video) -> ReelResult<()> {
    if video.status().can_retry() {
        Ok(())
    } else {
        Err(state_conflict(format!(
            "only FAILED or QUEUED videos can be retried (status is {})",
            video.status()
        )))
    }
}

/// Orchestrates every user-driven transition of a video.
#[derive(Clone)]
pub struct LifecycleService {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) queue: Arc<dyn JobQueue>,
    pub(crate) planner: JobPlanner,
    pub(crate) providers: Arc<ProviderRegistry>,
    pub(crate) publisher: Arc<PublishOrchestrator>,
    pub(crate) settings: Arc<dyn SettingsSource>,
    pub(crate) media: MediaConfig,
}

impl LifecycleService {
    /// Service over the given collaborators.
    pub fn new(
        store: Arc<dyn Store>,
        queue: Arc<dyn JobQueue>,
        planner: JobPlanner,
        providers: Arc<ProviderRegistry>,
        publisher: Arc<PublishOrchestrator>,
        settings: Arc<dyn SettingsSource>,
        media: MediaConfig,
    ) -> Self {
        Self {
            store,
            queue,
            planner,
            providers,
            publisher,
            settings,
            media,
        }
    }

    /// Load a video the caller may act on.
    pub(crate) async fn owned_video(&self, id: &VideoId, caller: &Caller) -> ReelResult<Video> {
        let video = self.store.get_video(id).await?;
        caller.authorize_owner(video.user_id())?;
        Ok(video)
    }

    /// Reload, apply and write back, retrying on version conflicts.
    pub(crate) async fn mutate_video<F>(&self, id: &VideoId, mut apply: F) -> ReelResult<Video>
    where
        F: FnMut(&mut Video) -> ReelResult<()>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut video = self.store.get_video(id).await?;
            apply(&mut video)?;
            match self.store.update_video(&video).await {
                Err(e)
                    if matches!(e.kind(), ReelErrorKind::VersionConflict { .. })
                        && attempt < MAX_WRITE_ATTEMPTS =>
                {
                    warn!(video_id = %id, attempt, "Version conflict, reapplying change");
                }
                result => return result,
            }
        }
    }

    /// Submit a job; if the queue refuses, fail the video so it does not block its series.
    pub(crate) async fn submit(&self, video: &Video, job: GenerationJob) -> ReelResult<JobId> {
        match self.queue.submit(job).await {
            Ok(job_id) => {
                info!(video_id = %video.id(), job_id = %job_id, "Job submitted");
                Ok(job_id)
            }
            Err(e) => {
                error!(video_id = %video.id(), error = %e, "Job submission failed");
                let message = format!("Could not queue generation: {}", e.public_message());
                let marked = self
                    .mutate_video(video.id(), |v| {
                        v.set_status(VideoStatus::Failed);
                        v.set_generation_stage(None);
                        v.set_error_message(Some(message.clone()));
                        Ok(())
                    })
                    .await;
                if let Err(mark_err) = marked {
                    error!(video_id = %video.id(), error = %mark_err, "Could not mark video failed");
                }
                Err(e)
            }
        }
    }

    /// Read a video.
    #[instrument(skip(self, caller), fields(video_id = %id, user_id = %caller.user_id))]
    pub async fn get_video(&self, id: &VideoId, caller: &Caller) -> ReelResult<Video> {
        self.owned_video(id, caller).await
    }

    /// Whether a worker should abandon `id` instead of writing back.
    ///
    /// True after a user stop, and for videos deleted since the job started.
    #[instrument(skip(self), fields(video_id = %id))]
    pub async fn is_cancelled(&self, id: &VideoId) -> ReelResult<bool> {
        match self.store.get_video(id).await {
            Ok(video) => Ok(video.was_stopped_by_user()),
            Err(e) if matches!(e.kind(), ReelErrorKind::NotFound { .. }) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Force an in-flight video to FAILED.
    ///
    /// In-flight provider calls are not interrupted; the worker is expected to
    /// check [`LifecycleService::is_cancelled`] before writing back.
    #[instrument(skip(self, caller), fields(video_id = %id, user_id = %caller.user_id))]
    pub async fn stop(&self, id: &VideoId, caller: &Caller) -> ReelResult<Video> {
        self.owned_video(id, caller).await?;
        let video = self
            .mutate_video(id, |video| {
                ensure_status(video, &[VideoStatus::Queued, VideoStatus::Generating], "stop")?;
                video.set_status(VideoStatus::Failed);
                video.set_generation_stage(None);
                video.set_error_message(Some(Video::STOPPED_BY_USER.to_string()));
                Ok(())
            })
            .await?;
        info!("Video stopped by user");
        Ok(video)
    }

    async fn generate_script(&self, series: &Series) -> ReelResult<GeneratedScript> {
        let providers = self
            .planner
            .resolve_providers(series.user_id(), series.providers())
            .await?;
        let params = ScriptParamsBuilder::default()
            .niche(self.planner.niche(series))
            .tone(series.tone().clone())
            .language(series.language().clone())
            .target_duration_secs(*series.target_duration_secs())
            .character_prompt(
                self.planner
                    .character_prompt(series.character_id().as_ref())
                    .await?,
            )
            .build()
            .map_err(|e| ReelError::new(ReelErrorKind::Builder(e.to_string())))?;
        self.providers
            .generate_script(providers.get(Capability::Llm), &params)
            .await
    }

    /// Re-queue a FAILED or QUEUED video.
    ///
    /// Persisted scenes are reused; the script is only regenerated when none
    /// exist. Error, stage and checkpoint are cleared before re-enqueueing.
    #[instrument(skip(self, caller), fields(video_id = %id, user_id = %caller.user_id))]
    pub async fn retry(&self, id: &VideoId, caller: &Caller) -> ReelResult<Submission> {
        let video = self.owned_video(id, caller).await?;
        ensure_retryable(&video)?;
        let series = self.store.get_series(video.series_id()).await?;

        let script = if video.scenes().is_empty() {
            info!("No persisted scenes, regenerating script");
            Some(self.generate_script(&series).await?)
        } else {
            debug!(scenes = video.scenes().len(), "Reusing persisted scenes");
            None
        };

        let requeue = |video: &mut Video| -> ReelResult<()> {
            ensure_retryable(video)?;
            if let Some(script) = &script {
                video.set_script(
                    script.title.clone(),
                    script.full_script.clone(),
                    script.scenes.clone(),
                );
            }
            video.set_status(VideoStatus::Queued);
            video.set_generation_stage(None);
            video.set_error_message(None);
            video.set_checkpoint(None);
            Ok(())
        };

        let mut projected = video.clone();
        requeue(&mut projected)?;
        let job = self
            .planner
            .plan(&series, &projected, JobInputs::from_series(&series))
            .await?;

        let video = self.mutate_video(id, &requeue).await?;
        let job_id = self.submit(&video, job).await?;
        Ok(Submission { video, job_id })
    }

    /// Approve a reviewed video for final assembly.
    ///
    /// `scene_indices` optionally keeps a subset of image slots.
    #[instrument(skip(self, caller), fields(video_id = %id, user_id = %caller.user_id))]
    pub async fn assemble(
        &self,
        id: &VideoId,
        scene_indices: Option<Vec<usize>>,
        caller: &Caller,
    ) -> ReelResult<Submission> {
        let video = self.owned_video(id, caller).await?;
        ensure_status(&video, &[VideoStatus::Review], "assemble")?;
        let series = self.store.get_series(video.series_id()).await?;

        let approve = |video: &mut Video| -> ReelResult<()> {
            ensure_status(video, &[VideoStatus::Review], "assemble")?;
            let checkpoint = video
                .checkpoint()
                .clone()
                .ok_or_else(|| state_conflict("video has no checkpoint to assemble"))?;
            let checkpoint = checkpoint.into_assembly(scene_indices.as_deref())?;
            video.set_checkpoint(Some(checkpoint));
            video.set_status(VideoStatus::Generating);
            video.set_generation_stage(Some(stages::ASSEMBLY.to_string()));
            video.set_error_message(None);
            Ok(())
        };

        let mut projected = video.clone();
        approve(&mut projected)?;
        let inputs = JobInputs {
            mode: JobMode::Assemble,
            checkpoint: projected.checkpoint().clone(),
            ..JobInputs::from_series(&series)
        };
        let job = self.planner.plan(&series, &projected, inputs).await?;

        let video = self.mutate_video(id, &approve).await?;
        let job_id = self.submit(&video, job).await?;
        Ok(Submission { video, job_id })
    }

    /// Replace one image of a reviewed video.
    #[instrument(skip(self, prompt, caller), fields(video_id = %id, user_id = %caller.user_id))]
    pub async fn regenerate_image(
        &self,
        id: &VideoId,
        index: usize,
        prompt: &str,
        caller: &Caller,
    ) -> ReelResult<Video> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ReelError::new(ReelErrorKind::validation(
                "prompt",
                "must not be empty",
            )));
        }
        let video = self.owned_video(id, caller).await?;
        ensure_status(&video, &[VideoStatus::Review], "regenerate images of")?;
        let slots = video
            .checkpoint()
            .as_ref()
            .and_then(|c| c.images())
            .map(ImageSet::len)
            .ok_or_else(|| state_conflict("video has no images to regenerate"))?;
        if index >= slots {
            return Err(ReelError::new(ReelErrorKind::validation(
                "index",
                format!("{index} out of range (0..{slots})"),
            )));
        }

        let series = self.store.get_series(video.series_id()).await?;
        let providers = self
            .planner
            .resolve_providers(series.user_id(), series.providers())
            .await?;
        let (style_modifier, negative_prompt) = self.planner.style(&series)?;
        let request = ImageRequestBuilder::default()
            .prompts(vec![prompt.to_string()])
            .style_modifier(style_modifier)
            .negative_prompt(negative_prompt)
            .build()
            .map_err(|e| ReelError::new(ReelErrorKind::Builder(e.to_string())))?;
        let provider = providers.get(Capability::Image);
        let path = self
            .providers
            .generate_images(provider, &request)
            .await?
            .image_paths
            .into_iter()
            .next()
            .ok_or_else(|| {
                ReelError::new(ReelErrorKind::Provider {
                    provider: provider.to_string(),
                    message: "image generation returned no images".to_string(),
                })
            })?;

        let video = self
            .mutate_video(id, |video| {
                ensure_status(video, &[VideoStatus::Review], "regenerate images of")?;
                let mut checkpoint = video
                    .take_checkpoint()
                    .ok_or_else(|| state_conflict("video has no images to regenerate"))?;
                checkpoint.replace_image(index, path.clone(), prompt)?;
                video.set_checkpoint(Some(checkpoint));
                Ok(())
            })
            .await?;
        info!(index, "Image regenerated");
        Ok(video)
    }

    /// Provider ids users may pick for a capability.
    ///
    /// Candidates are the registered providers plus the admin-enabled and
    /// fallback ids, filtered by the admin-enabled set.
    #[instrument(skip(self))]
    pub async fn provider_choices(&self, capability: Capability) -> ReelResult<Vec<String>> {
        let settings = self.settings.load().await?;
        let mut candidates: BTreeSet<String> =
            self.providers.provider_ids(capability).into_iter().collect();
        candidates.extend(settings.enabled(capability));
        candidates.insert(
            self.planner
                .resolver()
                .fallbacks()
                .get(capability)
                .to_string(),
        );
        Ok(settings.selectable(capability, candidates.iter().map(String::as_str)))
    }
}
