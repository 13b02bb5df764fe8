//! In-memory store and job queue.
//!
//! Everything lives in `HashMap`s behind `RwLock`s and is lost on drop. The
//! store enforces the same guarantees a SQL backend gives with a partial
//! unique index and a version column, so the lifecycle code behaves the same
//! against either.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelwright_core::{
    Automation, AutomationId, AutomationSchedule, Character, CharacterId, GenerationJob, JobId, Platform, Series,
    SeriesId, SocialAccount, UserId, UserProfile, Video, VideoId,
};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_interface::{
    AutomationRepository, CharacterRepository, JobQueue, SeriesRepository,
    SocialAccountRepository, UserRepository, VideoRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// HashMap-backed implementation of every repository trait.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    videos: Arc<RwLock<HashMap<VideoId, Video>>>,
    series: Arc<RwLock<HashMap<SeriesId, Series>>>,
    automations: Arc<RwLock<HashMap<AutomationId, Automation>>>,
    characters: Arc<RwLock<HashMap<CharacterId, Character>>>,
    accounts: Arc<RwLock<HashMap<(UserId, Platform), SocialAccount>>>,
    users: Arc<RwLock<HashMap<UserId, UserProfile>>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a character.
    pub async fn put_character(&self, character: Character) {
        self.characters
            .write()
            .await
            .insert(character.id.clone(), character);
    }

    /// Save a social account, replacing the user's previous one for that platform.
    pub async fn put_social_account(&self, account: SocialAccount) {
        self.accounts
            .write()
            .await
            .insert((account.user_id.clone(), account.platform), account);
    }

    /// Save a user profile.
    pub async fn put_user(&self, user: UserProfile) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Number of stored videos (for testing).
    pub async fn video_count(&self) -> usize {
        self.videos.read().await.len()
    }
}

fn conflicting_active<'a>(
    videos: &'a HashMap<VideoId, Video>,
    candidate: &Video,
) -> Option<&'a Video> {
    if !candidate.is_active() {
        return None;
    }
    videos
        .values()
        .find(|v| v.id() != candidate.id() && v.series_id() == candidate.series_id() && v.is_active())
}

fn in_flight_error(series_id: &SeriesId, existing: &VideoId) -> ReelError {
    ReelError::new(ReelErrorKind::StateConflict(format!(
        "series {series_id} already has video {existing} in progress"
    )))
}

#[async_trait]
impl VideoRepository for InMemoryStore {
    async fn get_video(&self, id: &VideoId) -> ReelResult<Video> {
        self.videos
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("video", id.as_str())))
    }

    async fn insert_video(&self, video: &Video) -> ReelResult<Video> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(video.id()) {
            return Err(ReelError::new(ReelErrorKind::StateConflict(format!(
                "video {} already exists",
                video.id()
            ))));
        }
        if let Some(existing) = conflicting_active(&videos, video) {
            warn!(series_id = %video.series_id(), "Rejected second in-flight video");
            return Err(in_flight_error(video.series_id(), existing.id()));
        }
        let mut stored = video.clone();
        stored.set_version(1);
        stored.touch(Utc::now());
        videos.insert(stored.id().clone(), stored.clone());
        debug!(video_id = %stored.id(), "Inserted video");
        Ok(stored)
    }

    async fn update_video(&self, video: &Video) -> ReelResult<Video> {
        let mut videos = self.videos.write().await;
        let current = videos
            .get(video.id())
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("video", video.id().as_str())))?;
        if current.version() != video.version() {
            return Err(ReelError::new(ReelErrorKind::VersionConflict {
                id: video.id().to_string(),
                expected: *video.version(),
                found: *current.version(),
            }));
        }
        if let Some(existing) = conflicting_active(&videos, video) {
            return Err(in_flight_error(video.series_id(), existing.id()));
        }
        let mut stored = video.clone();
        stored.set_version(video.version() + 1);
        stored.touch(Utc::now());
        videos.insert(stored.id().clone(), stored.clone());
        Ok(stored)
    }

    async fn delete_video(&self, id: &VideoId) -> ReelResult<()> {
        self.videos.write().await.remove(id);
        Ok(())
    }

    async fn list_series_videos(&self, series_id: &SeriesId) -> ReelResult<Vec<Video>> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.series_id() == series_id)
            .cloned()
            .collect();
        videos.sort_by_key(|v| *v.created_at());
        Ok(videos)
    }

    async fn active_video(&self, series_id: &SeriesId) -> ReelResult<Option<Video>> {
        Ok(self
            .videos
            .read()
            .await
            .values()
            .find(|v| v.series_id() == series_id && v.is_active())
            .cloned())
    }
}

#[async_trait]
impl SeriesRepository for InMemoryStore {
    async fn get_series(&self, id: &SeriesId) -> ReelResult<Series> {
        self.series
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("series", id.as_str())))
    }

    async fn insert_series(&self, series: &Series) -> ReelResult<()> {
        self.series
            .write()
            .await
            .insert(series.id().clone(), series.clone());
        Ok(())
    }

    async fn delete_series(&self, id: &SeriesId) -> ReelResult<()> {
        self.series.write().await.remove(id);
        Ok(())
    }
}

#[async_trait]
impl AutomationRepository for InMemoryStore {
    async fn get_automation(&self, id: &AutomationId) -> ReelResult<Automation> {
        self.automations
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("automation", id.as_str())))
    }

    async fn save_automation(&self, automation: &Automation) -> ReelResult<()> {
        self.automations
            .write()
            .await
            .insert(automation.id().clone(), automation.clone());
        Ok(())
    }

    async fn automation_for_series(&self, series_id: &SeriesId) -> ReelResult<Option<Automation>> {
        Ok(self
            .automations
            .read()
            .await
            .values()
            .find(|a| a.series_id().as_ref() == Some(series_id))
            .cloned())
    }

    async fn swap_series(
        &self,
        id: &AutomationId,
        expected: Option<&SeriesId>,
        series_id: Option<&SeriesId>,
    ) -> ReelResult<bool> {
        let mut automations = self.automations.write().await;
        let automation = automations
            .get_mut(id)
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("automation", id.as_str())))?;
        if automation.series_id().as_ref() != expected {
            debug!(automation_id = %id, "Series binding changed concurrently");
            return Ok(false);
        }
        match series_id {
            Some(series_id) => automation.bind_series(series_id.clone()),
            None => automation.unbind_series(),
        }
        Ok(true)
    }

    async fn record_run(&self, id: &AutomationId, at: DateTime<Utc>) -> ReelResult<()> {
        self.automations
            .write()
            .await
            .get_mut(id)
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("automation", id.as_str())))?
            .mark_run(at);
        Ok(())
    }

    async fn replace_schedule(
        &self,
        id: &AutomationId,
        schedule: AutomationSchedule,
    ) -> ReelResult<bool> {
        Ok(self
            .automations
            .write()
            .await
            .get_mut(id)
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("automation", id.as_str())))?
            .update_schedule(schedule))
    }
}

#[async_trait]
impl CharacterRepository for InMemoryStore {
    async fn get_character(&self, id: &CharacterId) -> ReelResult<Character> {
        self.characters
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("character", id.as_str())))
    }
}

#[async_trait]
impl SocialAccountRepository for InMemoryStore {
    async fn social_account(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> ReelResult<Option<SocialAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .get(&(user_id.clone(), platform))
            .cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_user(&self, id: &UserId) -> ReelResult<UserProfile> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ReelError::new(ReelErrorKind::not_found("user", id.as_str())))
    }
}

/// Job queue that records submissions instead of running them.
#[derive(Debug, Clone)]
pub struct InMemoryJobQueue {
    jobs: Arc<RwLock<Vec<(JobId, GenerationJob)>>>,
    available: Arc<AtomicBool>,
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl InMemoryJobQueue {
    /// Empty, accepting queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make later submissions fail (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Submitted jobs in order.
    pub async fn jobs(&self) -> Vec<GenerationJob> {
        self.jobs
            .read()
            .await
            .iter()
            .map(|(_, job)| job.clone())
            .collect()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn submit(&self, job: GenerationJob) -> ReelResult<JobId> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(ReelError::new(ReelErrorKind::Queue(
                "queue is not accepting jobs".to_string(),
            )));
        }
        let id = JobId::generate();
        debug!(job_id = %id, video_id = %job.video_id(), mode = ?job.mode(), "Job queued");
        self.jobs.write().await.push((id.clone(), job));
        Ok(id)
    }
}
