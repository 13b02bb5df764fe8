//! Persistence seams.
//!
//! The data store is external. These traits name the operations the
//! orchestrator needs, including the two concurrency guarantees it relies on:
//!
//! - **Single in-flight per series.** [`VideoRepository::insert_video`] and
//!   [`VideoRepository::update_video`] reject any write that would leave two
//!   videos of one series in QUEUED/GENERATING, with a state conflict. A SQL
//!   backend implements this as a partial unique index on
//!   `(series_id) WHERE status IN ('QUEUED','GENERATING')`.
//! - **Optimistic versioning.** [`VideoRepository::update_video`] succeeds only
//!   if the stored version equals the caller's copy, then bumps it.
//! - **Field-level automation writes.** Triggers and schedule edits touch
//!   disjoint automation fields. [`AutomationRepository::swap_series`] is a
//!   compare-and-swap on the series binding, so concurrent first triggers
//!   agree on one series. A SQL backend runs
//!   `UPDATE ... SET series_id = $new WHERE id = $id AND series_id IS NOT DISTINCT FROM $expected`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelwright_core::{
    Automation, AutomationId, AutomationSchedule, Character, CharacterId, Platform, Series, SeriesId, SocialAccount,
    UserId, UserProfile, Video, VideoId,
};
use reelwright_error::ReelResult;

/// Video rows.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Load a video.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no such video exists.
    async fn get_video(&self, id: &VideoId) -> ReelResult<Video>;

    /// Insert a new video.
    ///
    /// # Errors
    ///
    /// Returns a state conflict if the video is active and its series already
    /// has an active video.
    async fn insert_video(&self, video: &Video) -> ReelResult<Video>;

    /// Write a modified video and return the stored copy with its new version.
    ///
    /// # Errors
    ///
    /// Returns a version conflict if the row changed since `video` was read,
    /// or a state conflict if the write would break the single-in-flight rule.
    async fn update_video(&self, video: &Video) -> ReelResult<Video>;

    /// Delete a video row.
    async fn delete_video(&self, id: &VideoId) -> ReelResult<()>;

    /// Every video of a series, oldest first.
    async fn list_series_videos(&self, series_id: &SeriesId) -> ReelResult<Vec<Video>>;

    /// The QUEUED/GENERATING video of a series, if any.
    async fn active_video(&self, series_id: &SeriesId) -> ReelResult<Option<Video>>;
}

/// Series rows.
#[async_trait]
pub trait SeriesRepository: Send + Sync {
    /// Load a series.
    async fn get_series(&self, id: &SeriesId) -> ReelResult<Series>;

    /// Insert a series.
    async fn insert_series(&self, series: &Series) -> ReelResult<()>;

    /// Delete a series row (videos are removed separately).
    async fn delete_series(&self, id: &SeriesId) -> ReelResult<()>;
}

/// Automation rows.
#[async_trait]
pub trait AutomationRepository: Send + Sync {
    /// Load an automation.
    async fn get_automation(&self, id: &AutomationId) -> ReelResult<Automation>;

    /// Insert or replace an automation.
    async fn save_automation(&self, automation: &Automation) -> ReelResult<()>;

    /// The automation bound to a series, if any.
    async fn automation_for_series(&self, series_id: &SeriesId) -> ReelResult<Option<Automation>>;

    /// Rebind the automation to `series_id` if it is still bound to `expected`.
    ///
    /// Returns `false`, leaving the row untouched, when another writer changed
    /// the binding first.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no such automation exists.
    async fn swap_series(
        &self,
        id: &AutomationId,
        expected: Option<&SeriesId>,
        series_id: Option<&SeriesId>,
    ) -> ReelResult<bool>;

    /// Stamp `last_run_at` without touching any other field.
    async fn record_run(&self, id: &AutomationId, at: DateTime<Utc>) -> ReelResult<()>;

    /// Replace the schedule in place, clearing `last_run_at` on a change.
    ///
    /// Returns whether the schedule changed.
    async fn replace_schedule(
        &self,
        id: &AutomationId,
        schedule: AutomationSchedule,
    ) -> ReelResult<bool>;
}

/// Character rows.
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Load a character.
    async fn get_character(&self, id: &CharacterId) -> ReelResult<Character>;
}

/// Connected social accounts.
#[async_trait]
pub trait SocialAccountRepository: Send + Sync {
    /// The user's credential for a platform, if connected.
    async fn social_account(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> ReelResult<Option<SocialAccount>>;
}

/// User profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load a user's profile.
    async fn get_user(&self, id: &UserId) -> ReelResult<UserProfile>;
}

/// Every repository the orchestrator needs, behind one handle.
pub trait Store:
    VideoRepository
    + SeriesRepository
    + AutomationRepository
    + CharacterRepository
    + SocialAccountRepository
    + UserRepository
{
}

impl<T> Store for T where
    T: VideoRepository
        + SeriesRepository
        + AutomationRepository
        + CharacterRepository
        + SocialAccountRepository
        + UserRepository
{
}
