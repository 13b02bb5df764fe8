//! Persisted records.

use crate::{
    AutomationId, Checkpoint, CharacterId, Platform, PostedPlatforms, ProviderOverrides, Scene,
    SeriesId, UserId, VideoId, VideoStatus,
};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Labels written to [`Video::generation_stage`].
pub mod stages {
    /// Script generation.
    pub const SCRIPT: &str = "SCRIPT";
    /// Voice synthesis.
    pub const VOICE: &str = "VOICE";
    /// Image generation.
    pub const IMAGES: &str = "IMAGES";
    /// Human review of generated images.
    pub const REVIEW: &str = "REVIEW";
    /// Final assembly of the video file.
    pub const ASSEMBLY: &str = "ASSEMBLY";
}

/// Caller privilege level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    /// Regular account.
    #[default]
    User,
    /// May act on any user's records.
    Admin,
}

/// A user's saved preferences relevant to generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account id.
    pub id: UserId,
    /// Privilege level.
    #[serde(default)]
    pub role: Role,
    /// Subscription plan name.
    #[serde(default)]
    pub plan: String,
    /// Saved default provider per capability.
    #[serde(default)]
    pub provider_defaults: ProviderOverrides,
}

/// A channel configuration that groups videos.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct Series {
    /// Record id.
    #[builder(default = "SeriesId::generate()")]
    id: SeriesId,
    /// Owner.
    user_id: UserId,
    /// Display name.
    name: String,
    /// Niche lookup id.
    niche_id: String,
    /// Art style lookup id.
    art_style_id: String,
    /// Voice lookup id.
    voice_id: String,
    /// Narration tone.
    #[builder(default = "\"neutral\".to_string()")]
    tone: String,
    /// Narration language.
    #[builder(default = "\"en\".to_string()")]
    language: String,
    /// Stored provider overrides.
    #[builder(default)]
    #[serde(default)]
    providers: ProviderOverrides,
    /// Bound character, referenced by id.
    #[builder(default)]
    #[serde(default)]
    character_id: Option<CharacterId>,
    /// Background music.
    #[builder(default)]
    #[serde(default)]
    music_path: Option<String>,
    /// Target video length in seconds.
    #[builder(default = "60")]
    target_duration_secs: u32,
    /// Creation time.
    #[builder(default = "Utc::now()")]
    created_at: DateTime<Utc>,
}

impl Series {
    /// Start building a series.
    pub fn builder() -> SeriesBuilder {
        SeriesBuilder::default()
    }
}

/// How often an automation fires.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ScheduleFrequency {
    /// Every day at each listed time.
    #[default]
    Daily,
    /// Every second day.
    EveryOtherDay,
    /// Once a week.
    Weekly,
}

/// When an automation fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationSchedule {
    /// Repeat frequency.
    #[serde(default)]
    pub frequency: ScheduleFrequency,
    /// `HH:MM` times of day.
    #[serde(default)]
    pub times: Vec<String>,
    /// IANA timezone name.
    pub timezone: String,
    /// Whether the external scheduler should fire it.
    #[serde(default)]
    pub enabled: bool,
}

impl Default for AutomationSchedule {
    fn default() -> Self {
        Self {
            frequency: ScheduleFrequency::Daily,
            times: vec!["09:00".to_string()],
            timezone: "UTC".to_string(),
            enabled: false,
        }
    }
}

/// A recurring-generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct Automation {
    /// Record id.
    #[builder(default = "AutomationId::generate()")]
    id: AutomationId,
    /// Owner.
    user_id: UserId,
    /// Display name.
    name: String,
    /// Series created on first trigger.
    #[builder(default)]
    #[serde(default)]
    series_id: Option<SeriesId>,
    /// Niche lookup id.
    niche_id: String,
    /// Art style lookup id.
    art_style_id: String,
    /// Voice lookup id.
    voice_id: String,
    /// Narration tone.
    #[builder(default = "\"neutral\".to_string()")]
    tone: String,
    /// Narration language.
    #[builder(default = "\"en\".to_string()")]
    language: String,
    /// Stored provider overrides.
    #[builder(default)]
    #[serde(default)]
    providers: ProviderOverrides,
    /// Bound character.
    #[builder(default)]
    #[serde(default)]
    character_id: Option<CharacterId>,
    /// Background music.
    #[builder(default)]
    #[serde(default)]
    music_path: Option<String>,
    /// Target video length in seconds.
    #[builder(default = "60")]
    target_duration_secs: u32,
    /// Platforms to publish to.
    #[builder(default)]
    #[serde(default)]
    target_platforms: Vec<Platform>,
    /// Firing schedule.
    #[builder(default)]
    #[serde(default)]
    schedule: AutomationSchedule,
    /// Last successful trigger.
    #[builder(default)]
    #[serde(default)]
    last_run_at: Option<DateTime<Utc>>,
}

impl Automation {
    /// Start building an automation.
    pub fn builder() -> AutomationBuilder {
        AutomationBuilder::default()
    }

    /// Bind the lazily created series.
    pub fn bind_series(&mut self, series_id: SeriesId) {
        self.series_id = Some(series_id);
    }

    /// Forget the bound series (it was deleted).
    pub fn unbind_series(&mut self) {
        self.series_id = None;
    }

    /// Stamp a successful trigger.
    pub fn mark_run(&mut self, at: DateTime<Utc>) {
        self.last_run_at = Some(at);
    }

    /// Replace the schedule. Any change clears `last_run_at` so the next
    /// scheduler pass is not skipped. Returns whether anything changed.
    pub fn update_schedule(&mut self, schedule: AutomationSchedule) -> bool {
        if self.schedule == schedule {
            return false;
        }
        self.schedule = schedule;
        self.last_run_at = None;
        true
    }

    /// Build the series this automation generates into.
    pub fn new_series(&self) -> Series {
        Series {
            id: SeriesId::generate(),
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            niche_id: self.niche_id.clone(),
            art_style_id: self.art_style_id.clone(),
            voice_id: self.voice_id.clone(),
            tone: self.tone.clone(),
            language: self.language.clone(),
            providers: self.providers.clone(),
            character_id: self.character_id.clone(),
            music_path: self.music_path.clone(),
            target_duration_secs: self.target_duration_secs,
            created_at: Utc::now(),
        }
    }
}

/// A reusable subject description kept consistent across videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Record id.
    pub id: CharacterId,
    /// Owner.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Visual and personality description.
    pub description: String,
}

impl Character {
    /// Text injected into generation prompts.
    pub fn prompt(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }
}

/// A connected social platform credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    /// Owner.
    pub user_id: UserId,
    /// Platform the credential is for.
    pub platform: Platform,
    /// Access token acquired by the external OAuth flow.
    pub access_token: String,
    /// Token expiry, when known.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Page, channel or business account id the token publishes as.
    pub account_id: String,
    /// Display identity.
    #[serde(default)]
    pub display_name: String,
}

impl SocialAccount {
    /// Whether the token is past its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// The unit of work: one generation job and its resulting artifact.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct Video {
    /// Record id.
    #[builder(default = "VideoId::generate()")]
    id: VideoId,
    /// Owning series.
    series_id: SeriesId,
    /// Owner.
    user_id: UserId,
    /// Lifecycle status.
    #[builder(default = "VideoStatus::Queued")]
    status: VideoStatus,
    /// Progress label while generating.
    #[builder(default)]
    #[serde(default)]
    generation_stage: Option<String>,
    /// Resumable progress.
    #[builder(default)]
    #[serde(default, rename = "checkpointData")]
    checkpoint: Option<Checkpoint>,
    /// Full narration script.
    #[builder(default)]
    #[serde(default)]
    script_text: Option<String>,
    /// Video title.
    #[builder(default)]
    #[serde(default)]
    title: Option<String>,
    /// Persisted scenes, reused on retry.
    #[builder(default)]
    #[serde(default, rename = "scenesJson")]
    scenes: Vec<Scene>,
    /// Target length in seconds.
    #[builder(default = "60")]
    target_duration_secs: u32,
    /// Assembled file location.
    #[builder(default)]
    #[serde(default)]
    video_url: Option<String>,
    /// Per-platform publish outcomes.
    #[builder(default)]
    #[serde(default)]
    posted_platforms: PostedPlatforms,
    /// Failure description.
    #[builder(default)]
    #[serde(default)]
    error_message: Option<String>,
    /// Optimistic concurrency version, bumped by the store on every write.
    #[builder(default)]
    #[serde(default)]
    version: u64,
    /// Creation time.
    #[builder(default = "Utc::now()")]
    created_at: DateTime<Utc>,
    /// Last write time.
    #[builder(default = "Utc::now()")]
    updated_at: DateTime<Utc>,
}

impl Video {
    /// Start building a video.
    pub fn builder() -> VideoBuilder {
        VideoBuilder::default()
    }

    /// Message recorded for user-initiated stops.
    pub const STOPPED_BY_USER: &'static str = "Stopped by user";

    /// Whether the video holds a QUEUED or GENERATING slot in its series.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether the FAILED state came from a user stop rather than a pipeline failure.
    pub fn was_stopped_by_user(&self) -> bool {
        self.status == VideoStatus::Failed
            && self.error_message.as_deref() == Some(Self::STOPPED_BY_USER)
    }

    /// Set status.
    pub fn set_status(&mut self, status: VideoStatus) {
        self.status = status;
    }

    /// Set or clear the progress label.
    pub fn set_generation_stage(&mut self, stage: Option<String>) {
        self.generation_stage = stage;
    }

    /// Set or clear the failure message.
    pub fn set_error_message(&mut self, message: Option<String>) {
        self.error_message = message;
    }

    /// Replace the checkpoint.
    pub fn set_checkpoint(&mut self, checkpoint: Option<Checkpoint>) {
        self.checkpoint = checkpoint;
    }

    /// Take the checkpoint out for a read-modify-write.
    pub fn take_checkpoint(&mut self) -> Option<Checkpoint> {
        self.checkpoint.take()
    }

    /// Persist a generated script.
    pub fn set_script(&mut self, title: String, script_text: String, scenes: Vec<Scene>) {
        self.title = Some(title);
        self.script_text = Some(script_text);
        self.scenes = scenes;
    }

    /// Record the assembled file.
    pub fn set_video_url(&mut self, url: Option<String>) {
        self.video_url = url;
    }

    /// Mutable publish outcomes.
    pub fn posted_platforms_mut(&mut self) -> &mut PostedPlatforms {
        &mut self.posted_platforms
    }

    /// Set the stored version. Used by repositories only.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Stamp the last write time.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    /// Every artifact path the video references on disk.
    pub fn artifact_paths(&self) -> Vec<String> {
        let mut paths = self
            .checkpoint
            .as_ref()
            .map(Checkpoint::artifact_paths)
            .unwrap_or_default();
        if let Some(url) = &self.video_url
            && !url.contains("://")
        {
            paths.push(url.clone());
        }
        paths
    }
}
