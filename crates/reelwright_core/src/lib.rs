//! Core data model and pure algorithms for Reelwright.
//!
//! This crate has no I/O. It holds:
//! - the records the orchestrator persists ([`Series`], [`Automation`], [`Video`], ...)
//! - the resumable [`Checkpoint`] of a video's generation
//! - the [`expand_scenes`] algorithm that turns narration plus audio length into timed image slots
//! - the [`ProviderResolver`] that picks a vendor per capability
//! - the [`GenerationJob`] payload handed to the external worker queue

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod checkpoint;
mod expander;
mod ids;
mod job;
mod model;
mod platform;
mod provider;
mod scene;
mod settings;
mod status;

pub use catalog::{ArtStyle, Niche, Voice};
pub use checkpoint::{AudioTrack, Checkpoint, CheckpointRecord, ImageSet, StageProgress};
pub use expander::{
    CAMERA_ANGLES, ExpandedScenes, ImageSlot, SECONDS_PER_IMAGE, camera_angle, expand_scenes,
    split_fragments, target_slot_count,
};
pub use ids::{AutomationId, CharacterId, JobId, SeriesId, UserId, VideoId};
pub use job::{GenerationJob, GenerationJobBuilder, JobMode};
pub use model::{
    Automation, AutomationBuilder, AutomationSchedule, Character, Role, ScheduleFrequency,
    Series, SeriesBuilder, SocialAccount, UserProfile, Video, VideoBuilder, stages,
};
pub use platform::{Platform, PostedPlatforms, PublishOutcome};
pub use provider::{
    Capability, DEFAULT_IMAGE_PROVIDER, DEFAULT_LLM_PROVIDER, DEFAULT_TTS_PROVIDER,
    ProviderFallbacks, ProviderOverrides, ProviderResolver, ResolvedProviders,
};
pub use scene::{Scene, Timing};
pub use settings::AdminSettings;
pub use status::VideoStatus;
