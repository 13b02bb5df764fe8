//! Payload submitted to the external worker queue.

use crate::{Checkpoint, ResolvedProviders, Scene, SeriesId, UserId, VideoId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// What the worker should do with the job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobMode {
    /// Run the pipeline from the first unfinished stage.
    #[default]
    Generate,
    /// Assemble the final file from an approved checkpoint.
    Assemble,
}

/// Fully resolved description of a generation job.
///
/// Workers get everything they need from this payload; they never look up
/// providers, styles or characters themselves.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct GenerationJob {
    /// Video to produce.
    video_id: VideoId,
    /// Owning series.
    series_id: SeriesId,
    /// Owner, for quota and storage namespacing.
    user_id: UserId,
    /// Pipeline mode.
    #[builder(default)]
    mode: JobMode,
    /// Provider per capability, resolved at submission time.
    providers: ResolvedProviders,
    /// Appended to image prompts.
    style_prompt_modifier: String,
    /// Sent as the image negative prompt.
    #[builder(default)]
    negative_prompt: String,
    /// Narration tone.
    tone: String,
    /// Niche name and context.
    niche: String,
    /// TTS voice id.
    voice_id: String,
    /// Narration language.
    language: String,
    /// Target length in seconds.
    target_duration_secs: u32,
    /// Background music.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    music_path: Option<String>,
    /// Bound character description.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    character_prompt: Option<String>,
    /// Pre-supplied scenes; the script stage is skipped when present.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scenes: Option<Vec<Scene>>,
    /// Pre-supplied script text.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    script: Option<String>,
    /// Progress to resume from.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checkpoint: Option<Checkpoint>,
}

impl GenerationJob {
    /// Start building a job.
    pub fn builder() -> GenerationJobBuilder {
        GenerationJobBuilder::default()
    }

    /// Whether the worker may skip script generation.
    pub fn has_script(&self) -> bool {
        self.scenes.as_ref().is_some_and(|s| !s.is_empty())
    }
}
