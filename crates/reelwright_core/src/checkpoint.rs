//! Resumable generation progress for one video.
//!
//! [`Checkpoint`] is a tagged variant per stage so that, for example, a review
//! checkpoint without audio cannot be constructed. Storage uses the flat
//! [`CheckpointRecord`] shape (every field optional), which is also what
//! external workers read and write; conversion between the two validates the
//! field combinations.

use crate::Timing;
use derive_getters::Getters;
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bookkeeping shared by every stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct StageProgress {
    /// Stage labels already finished; skipped on resume.
    completed_stages: BTreeSet<String>,
    /// Background music chosen for the video.
    music_path: Option<String>,
}

impl StageProgress {
    /// Progress with nothing completed.
    pub fn new(music_path: Option<String>) -> Self {
        Self {
            completed_stages: BTreeSet::new(),
            music_path,
        }
    }

    /// Record a finished stage.
    pub fn mark_completed(&mut self, stage: impl Into<String>) {
        self.completed_stages.insert(stage.into());
    }

    /// Whether a stage was already finished.
    pub fn is_completed(&self, stage: &str) -> bool {
        self.completed_stages.contains(stage)
    }
}

/// Synthesized narration.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct AudioTrack {
    /// Location of the audio file.
    path: String,
    /// Measured length.
    duration_ms: u64,
}

impl AudioTrack {
    /// Audio at a non-empty path.
    pub fn new(path: impl Into<String>, duration_ms: u64) -> ReelResult<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ReelError::new(ReelErrorKind::validation(
                "audioPath",
                "must not be empty",
            )));
        }
        Ok(Self { path, duration_ms })
    }
}

/// Generated images with their prompts and timing windows, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ImageSet {
    /// One file per image slot.
    paths: Vec<String>,
    /// Prompt that produced each image. Empty for records written before prompts were kept.
    prompts: Vec<String>,
    /// Window on the audio track for each image.
    timings: Vec<Timing>,
}

impl ImageSet {
    /// Build a set, checking that the parallel arrays line up.
    pub fn new(paths: Vec<String>, prompts: Vec<String>, timings: Vec<Timing>) -> ReelResult<Self> {
        if paths.is_empty() {
            return Err(ReelError::new(ReelErrorKind::validation(
                "imagePaths",
                "must not be empty",
            )));
        }
        if timings.len() != paths.len() {
            return Err(ReelError::new(ReelErrorKind::validation(
                "expandedTimings",
                format!("has {} entries for {} images", timings.len(), paths.len()),
            )));
        }
        if !prompts.is_empty() && prompts.len() != paths.len() {
            return Err(ReelError::new(ReelErrorKind::validation(
                "imagePrompts",
                format!("has {} entries for {} images", prompts.len(), paths.len()),
            )));
        }
        Ok(Self {
            paths,
            prompts,
            timings,
        })
    }

    /// Number of image slots.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Keep only the given slots, in ascending index order.
    ///
    /// Duplicate indices are collapsed. An out-of-range index or an empty
    /// selection is rejected.
    pub fn narrow(&self, indices: &[usize]) -> ReelResult<Self> {
        let selected: BTreeSet<usize> = indices.iter().copied().collect();
        if selected.is_empty() {
            return Err(ReelError::new(ReelErrorKind::validation(
                "sceneIndices",
                "must select at least one scene",
            )));
        }
        if let Some(&bad) = selected.iter().find(|&&i| i >= self.paths.len()) {
            return Err(ReelError::new(ReelErrorKind::validation(
                "sceneIndices",
                format!("index {} out of range (0..{})", bad, self.paths.len()),
            )));
        }

        let paths = selected.iter().map(|&i| self.paths[i].clone()).collect();
        let timings = selected.iter().map(|&i| self.timings[i]).collect();
        let prompts = if self.prompts.is_empty() {
            Vec::new()
        } else {
            selected.iter().map(|&i| self.prompts[i].clone()).collect()
        };
        Ok(Self {
            paths,
            prompts,
            timings,
        })
    }

    /// Swap the image (and prompt) at one slot, keeping its timing.
    pub fn replace(
        &mut self,
        index: usize,
        path: impl Into<String>,
        prompt: impl Into<String>,
    ) -> ReelResult<()> {
        if index >= self.paths.len() {
            return Err(ReelError::new(ReelErrorKind::validation(
                "index",
                format!("{} out of range (0..{})", index, self.paths.len()),
            )));
        }
        self.paths[index] = path.into();
        if self.prompts.is_empty() {
            self.prompts = vec![String::new(); self.paths.len()];
        }
        self.prompts[index] = prompt.into();
        Ok(())
    }
}

/// Progress of a video's generation, one variant per stage reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CheckpointRecord", into = "CheckpointRecord")]
pub enum Checkpoint {
    /// Nothing produced beyond the script.
    Started {
        /// Shared bookkeeping.
        progress: StageProgress,
    },
    /// Narration audio exists.
    Voiced {
        /// Shared bookkeeping.
        progress: StageProgress,
        /// Narration.
        audio: AudioTrack,
    },
    /// Images exist and assembly may proceed.
    Illustrated {
        /// Shared bookkeeping.
        progress: StageProgress,
        /// Narration.
        audio: AudioTrack,
        /// Images and their timings.
        images: ImageSet,
    },
    /// Images exist and assembly waits for human approval.
    Review {
        /// Shared bookkeeping.
        progress: StageProgress,
        /// Narration.
        audio: AudioTrack,
        /// Images and their timings.
        images: ImageSet,
    },
}

impl Checkpoint {
    /// Shared bookkeeping of any stage.
    pub fn progress(&self) -> &StageProgress {
        match self {
            Self::Started { progress }
            | Self::Voiced { progress, .. }
            | Self::Illustrated { progress, .. }
            | Self::Review { progress, .. } => progress,
        }
    }

    /// Mutable bookkeeping of any stage.
    pub fn progress_mut(&mut self) -> &mut StageProgress {
        match self {
            Self::Started { progress }
            | Self::Voiced { progress, .. }
            | Self::Illustrated { progress, .. }
            | Self::Review { progress, .. } => progress,
        }
    }

    /// Narration, once synthesized.
    pub fn audio(&self) -> Option<&AudioTrack> {
        match self {
            Self::Started { .. } => None,
            Self::Voiced { audio, .. }
            | Self::Illustrated { audio, .. }
            | Self::Review { audio, .. } => Some(audio),
        }
    }

    /// Images, once generated.
    pub fn images(&self) -> Option<&ImageSet> {
        match self {
            Self::Illustrated { images, .. } | Self::Review { images, .. } => Some(images),
            _ => None,
        }
    }

    /// Whether the checkpoint waits for human approval.
    pub fn is_review(&self) -> bool {
        matches!(self, Self::Review { .. })
    }

    /// Leave review mode for final assembly, optionally keeping a subset of slots.
    ///
    /// Only legal from [`Checkpoint::Review`]. The returned checkpoint is
    /// [`Checkpoint::Illustrated`] with the review stage marked complete.
    pub fn into_assembly(self, indices: Option<&[usize]>) -> ReelResult<Self> {
        match self {
            Self::Review {
                mut progress,
                audio,
                images,
            } => {
                let images = match indices {
                    Some(indices) => images.narrow(indices)?,
                    None => images,
                };
                progress.mark_completed(crate::stages::REVIEW);
                Ok(Self::Illustrated {
                    progress,
                    audio,
                    images,
                })
            }
            _ => Err(ReelError::new(ReelErrorKind::StateConflict(
                "checkpoint is not awaiting review".to_string(),
            ))),
        }
    }

    /// Replace one reviewed image. Only legal from [`Checkpoint::Review`].
    pub fn replace_image(
        &mut self,
        index: usize,
        path: impl Into<String>,
        prompt: impl Into<String>,
    ) -> ReelResult<()> {
        match self {
            Self::Review { images, .. } => images.replace(index, path, prompt),
            _ => Err(ReelError::new(ReelErrorKind::StateConflict(
                "images can only be replaced during review".to_string(),
            ))),
        }
    }

    /// Files generated for this video alone.
    ///
    /// The music track is a series input shared across videos and is not listed.
    pub fn artifact_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        if let Some(audio) = self.audio() {
            paths.push(audio.path().clone());
        }
        if let Some(images) = self.images() {
            paths.extend(images.paths().iter().cloned());
        }
        paths
    }
}

/// Flat storage shape of a checkpoint, shared with external workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointRecord {
    /// One path per image slot.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_paths: Vec<String>,
    /// Prompt per image slot.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_prompts: Vec<String>,
    /// Narration audio path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    /// Measured narration length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Older name for the slot timings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_timings: Option<Vec<Timing>>,
    /// Slot timings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_timings: Option<Vec<Timing>>,
    /// Background music path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_path: Option<String>,
    /// Stage labels already finished.
    #[serde(default)]
    pub completed_stages: Vec<String>,
    /// Waiting for human approval of the images.
    #[serde(default)]
    pub review_mode: bool,
}

impl TryFrom<CheckpointRecord> for Checkpoint {
    type Error = ReelError;

    fn try_from(record: CheckpointRecord) -> ReelResult<Self> {
        let progress = StageProgress {
            completed_stages: record.completed_stages.into_iter().collect(),
            music_path: record.music_path.filter(|p| !p.is_empty()),
        };

        let audio = match record.audio_path.filter(|p| !p.is_empty()) {
            Some(path) => Some(AudioTrack::new(path, record.duration_ms.unwrap_or(0))?),
            None => None,
        };

        let images = if record.image_paths.is_empty() {
            None
        } else {
            let timings = record
                .expanded_timings
                .or(record.scene_timings)
                .unwrap_or_default();
            Some(ImageSet::new(
                record.image_paths,
                record.image_prompts,
                timings,
            )?)
        };

        match (audio, images, record.review_mode) {
            (None, None, false) => Ok(Self::Started { progress }),
            (Some(audio), None, false) => Ok(Self::Voiced { progress, audio }),
            (Some(audio), Some(images), false) => Ok(Self::Illustrated {
                progress,
                audio,
                images,
            }),
            (Some(audio), Some(images), true) => Ok(Self::Review {
                progress,
                audio,
                images,
            }),
            (None, Some(_), _) => Err(ReelError::new(ReelErrorKind::validation(
                "checkpointData",
                "has images but no audio",
            ))),
            (_, None, true) => Err(ReelError::new(ReelErrorKind::validation(
                "checkpointData",
                "review mode requires images and audio",
            ))),
        }
    }
}

impl From<Checkpoint> for CheckpointRecord {
    fn from(checkpoint: Checkpoint) -> Self {
        let review_mode = checkpoint.is_review();
        let (progress, audio, images) = match checkpoint {
            Checkpoint::Started { progress } => (progress, None, None),
            Checkpoint::Voiced { progress, audio } => (progress, Some(audio), None),
            Checkpoint::Illustrated {
                progress,
                audio,
                images,
            }
            | Checkpoint::Review {
                progress,
                audio,
                images,
            } => (progress, Some(audio), Some(images)),
        };

        let mut record = CheckpointRecord {
            completed_stages: progress.completed_stages.into_iter().collect(),
            music_path: progress.music_path,
            review_mode,
            ..Default::default()
        };
        if let Some(audio) = audio {
            record.audio_path = Some(audio.path);
            record.duration_ms = Some(audio.duration_ms);
        }
        if let Some(images) = images {
            record.image_paths = images.paths;
            record.image_prompts = images.prompts;
            record.scene_timings = Some(images.timings.clone());
            record.expanded_timings = Some(images.timings);
        }
        record
    }
}
