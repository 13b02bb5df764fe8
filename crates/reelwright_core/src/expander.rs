//! Scene expansion: narration + audio length → timed image slots.
//!
//! A script usually has fewer scenes than a short video needs images, so each
//! scene's narration is split into sentence fragments, fragments are selected
//! (or cycled) until there is roughly one image per [`SECONDS_PER_IMAGE`], and
//! the audio track is divided between slots in proportion to their text length.
//!
//! The expansion is a pure function of its inputs. Retries rely on that to
//! reproduce the same slots and timings.

use crate::{Scene, Timing};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Target audio seconds per image.
pub const SECONDS_PER_IMAGE: u64 = 5;

/// Framings cycled across slots to diversify otherwise similar prompts.
pub const CAMERA_ANGLES: [&str; 10] = [
    "wide establishing shot",
    "close-up shot",
    "medium shot",
    "low angle shot",
    "high angle shot",
    "over-the-shoulder shot",
    "dutch angle shot",
    "extreme close-up",
    "bird's eye view",
    "tracking shot",
];

/// One timed image placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSlot {
    /// Narration fragment the image illustrates.
    pub text: String,
    /// Prompt for the image provider: camera angle + the scene's visual description.
    pub visual_description: String,
    /// Index of the scene the fragment came from.
    pub scene_index: usize,
    /// Window on the audio track.
    pub timing: Timing,
}

/// Output of [`expand_scenes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedScenes {
    /// Ordered slots.
    pub slots: Vec<ImageSlot>,
    /// Same windows as `slots[i].timing`, for storage in the checkpoint.
    pub timings: Vec<Timing>,
}

impl ExpandedScenes {
    /// Prompts to send to the image provider, one per slot.
    pub fn prompts(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|s| s.visual_description.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    visual_description: String,
    scene_index: usize,
}

/// Number of slots for a script: about one per five seconds, never fewer than scenes.
///
/// At least one slot is produced for a non-empty audio track even when there
/// are no scenes.
pub fn target_slot_count(scene_count: usize, audio_duration_ms: u64) -> usize {
    let by_duration = (audio_duration_ms as f64 / 1000.0 / SECONDS_PER_IMAGE as f64).round() as usize;
    let target = scene_count.max(by_duration);
    if target == 0 && audio_duration_ms > 0 {
        1
    } else {
        target
    }
}

/// Camera framing for a slot position.
pub fn camera_angle(position: usize) -> &'static str {
    CAMERA_ANGLES[position % CAMERA_ANGLES.len()]
}

/// Split narration into trimmed sentence fragments on `.`, `!` and `?`.
pub fn split_fragments(narration: &str) -> Vec<String> {
    narration
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn fragments_of(scenes: &[Scene]) -> Vec<Fragment> {
    let fragments: Vec<Fragment> = scenes
        .iter()
        .enumerate()
        .flat_map(|(scene_index, scene)| {
            split_fragments(scene.narration())
                .into_iter()
                .map(move |text| Fragment {
                    text,
                    visual_description: scene.visual_description().clone(),
                    scene_index,
                })
        })
        .collect();

    if !fragments.is_empty() {
        return fragments;
    }

    let (text, visual_description) = scenes
        .first()
        .map(|s| (s.narration().clone(), s.visual_description().clone()))
        .unwrap_or_default();
    vec![Fragment {
        text,
        visual_description,
        scene_index: 0,
    }]
}

fn decorate(position: usize, base: &str) -> String {
    let angle = camera_angle(position);
    if base.trim().is_empty() {
        angle.to_string()
    } else {
        format!("{}, {}", angle, base)
    }
}

/// Allocate `total_ms` across slots proportionally to `weights`.
///
/// Windows are contiguous from 0; the last one always ends at `total_ms`.
fn allocate(weights: &[usize], total_ms: u64) -> Vec<Timing> {
    let weight_sum: usize = weights.iter().sum();
    let count = weights.len();
    let mut cursor = 0u64;

    weights
        .iter()
        .enumerate()
        .map(|(i, &weight)| {
            let proportion = if weight_sum == 0 {
                1.0 / count as f64
            } else {
                weight as f64 / weight_sum as f64
            };
            let duration = (proportion * total_ms as f64).round() as u64;
            let start_ms = cursor;
            let end_ms = if i + 1 == count {
                total_ms
            } else {
                (cursor + duration).min(total_ms)
            };
            cursor = end_ms;
            Timing { start_ms, end_ms }
        })
        .collect()
}

/// Expand scenes into timed image slots covering exactly `audio_duration_ms`.
#[instrument(skip(scenes), fields(scene_count = scenes.len()))]
pub fn expand_scenes(scenes: &[Scene], audio_duration_ms: u64) -> ExpandedScenes {
    let target = target_slot_count(scenes.len(), audio_duration_ms);
    let fragments = fragments_of(scenes);

    let selected: Vec<&Fragment> = if fragments.len() >= target {
        fragments.iter().take(target).collect()
    } else {
        fragments.iter().cycle().take(target).collect()
    };

    let weights: Vec<usize> = selected.iter().map(|f| f.text.chars().count()).collect();
    let timings = allocate(&weights, audio_duration_ms);

    let slots: Vec<ImageSlot> = selected
        .into_iter()
        .zip(timings.iter())
        .enumerate()
        .map(|(position, (fragment, timing))| ImageSlot {
            text: fragment.text.clone(),
            visual_description: decorate(position, &fragment.visual_description),
            scene_index: fragment.scene_index,
            timing: *timing,
        })
        .collect();

    debug!(
        target_slots = target,
        fragments = fragments.len(),
        slots = slots.len(),
        "Expanded scenes into image slots"
    );

    ExpandedScenes { slots, timings }
}
