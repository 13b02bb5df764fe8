//! Script scenes and timing windows.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One narration + visual unit from a generated script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Text read aloud by the voice track.
    #[serde(alias = "text")]
    narration: String,
    /// Description sent to the image provider.
    #[serde(alias = "visual", alias = "imagePrompt")]
    visual_description: String,
}

/// A half-open `[start_ms, end_ms)` window on the audio track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    /// Window start in milliseconds.
    pub start_ms: u64,
    /// Window end in milliseconds.
    pub end_ms: u64,
}

impl Timing {
    /// Length of the window.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}
