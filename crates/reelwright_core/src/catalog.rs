//! Static lookup records (niches, art styles, voices).

use serde::{Deserialize, Serialize};

/// A visual style applied to every image prompt of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtStyle {
    /// Lookup id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Appended to image prompts.
    #[serde(alias = "prompt_modifier")]
    pub prompt_modifier: String,
    /// Sent as the negative prompt.
    #[serde(default, alias = "negative_prompt")]
    pub negative_prompt: String,
}

/// A content niche that steers script generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Niche {
    /// Lookup id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Prompt context for the script generator.
    #[serde(default)]
    pub description: String,
}

/// A narrator voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Lookup id, passed verbatim to the TTS provider.
    pub id: String,
    /// Display name.
    pub name: String,
}
