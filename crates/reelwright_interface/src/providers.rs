//! Generation vendor capabilities.
//!
//! The orchestrator calls these but does not implement them. Its contract with
//! a provider is narrow: output is accepted verbatim, and an empty result is a
//! hard failure.

use async_trait::async_trait;
use derive_getters::Getters;
use reelwright_core::{Capability, Scene};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Inputs to script generation.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ScriptParams {
    /// Niche name and context.
    niche: String,
    /// Narration tone.
    tone: String,
    /// Narration language.
    language: String,
    /// Target length in seconds.
    target_duration_secs: u32,
    /// Bound character description.
    #[builder(default)]
    character_prompt: Option<String>,
}

/// A generated script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScript {
    /// Video title.
    pub title: String,
    /// Full narration.
    pub full_script: String,
    /// Ordered scenes.
    pub scenes: Vec<Scene>,
}

/// A synthesized narration track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedVoice {
    /// Location of the audio file.
    pub audio_path: String,
    /// Measured length.
    pub duration_ms: u64,
}

/// Inputs to image generation.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// One prompt per requested image.
    prompts: Vec<String>,
    /// Art style modifier appended to every prompt.
    style_modifier: String,
    /// Negative prompt.
    #[builder(default)]
    negative_prompt: String,
}

/// Generated images, one path per prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImages {
    /// Image file locations.
    pub image_paths: Vec<String>,
}

/// Writes scripts.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Generate a title, narration and scenes.
    async fn generate_script(&self, params: &ScriptParams) -> ReelResult<GeneratedScript>;
}

/// Synthesizes narration.
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    /// Read `text` aloud with the given voice.
    async fn synthesize_voice(
        &self,
        text: &str,
        voice_id: &str,
        language: &str,
    ) -> ReelResult<SynthesizedVoice>;
}

/// Generates images.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image per prompt.
    async fn generate_images(&self, request: &ImageRequest) -> ReelResult<GeneratedImages>;
}

fn provider_error(provider: &str, message: impl Into<String>) -> ReelError {
    ReelError::new(ReelErrorKind::Provider {
        provider: provider.to_string(),
        message: message.into(),
    })
}

/// Capability implementations keyed by provider id.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    scripts: HashMap<String, Arc<dyn ScriptGenerator>>,
    voices: HashMap<String, Arc<dyn VoiceSynthesizer>>,
    images: HashMap<String, Arc<dyn ImageGenerator>>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("scripts", &self.scripts.keys().collect::<Vec<_>>())
            .field("voices", &self.voices.keys().collect::<Vec<_>>())
            .field("images", &self.images.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ProviderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script generator.
    pub fn with_script(mut self, id: impl Into<String>, generator: Arc<dyn ScriptGenerator>) -> Self {
        self.scripts.insert(id.into(), generator);
        self
    }

    /// Register a voice synthesizer.
    pub fn with_voice(mut self, id: impl Into<String>, synthesizer: Arc<dyn VoiceSynthesizer>) -> Self {
        self.voices.insert(id.into(), synthesizer);
        self
    }

    /// Register an image generator.
    pub fn with_images(mut self, id: impl Into<String>, generator: Arc<dyn ImageGenerator>) -> Self {
        self.images.insert(id.into(), generator);
        self
    }

    /// Registered ids for a capability, sorted.
    pub fn provider_ids(&self, capability: Capability) -> Vec<String> {
        let mut ids: Vec<String> = match capability {
            Capability::Llm => self.scripts.keys().cloned().collect(),
            Capability::Tts => self.voices.keys().cloned().collect(),
            Capability::Image => self.images.keys().cloned().collect(),
        };
        ids.sort();
        ids
    }

    /// Generate a script with the named provider; an empty scene list is an error.
    #[instrument(skip(self, params), fields(provider = %provider_id))]
    pub async fn generate_script(
        &self,
        provider_id: &str,
        params: &ScriptParams,
    ) -> ReelResult<GeneratedScript> {
        let generator = self
            .scripts
            .get(provider_id)
            .ok_or_else(|| provider_error(provider_id, "script provider is not registered"))?;
        let script = generator.generate_script(params).await?;
        if script.scenes.is_empty() {
            warn!("Script provider returned no scenes");
            return Err(provider_error(provider_id, "script generation returned no scenes"));
        }
        debug!(scenes = script.scenes.len(), "Script generated");
        Ok(script)
    }

    /// Synthesize narration with the named provider; an empty audio path is an error.
    #[instrument(skip(self, text), fields(provider = %provider_id, text_len = text.len()))]
    pub async fn synthesize_voice(
        &self,
        provider_id: &str,
        text: &str,
        voice_id: &str,
        language: &str,
    ) -> ReelResult<SynthesizedVoice> {
        let synthesizer = self
            .voices
            .get(provider_id)
            .ok_or_else(|| provider_error(provider_id, "voice provider is not registered"))?;
        let voice = synthesizer.synthesize_voice(text, voice_id, language).await?;
        if voice.audio_path.trim().is_empty() {
            warn!("Voice provider returned no audio");
            return Err(provider_error(provider_id, "voice synthesis returned no audio"));
        }
        Ok(voice)
    }

    /// Generate images with the named provider; an empty result is an error.
    #[instrument(skip(self, request), fields(provider = %provider_id, prompts = request.prompts().len()))]
    pub async fn generate_images(
        &self,
        provider_id: &str,
        request: &ImageRequest,
    ) -> ReelResult<GeneratedImages> {
        let generator = self
            .images
            .get(provider_id)
            .ok_or_else(|| provider_error(provider_id, "image provider is not registered"))?;
        let images = generator.generate_images(request).await?;
        if images.image_paths.is_empty() {
            warn!("Image provider returned no images");
            return Err(provider_error(provider_id, "image generation returned no images"));
        }
        Ok(images)
    }
}
