//! Provider resolution: which vendor handles each generation capability.
//!
//! Resolution is pure and never checks the admin-enabled set; that filter only
//! applies when presenting choices (see [`crate::AdminSettings::selectable`]).
//! Callers re-resolve at every generation entry point instead of caching,
//! because user defaults and stored overrides change independently of jobs.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// System fallback for script generation.
pub const DEFAULT_LLM_PROVIDER: &str = "openai";
/// System fallback for voice synthesis.
pub const DEFAULT_TTS_PROVIDER: &str = "elevenlabs";
/// System fallback for image generation.
pub const DEFAULT_IMAGE_PROVIDER: &str = "fal";

/// A generation capability served by an external vendor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Capability {
    /// Script writing.
    Llm,
    /// Text to speech.
    Tts,
    /// Image generation.
    Image,
}

/// Optional provider id per capability, as stored on a series, automation or user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOverrides {
    /// Script provider.
    #[serde(default, alias = "llmProvider")]
    pub llm: Option<String>,
    /// Voice provider.
    #[serde(default, alias = "ttsProvider")]
    pub tts: Option<String>,
    /// Image provider.
    #[serde(default, alias = "imageProvider")]
    pub image: Option<String>,
}

impl ProviderOverrides {
    /// Stored id for a capability, ignoring blank values.
    pub fn get(&self, capability: Capability) -> Option<&str> {
        let value = match capability {
            Capability::Llm => &self.llm,
            Capability::Tts => &self.tts,
            Capability::Image => &self.image,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// System-wide fallback provider ids.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ProviderFallbacks {
    /// Script provider.
    #[serde(default = "default_llm")]
    llm: String,
    /// Voice provider.
    #[serde(default = "default_tts")]
    tts: String,
    /// Image provider.
    #[serde(default = "default_image")]
    image: String,
}

fn default_llm() -> String {
    DEFAULT_LLM_PROVIDER.to_string()
}

fn default_tts() -> String {
    DEFAULT_TTS_PROVIDER.to_string()
}

fn default_image() -> String {
    DEFAULT_IMAGE_PROVIDER.to_string()
}

impl Default for ProviderFallbacks {
    fn default() -> Self {
        Self {
            llm: default_llm(),
            tts: default_tts(),
            image: default_image(),
        }
    }
}

impl ProviderFallbacks {
    /// Fallbacks with explicit ids.
    pub fn new(llm: impl Into<String>, tts: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            llm: llm.into(),
            tts: tts.into(),
            image: image.into(),
        }
    }

    /// Fallback id for a capability.
    pub fn get(&self, capability: Capability) -> &str {
        match capability {
            Capability::Llm => &self.llm,
            Capability::Tts => &self.tts,
            Capability::Image => &self.image,
        }
    }
}

/// Concrete provider id per capability.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProviders {
    /// Script provider.
    llm: String,
    /// Voice provider.
    tts: String,
    /// Image provider.
    image: String,
}

impl ResolvedProviders {
    /// Resolved id for a capability.
    pub fn get(&self, capability: Capability) -> &str {
        match capability {
            Capability::Llm => &self.llm,
            Capability::Tts => &self.tts,
            Capability::Image => &self.image,
        }
    }
}

/// Resolves override → user default → system fallback, per capability.
#[derive(Debug, Clone, Default)]
pub struct ProviderResolver {
    fallbacks: ProviderFallbacks,
}

impl ProviderResolver {
    /// Resolver with the given fallbacks.
    pub fn new(fallbacks: ProviderFallbacks) -> Self {
        Self { fallbacks }
    }

    /// Configured fallbacks.
    pub fn fallbacks(&self) -> &ProviderFallbacks {
        &self.fallbacks
    }

    /// Resolve one capability.
    pub fn resolve_one(
        &self,
        capability: Capability,
        overrides: &ProviderOverrides,
        user_defaults: &ProviderOverrides,
    ) -> String {
        overrides
            .get(capability)
            .or_else(|| user_defaults.get(capability))
            .unwrap_or_else(|| self.fallbacks.get(capability))
            .to_string()
    }

    /// Resolve every capability independently.
    #[instrument(skip(self))]
    pub fn resolve(
        &self,
        overrides: &ProviderOverrides,
        user_defaults: &ProviderOverrides,
    ) -> ResolvedProviders {
        let resolved = ResolvedProviders {
            llm: self.resolve_one(Capability::Llm, overrides, user_defaults),
            tts: self.resolve_one(Capability::Tts, overrides, user_defaults),
            image: self.resolve_one(Capability::Image, overrides, user_defaults),
        };
        debug!(
            llm = %resolved.llm,
            tts = %resolved.tts,
            image = %resolved.image,
            "Resolved providers"
        );
        resolved
    }
}
