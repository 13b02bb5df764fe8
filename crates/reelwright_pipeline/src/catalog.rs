//! Lookup tables loaded from configuration.

use reelwright_core::{ArtStyle, Niche, Voice};
use reelwright_interface::Catalog;
use serde::{Deserialize, Serialize};

/// Niches, art styles and voices held in memory.
///
/// Deserializes from a `[catalog]` table:
///
/// ```toml
/// [[catalog.art_styles]]
/// id = "watercolor"
/// name = "Watercolor"
/// prompt_modifier = "soft watercolor painting"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticCatalog {
    /// Art styles.
    pub art_styles: Vec<ArtStyle>,
    /// Niches.
    pub niches: Vec<Niche>,
    /// Voices.
    pub voices: Vec<Voice>,
}

impl StaticCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an art style.
    pub fn with_art_style(mut self, style: ArtStyle) -> Self {
        self.art_styles.push(style);
        self
    }

    /// Add a niche.
    pub fn with_niche(mut self, niche: Niche) -> Self {
        self.niches.push(niche);
        self
    }

    /// Add a voice.
    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voices.push(voice);
        self
    }
}

impl Catalog for StaticCatalog {
    fn art_style(&self, id: &str) -> Option<ArtStyle> {
        self.art_styles.iter().find(|s| s.id == id).cloned()
    }

    fn niche(&self, id: &str) -> Option<Niche> {
        self.niches.iter().find(|n| n.id == id).cloned()
    }

    fn voice(&self, id: &str) -> Option<Voice> {
        self.voices.iter().find(|v| v.id == id).cloned()
    }
}
