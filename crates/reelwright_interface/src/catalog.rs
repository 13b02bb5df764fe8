//! Static lookup tables.

use reelwright_core::{ArtStyle, Niche, Voice};

/// Pure id → record lookups for niches, art styles and voices.
pub trait Catalog: Send + Sync {
    /// Art style by id.
    fn art_style(&self, id: &str) -> Option<ArtStyle>;

    /// Niche by id.
    fn niche(&self, id: &str) -> Option<Niche>;

    /// Voice by id.
    fn voice(&self, id: &str) -> Option<Voice>;
}
