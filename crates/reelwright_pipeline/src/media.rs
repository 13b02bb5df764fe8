//! On-disk artifact locations.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Where artifacts live and how they are served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory every artifact path is relative to.
    pub media_root: PathBuf,
    /// Public URL prefix serving `media_root`, if any.
    #[serde(default)]
    pub public_media_base: Option<String>,
}

impl MediaConfig {
    /// Media rooted at `media_root`, not publicly served.
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            public_media_base: None,
        }
    }

    /// Resolve an artifact path, refusing anything that escapes `media_root`.
    ///
    /// Relative paths are joined onto the root. Absolute paths are accepted
    /// only when already under it. Remote URLs have no local path.
    pub fn local_path(&self, artifact: &str) -> Option<PathBuf> {
        if artifact.trim().is_empty() || artifact.contains("://") {
            return None;
        }
        let path = Path::new(artifact);
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }
        if path.is_absolute() {
            return path.starts_with(&self.media_root).then(|| path.to_path_buf());
        }
        Some(self.media_root.join(path))
    }

    /// Public URL of an artifact: remote URLs as is, local ones under `public_media_base`.
    pub fn public_url(&self, artifact: &str) -> Option<String> {
        if artifact.contains("://") {
            return Some(artifact.to_string());
        }
        let base = self.public_media_base.as_deref()?;
        let relative = Path::new(artifact)
            .strip_prefix(&self.media_root)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| artifact.to_string());
        Some(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            relative.trim_start_matches('/')
        ))
    }
}
