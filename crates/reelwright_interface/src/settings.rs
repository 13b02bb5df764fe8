//! Admin settings source.

use async_trait::async_trait;
use reelwright_core::AdminSettings;
use reelwright_error::ReelResult;

/// Loads the current admin settings.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Fetch the settings in effect now.
    async fn load(&self) -> ReelResult<AdminSettings>;
}
