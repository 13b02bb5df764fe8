//! Admin settings sources.

use async_trait::async_trait;
use reelwright_core::AdminSettings;
use reelwright_error::ReelResult;
use reelwright_interface::SettingsSource;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Settings held in memory, replaceable at runtime.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    settings: Arc<RwLock<AdminSettings>>,
}

impl StaticSettings {
    /// Source serving `settings`.
    pub fn new(settings: AdminSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Swap in new settings.
    pub async fn replace(&self, settings: AdminSettings) {
        *self.settings.write().await = settings;
    }
}

#[async_trait]
impl SettingsSource for StaticSettings {
    async fn load(&self) -> ReelResult<AdminSettings> {
        Ok(self.settings.read().await.clone())
    }
}

/// Caches another source for a fixed time-to-live.
///
/// A zero TTL loads on every call. [`CachedSettings::invalidate`] forces the
/// next call to reload.
#[derive(Debug)]
pub struct CachedSettings<S> {
    inner: S,
    ttl: Duration,
    cached: RwLock<Option<(Instant, AdminSettings)>>,
}

impl<S: SettingsSource> CachedSettings<S> {
    /// Wrap `inner`.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// Drop the cached copy.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
        debug!("Admin settings cache invalidated");
    }
}

#[async_trait]
impl<S: SettingsSource> SettingsSource for CachedSettings<S> {
    async fn load(&self) -> ReelResult<AdminSettings> {
        if let Some((loaded_at, settings)) = self.cached.read().await.as_ref()
            && loaded_at.elapsed() < self.ttl
        {
            return Ok(settings.clone());
        }
        let settings = self.inner.load().await?;
        *self.cached.write().await = Some((Instant::now(), settings.clone()));
        debug!(ttl_secs = self.ttl.as_secs(), "Admin settings reloaded");
        Ok(settings)
    }
}
