//! Shared handler state.

use crate::ServerConfig;
use reelwright_core::ProviderResolver;
use reelwright_interface::{JobQueue, ProviderRegistry, Store};
use reelwright_pipeline::{
    AutomationTrigger, CachedSettings, JobPlanner, LifecycleService, StaticSettings,
};
use reelwright_social::PublishOrchestrator;
use std::sync::Arc;
use tracing::{info, warn};

/// Services every route handler uses.
#[derive(Clone)]
pub struct AppState {
    /// Video lifecycle.
    pub lifecycle: LifecycleService,
    /// Automation trigger.
    pub trigger: AutomationTrigger,
    /// Shared secret the gateway sends; identity headers are trusted without it when unset.
    pub gateway_token: Option<Arc<str>>,
}

impl AppState {
    /// State over existing services.
    pub fn new(lifecycle: LifecycleService) -> Self {
        let trigger = AutomationTrigger::new(lifecycle.clone());
        Self {
            lifecycle,
            trigger,
            gateway_token: None,
        }
    }

    /// Require `token` in the gateway header on every authenticated route.
    pub fn with_gateway_token(mut self, token: impl Into<Arc<str>>) -> Self {
        self.gateway_token = Some(token.into());
        self
    }

    /// Wire the services from configuration and the external collaborators.
    pub fn from_config(
        config: &ServerConfig,
        store: Arc<dyn Store>,
        queue: Arc<dyn JobQueue>,
        providers: ProviderRegistry,
    ) -> Self {
        let planner = JobPlanner::new(
            store.clone(),
            Arc::new(config.catalog.clone()),
            ProviderResolver::new(config.providers.clone()),
        );
        let publisher = PublishOrchestrator::from_config(&config.publish);
        info!(platforms = ?publisher.platforms(), "Publishers ready");
        let settings = CachedSettings::new(
            StaticSettings::new(config.admin.clone()),
            config.settings_ttl(),
        );
        let state = Self::new(LifecycleService::new(
            store,
            queue,
            planner,
            Arc::new(providers),
            Arc::new(publisher),
            Arc::new(settings),
            config.media(),
        ));
        match config.gateway_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => state.with_gateway_token(token),
            None => {
                warn!("No gateway token configured; identity headers are trusted from any client");
                state
            }
        }
    }
}
