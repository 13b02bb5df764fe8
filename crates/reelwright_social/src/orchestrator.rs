//! Multi-platform publishing.

use crate::{
    FacebookPublisher, InstagramPublisher, PublishConfig, PublishRequest, VideoPublisher,
    YoutubePublisher, classify_error,
};
use chrono::Utc;
use futures::future::join_all;
use reelwright_core::{Platform, PublishOutcome, UserId};
use reelwright_error::{ReelError, ReelErrorKind};
use reelwright_interface::SocialAccountRepository;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Routes a publish to each requested platform and classifies every failure.
///
/// Platforms are attempted concurrently and independently: one failing does
/// not stop the others. The result is one outcome per distinct platform, ready
/// to be merged into a video's posted-platform list in a single write.
pub struct PublishOrchestrator {
    publishers: HashMap<Platform, Arc<dyn VideoPublisher>>,
    excerpt_chars: usize,
}

impl std::fmt::Debug for PublishOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishOrchestrator")
            .field("platforms", &self.platforms())
            .field("excerpt_chars", &self.excerpt_chars)
            .finish()
    }
}

impl PublishOrchestrator {
    /// Empty orchestrator.
    pub fn new(excerpt_chars: usize) -> Self {
        Self {
            publishers: HashMap::new(),
            excerpt_chars,
        }
    }

    /// Orchestrator with the Facebook, YouTube and Instagram publishers.
    pub fn from_config(config: &PublishConfig) -> Self {
        let client = reqwest::Client::new();
        let mut orchestrator = Self::new(config.error_excerpt_chars);
        orchestrator
            .register(Arc::new(FacebookPublisher::new(client.clone(), config.clone())))
            .register(Arc::new(YoutubePublisher::new(client.clone(), config.clone())))
            .register(Arc::new(InstagramPublisher::new(client, config.clone())));
        orchestrator
    }

    /// Register (or replace) the publisher for its platform.
    pub fn register(&mut self, publisher: Arc<dyn VideoPublisher>) -> &mut Self {
        let platform = publisher.platform();
        info!(platform = %platform, "Registering publisher");
        self.publishers.insert(platform, publisher);
        self
    }

    /// Platforms with a registered publisher, sorted.
    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.publishers.keys().copied().collect();
        platforms.sort();
        platforms
    }

    /// Publish to every platform in `platforms` using `user_id`'s stored accounts.
    #[instrument(skip(self, accounts, request), fields(user_id = %user_id))]
    pub async fn publish<A>(
        &self,
        accounts: &A,
        user_id: &UserId,
        platforms: &[Platform],
        request: &PublishRequest,
    ) -> Vec<PublishOutcome>
    where
        A: SocialAccountRepository + ?Sized,
    {
        let distinct: BTreeSet<Platform> = platforms.iter().copied().collect();
        let outcomes = join_all(
            distinct
                .into_iter()
                .map(|platform| self.publish_one(accounts, user_id, platform, request)),
        )
        .await;
        let posted = outcomes.iter().filter(|o| o.success).count();
        info!(attempted = outcomes.len(), posted, "Publish finished");
        outcomes
    }

    async fn publish_one<A>(
        &self,
        accounts: &A,
        user_id: &UserId,
        platform: Platform,
        request: &PublishRequest,
    ) -> PublishOutcome
    where
        A: SocialAccountRepository + ?Sized,
    {
        let Some(publisher) = self.publishers.get(&platform) else {
            return PublishOutcome::failed(
                platform,
                format!("{} publishing is not configured.", platform.display_name()),
            );
        };

        let account = match accounts.social_account(user_id, platform).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                return PublishOutcome::failed(
                    platform,
                    format!(
                        "No {} account is connected. Connect one and try again.",
                        platform.display_name()
                    ),
                );
            }
            Err(e) => return self.failure(platform, &e),
        };
        if account.is_expired(Utc::now()) {
            return PublishOutcome::failed(
                platform,
                classify_error(platform, "Access token has expired", self.excerpt_chars),
            );
        }

        match publisher.publish(&account, request).await {
            Ok(post) => PublishOutcome::posted(platform, post.post_id, post.url),
            Err(e) => self.failure(platform, &e),
        }
    }

    fn failure(&self, platform: Platform, error: &ReelError) -> PublishOutcome {
        let raw = match error.kind() {
            ReelErrorKind::Publish { message, .. } => message.clone(),
            other => other.to_string(),
        };
        let message = classify_error(platform, &raw, self.excerpt_chars);
        warn!(platform = %platform, error = %message, "Publish failed");
        PublishOutcome::failed(platform, message)
    }
}
