use async_trait::async_trait;
use chrono::{Duration, Utc};
use reelwright_core::{Platform, SocialAccount, UserId};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_interface::SocialAccountRepository;
use reelwright_social::{
    PublishOrchestrator, PublishRequest, PublishedPost, VideoPublisher, publish_error,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Accounts keyed by platform for a single user.
struct Accounts(HashMap<Platform, SocialAccount>);

#[async_trait]
impl SocialAccountRepository for Accounts {
    async fn social_account(
        &self,
        _user_id: &UserId,
        platform: Platform,
    ) -> ReelResult<Option<SocialAccount>> {
        Ok(self.0.get(&platform).cloned())
    }
}

struct FailingAccounts;

#[async_trait]
impl SocialAccountRepository for FailingAccounts {
    async fn social_account(
        &self,
        _user_id: &UserId,
        _platform: Platform,
    ) -> ReelResult<Option<SocialAccount>> {
        Err(ReelError::new(ReelErrorKind::Storage("connection reset".into())))
    }
}

/// Succeeds or fails with a fixed vendor message, counting calls.
struct StubPublisher {
    platform: Platform,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl StubPublisher {
    fn ok(platform: Platform) -> Arc<Self> {
        Arc::new(Self {
            platform,
            failure: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(platform: Platform, message: &str) -> Arc<Self> {
        Arc::new(Self {
            platform,
            failure: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl VideoPublisher for StubPublisher {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn publish(
        &self,
        _account: &SocialAccount,
        _request: &PublishRequest,
    ) -> ReelResult<PublishedPost> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(publish_error(self.platform, message.clone())),
            None => Ok(PublishedPost {
                post_id: format!("{}-post", self.platform),
                url: format!("https://example.com/{}", self.platform),
            }),
        }
    }
}

fn account(platform: Platform) -> SocialAccount {
    SocialAccount {
        user_id: UserId::from("user-1"),
        platform,
        access_token: "token".to_string(),
        expires_at: None,
        account_id: "acct".to_string(),
        display_name: String::new(),
    }
}

fn all_accounts() -> Accounts {
    Accounts(Platform::ALL.iter().map(|p| (*p, account(*p))).collect())
}

fn request() -> PublishRequest {
    PublishRequest::new("/media/v.mp4", None, "Title", "Caption")
}

#[tokio::test]
async fn test_one_platform_failing_does_not_block_others() {
    let mut orchestrator = PublishOrchestrator::new(150);
    orchestrator
        .register(StubPublisher::ok(Platform::Youtube))
        .register(StubPublisher::failing(
            Platform::Facebook,
            "(#4) Application request limit reached",
        ));

    let outcomes = orchestrator
        .publish(
            &all_accounts(),
            &UserId::from("user-1"),
            &[Platform::Facebook, Platform::Youtube],
            &request(),
        )
        .await;

    assert_eq!(outcomes.len(), 2);
    let youtube = outcomes.iter().find(|o| o.platform == Platform::Youtube).unwrap();
    assert!(youtube.success);
    assert_eq!(youtube.url.as_deref(), Some("https://example.com/YOUTUBE"));

    let facebook = outcomes.iter().find(|o| o.platform == Platform::Facebook).unwrap();
    assert!(!facebook.success);
    let error = facebook.error.as_deref().unwrap();
    assert!(error.starts_with("Facebook rate limit reached."));
    assert!(error.contains("Application request limit reached"));
}

#[tokio::test]
async fn test_duplicate_platforms_publish_once() {
    let youtube = StubPublisher::ok(Platform::Youtube);
    let mut orchestrator = PublishOrchestrator::new(150);
    orchestrator.register(youtube.clone());

    let outcomes = orchestrator
        .publish(
            &all_accounts(),
            &UserId::from("user-1"),
            &[Platform::Youtube, Platform::Youtube],
            &request(),
        )
        .await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(youtube.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_and_expired_accounts_fail_without_calling_publisher() {
    let instagram = StubPublisher::ok(Platform::Instagram);
    let youtube = StubPublisher::ok(Platform::Youtube);
    let mut orchestrator = PublishOrchestrator::new(150);
    orchestrator.register(instagram.clone()).register(youtube.clone());

    let mut expired = account(Platform::Youtube);
    expired.expires_at = Some(Utc::now() - Duration::hours(1));
    let accounts = Accounts(HashMap::from([(Platform::Youtube, expired)]));

    let outcomes = orchestrator
        .publish(
            &accounts,
            &UserId::from("user-1"),
            &[Platform::Instagram, Platform::Youtube],
            &request(),
        )
        .await;

    let instagram_outcome = outcomes.iter().find(|o| o.platform == Platform::Instagram).unwrap();
    assert!(instagram_outcome.error.as_deref().unwrap().contains("No Instagram account"));
    let youtube_outcome = outcomes.iter().find(|o| o.platform == Platform::Youtube).unwrap();
    assert!(youtube_outcome.error.as_deref().unwrap().contains("Reconnect"));
    assert_eq!(instagram.calls.load(Ordering::SeqCst), 0);
    assert_eq!(youtube.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unregistered_platform_and_lookup_errors_are_outcomes() {
    let mut orchestrator = PublishOrchestrator::new(150);
    orchestrator.register(StubPublisher::ok(Platform::Youtube));

    let outcomes = orchestrator
        .publish(
            &FailingAccounts,
            &UserId::from("user-1"),
            &[Platform::Facebook, Platform::Youtube],
            &request(),
        )
        .await;

    assert!(outcomes.iter().all(|o| !o.success));
    let facebook = outcomes.iter().find(|o| o.platform == Platform::Facebook).unwrap();
    assert!(facebook.error.as_deref().unwrap().contains("not configured"));
    let youtube = outcomes.iter().find(|o| o.platform == Platform::Youtube).unwrap();
    assert!(youtube.error.as_deref().unwrap().contains("connection reset"));
}
