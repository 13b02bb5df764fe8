//! Shared fixtures for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelwright_core::{
    ArtStyle, AudioTrack, Automation, AutomationId, AutomationSchedule, Character, CharacterId,
    Checkpoint, ImageSet, Niche, Platform, ProviderFallbacks, ProviderResolver, Scene, Series,
    SeriesId, SocialAccount, StageProgress, Timing, UserId, UserProfile, Video, VideoId,
    VideoStatus,
};
use reelwright_error::ReelResult;
use reelwright_interface::{
    AutomationRepository, CharacterRepository, GeneratedImages, GeneratedScript, ImageGenerator,
    ImageRequest, ProviderRegistry, ScriptGenerator, ScriptParams, SeriesRepository,
    SocialAccountRepository, Store, UserRepository, VideoRepository,
};
use reelwright_pipeline::{
    AutomationTrigger, InMemoryJobQueue, InMemoryStore, JobPlanner, LifecycleService, MediaConfig,
    StaticCatalog, StaticSettings,
};
use reelwright_social::{PublishOrchestrator, PublishRequest, PublishedPost, VideoPublisher, publish_error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const OWNER: &str = "user-1";
pub const STYLE: &str = "watercolor";

/// Script generator returning a fixed two-scene script.
#[derive(Default)]
pub struct FixedScripts {
    pub calls: AtomicUsize,
    pub last_params: Mutex<Option<ScriptParams>>,
}

#[async_trait]
impl ScriptGenerator for FixedScripts {
    async fn generate_script(&self, params: &ScriptParams) -> ReelResult<GeneratedScript> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_params.lock() {
            *last = Some(params.clone());
        }
        Ok(GeneratedScript {
            title: "Fresh title".to_string(),
            full_script: "First line. Second line.".to_string(),
            scenes: vec![
                Scene::new("First line.".to_string(), "a harbor".to_string()),
                Scene::new("Second line.".to_string(), "a lighthouse".to_string()),
            ],
        })
    }
}

/// Image generator that records requests and returns one path per prompt.
#[derive(Default)]
pub struct RecordingImages {
    pub requests: Mutex<Vec<ImageRequest>>,
}

#[async_trait]
impl ImageGenerator for RecordingImages {
    async fn generate_images(&self, request: &ImageRequest) -> ReelResult<GeneratedImages> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        Ok(GeneratedImages {
            image_paths: (0..request.prompts().len())
                .map(|i| format!("images/regenerated-{i}.png"))
                .collect(),
        })
    }
}

/// Publisher with a fixed result.
pub struct StubPublisher {
    platform: Platform,
    failure: Option<String>,
    pub calls: AtomicUsize,
}

impl StubPublisher {
    pub fn ok(platform: Platform) -> Arc<Self> {
        Arc::new(Self {
            platform,
            failure: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(platform: Platform, message: &str) -> Arc<Self> {
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
                post_id: format!("{}-1", self.platform),
                url: format!("https://example.com/{}", self.platform),
            }),
        }
    }
}

/// In-memory store that yields to the scheduler after each automation read,
/// so futures joined on one task interleave the way separate requests would.
#[derive(Clone)]
pub struct YieldingStore(pub InMemoryStore);

#[async_trait]
impl VideoRepository for YieldingStore {
    async fn get_video(&self, id: &VideoId) -> ReelResult<Video> {
        self.0.get_video(id).await
    }

    async fn insert_video(&self, video: &Video) -> ReelResult<Video> {
        self.0.insert_video(video).await
    }

    async fn update_video(&self, video: &Video) -> ReelResult<Video> {
        self.0.update_video(video).await
    }

    async fn delete_video(&self, id: &VideoId) -> ReelResult<()> {
        self.0.delete_video(id).await
    }

    async fn list_series_videos(&self, series_id: &SeriesId) -> ReelResult<Vec<Video>> {
        self.0.list_series_videos(series_id).await
    }

    async fn active_video(&self, series_id: &SeriesId) -> ReelResult<Option<Video>> {
        self.0.active_video(series_id).await
    }
}

#[async_trait]
impl SeriesRepository for YieldingStore {
    async fn get_series(&self, id: &SeriesId) -> ReelResult<Series> {
        self.0.get_series(id).await
    }

    async fn insert_series(&self, series: &Series) -> ReelResult<()> {
        self.0.insert_series(series).await
    }

    async fn delete_series(&self, id: &SeriesId) -> ReelResult<()> {
        self.0.delete_series(id).await
    }
}

#[async_trait]
impl AutomationRepository for YieldingStore {
    async fn get_automation(&self, id: &AutomationId) -> ReelResult<Automation> {
        let automation = self.0.get_automation(id).await;
        tokio::task::yield_now().await;
        automation
    }

    async fn save_automation(&self, automation: &Automation) -> ReelResult<()> {
        self.0.save_automation(automation).await
    }

    async fn automation_for_series(&self, series_id: &SeriesId) -> ReelResult<Option<Automation>> {
        self.0.automation_for_series(series_id).await
    }

    async fn swap_series(
        &self,
        id: &AutomationId,
        expected: Option<&SeriesId>,
        series_id: Option<&SeriesId>,
    ) -> ReelResult<bool> {
        self.0.swap_series(id, expected, series_id).await
    }

    async fn record_run(&self, id: &AutomationId, at: DateTime<Utc>) -> ReelResult<()> {
        self.0.record_run(id, at).await
    }

    async fn replace_schedule(
        &self,
        id: &AutomationId,
        schedule: AutomationSchedule,
    ) -> ReelResult<bool> {
        self.0.replace_schedule(id, schedule).await
    }
}

#[async_trait]
impl CharacterRepository for YieldingStore {
    async fn get_character(&self, id: &CharacterId) -> ReelResult<Character> {
        self.0.get_character(id).await
    }
}

#[async_trait]
impl SocialAccountRepository for YieldingStore {
    async fn social_account(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> ReelResult<Option<SocialAccount>> {
        self.0.social_account(user_id, platform).await
    }
}

#[async_trait]
impl UserRepository for YieldingStore {
    async fn get_user(&self, id: &UserId) -> ReelResult<UserProfile> {
        self.0.get_user(id).await
    }
}

/// A lifecycle service wired to in-memory collaborators.
pub struct Harness {
    pub store: InMemoryStore,
    pub queue: InMemoryJobQueue,
    pub settings: StaticSettings,
    pub scripts: Arc<FixedScripts>,
    pub images: Arc<RecordingImages>,
    pub service: LifecycleService,
    pub trigger: AutomationTrigger,
    pub media: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_publisher(PublishOrchestrator::new(150))
    }

    pub fn with_publisher(publisher: PublishOrchestrator) -> Self {
        Self::build(publisher, |store| Arc::new(store) as Arc<dyn Store>)
    }

    /// Services see the store through [`YieldingStore`].
    pub fn yielding() -> Self {
        Self::build(PublishOrchestrator::new(150), |store| {
            Arc::new(YieldingStore(store)) as Arc<dyn Store>
        })
    }

    fn build(
        publisher: PublishOrchestrator,
        wrap: impl Fn(InMemoryStore) -> Arc<dyn Store>,
    ) -> Self {
        let store = InMemoryStore::new();
        let shared = wrap(store.clone());
        let queue = InMemoryJobQueue::new();
        let settings = StaticSettings::default();
        let scripts = Arc::new(FixedScripts::default());
        let images = Arc::new(RecordingImages::default());
        let media = TempDir::new().expect("temp dir");

        let catalog = StaticCatalog::new()
            .with_art_style(ArtStyle {
                id: STYLE.to_string(),
                name: "Watercolor".to_string(),
                prompt_modifier: "soft watercolor".to_string(),
                negative_prompt: "text, watermark".to_string(),
            })
            .with_niche(Niche {
                id: "history".to_string(),
                name: "History".to_string(),
                description: "forgotten events".to_string(),
            });
        let providers = ProviderRegistry::new()
            .with_script("openai", scripts.clone())
            .with_images("fal", images.clone());
        let planner = JobPlanner::new(
            shared.clone(),
            Arc::new(catalog),
            ProviderResolver::new(ProviderFallbacks::default()),
        );
        let service = LifecycleService::new(
            shared,
            Arc::new(queue.clone()),
            planner,
            Arc::new(providers),
            Arc::new(publisher),
            Arc::new(settings.clone()),
            MediaConfig::new(media.path()),
        );
        let trigger = AutomationTrigger::new(service.clone());
        Self {
            store,
            queue,
            settings,
            scripts,
            images,
            service,
            trigger,
            media,
        }
    }

    pub async fn series(&self) -> Series {
        let series = Series::builder()
            .user_id(UserId::from(OWNER))
            .name("Lost Harbors")
            .niche_id("history")
            .art_style_id(STYLE)
            .voice_id("narrator")
            .build()
            .expect("series");
        self.store.insert_series(&series).await.expect("insert series");
        series
    }

    pub async fn automation(&self, platforms: Vec<Platform>) -> Automation {
        let automation = Automation::builder()
            .user_id(UserId::from(OWNER))
            .name("Daily history")
            .niche_id("history")
            .art_style_id(STYLE)
            .voice_id("narrator")
            .target_platforms(platforms)
            .build()
            .expect("automation");
        self.store
            .save_automation(&automation)
            .await
            .expect("save automation");
        automation
    }

    pub async fn video(&self, series: &Series, status: VideoStatus) -> Video {
        self.insert(
            Video::builder()
                .series_id(series.id().clone())
                .user_id(series.user_id().clone())
                .status(status)
                .scenes(vec![Scene::new(
                    "Stored line.".to_string(),
                    "a quay".to_string(),
                )])
                .script_text(Some("Stored line.".to_string()))
                .title(Some("Stored title".to_string())),
        )
        .await
    }

    pub async fn review_video(&self, series: &Series, slots: usize) -> Video {
        self.insert(
            Video::builder()
                .series_id(series.id().clone())
                .user_id(series.user_id().clone())
                .status(VideoStatus::Review)
                .checkpoint(Some(review_checkpoint(slots))),
        )
        .await
    }

    /// A READY video whose assembled file exists under the media root.
    pub async fn ready_video(&self, series: &Series) -> Video {
        let file = self.media.path().join("final.mp4");
        std::fs::write(&file, b"mp4").expect("write video");
        self.insert(
            Video::builder()
                .series_id(series.id().clone())
                .user_id(series.user_id().clone())
                .status(VideoStatus::Ready)
                .title(Some("Harbor lights".to_string()))
                .video_url(Some("final.mp4".to_string())),
        )
        .await
    }

    async fn insert(&self, builder: &mut reelwright_core::VideoBuilder) -> Video {
        let video = builder.build().expect("video");
        self.store.insert_video(&video).await.expect("insert video")
    }

    pub async fn connect(&self, platform: Platform) {
        self.store
            .put_social_account(SocialAccount {
                user_id: UserId::from(OWNER),
                platform,
                access_token: "token".to_string(),
                expires_at: None,
                account_id: "acct".to_string(),
                display_name: "Owner".to_string(),
            })
            .await;
    }
}

pub fn review_checkpoint(slots: usize) -> Checkpoint {
    let paths = (0..slots).map(|i| format!("images/{i}.png")).collect();
    let prompts = (0..slots).map(|i| format!("prompt {i}")).collect();
    let timings = (0..slots as u64)
        .map(|i| Timing::new(i * 5000, (i + 1) * 5000))
        .collect();
    Checkpoint::Review {
        progress: StageProgress::new(None),
        audio: AudioTrack::new("audio/voice.mp3", slots as u64 * 5000).expect("audio"),
        images: ImageSet::new(paths, prompts, timings).expect("images"),
    }
}
