mod common;

use common::{Harness, OWNER, StubPublisher};
use reelwright_core::{Platform, VideoStatus};
use reelwright_error::ReelErrorKind;
use reelwright_interface::{Caller, SeriesRepository, VideoRepository};
use reelwright_social::PublishOrchestrator;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn owner() -> Caller {
    Caller::user(OWNER)
}

fn orchestrator(publishers: &[Arc<StubPublisher>]) -> PublishOrchestrator {
    let mut orchestrator = PublishOrchestrator::new(40);
    for publisher in publishers {
        orchestrator.register(publisher.clone());
    }
    orchestrator
}

#[tokio::test]
async fn test_partial_failure_leaves_video_ready() {
    let youtube = StubPublisher::ok(Platform::Youtube);
    let facebook = StubPublisher::failing(Platform::Facebook, "(#4) Application request limit reached");
    let h = Harness::with_publisher(orchestrator(&[youtube.clone(), facebook.clone()]));
    h.connect(Platform::Youtube).await;
    h.connect(Platform::Facebook).await;
    let series = h.series().await;
    let video = h.ready_video(&series).await;

    let published = h
        .service
        .publish(video.id(), Some(vec![Platform::Facebook]), &owner())
        .await
        .unwrap();

    assert_eq!(*published.status(), VideoStatus::Ready);
    let entry = published.posted_platforms().get(Platform::Facebook).unwrap();
    assert!(!entry.success);
    assert!(entry.error.as_deref().unwrap().contains("rate limit"));
    assert_eq!(youtube.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_republish_replaces_entry_and_posts() {
    let youtube = StubPublisher::ok(Platform::Youtube);
    let instagram = StubPublisher::failing(Platform::Instagram, "Media upload has failed");
    let h = Harness::with_publisher(orchestrator(&[youtube.clone(), instagram.clone()]));
    h.connect(Platform::Youtube).await;
    h.connect(Platform::Instagram).await;
    let series = h.series().await;
    let video = h.ready_video(&series).await;

    h.service
        .publish(video.id(), Some(vec![Platform::Instagram]), &owner())
        .await
        .unwrap();
    let published = h
        .service
        .publish(
            video.id(),
            Some(vec![Platform::Youtube, Platform::Instagram, Platform::Youtube]),
            &owner(),
        )
        .await
        .unwrap();

    assert_eq!(*published.status(), VideoStatus::Posted);
    assert_eq!(published.posted_platforms().len(), 2);
    assert!(published.posted_platforms().is_posted(Platform::Youtube));
    assert!(!published.posted_platforms().is_posted(Platform::Instagram));
    assert_eq!(youtube.calls.load(Ordering::SeqCst), 1);
    assert_eq!(instagram.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_publish_defaults_to_automation_targets() {
    let youtube = StubPublisher::ok(Platform::Youtube);
    let h = Harness::with_publisher(orchestrator(&[youtube.clone()]));
    h.connect(Platform::Youtube).await;
    let automation = h.automation(vec![Platform::Youtube]).await;
    let triggered = h.trigger.trigger(automation.id(), &owner()).await.unwrap();
    h.service.stop(triggered.video.id(), &owner()).await.unwrap();
    let series = h.store.get_series(&triggered.series_id).await.unwrap();
    let video = h.ready_video(&series).await;

    let published = h.service.publish(video.id(), None, &owner()).await.unwrap();

    assert_eq!(*published.status(), VideoStatus::Posted);
    assert!(published.posted_platforms().is_posted(Platform::Youtube));
    assert_eq!(youtube.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_publish_without_targets_is_a_validation_error() {
    let h = Harness::new();
    let series = h.series().await;
    let video = h.ready_video(&series).await;

    let err = h.service.publish(video.id(), None, &owner()).await.unwrap_err();

    assert!(matches!(err.kind(), ReelErrorKind::Validation { field, .. } if field == "platforms"));
}

#[tokio::test]
async fn test_publish_requires_assembled_video() {
    let h = Harness::new();
    let series = h.series().await;
    let video = h.video(&series, VideoStatus::Review).await;

    let err = h
        .service
        .publish(video.id(), Some(vec![Platform::Youtube]), &owner())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ReelErrorKind::StateConflict(_)));
}

#[tokio::test]
async fn test_unconnected_platform_is_recorded_as_failure() {
    let h = Harness::with_publisher(orchestrator(&[StubPublisher::ok(Platform::Youtube)]));
    let series = h.series().await;
    let video = h.ready_video(&series).await;

    let published = h
        .service
        .publish(video.id(), Some(vec![Platform::Youtube]), &owner())
        .await
        .unwrap();

    let entry = published.posted_platforms().get(Platform::Youtube).unwrap();
    assert!(entry.error.as_deref().unwrap().starts_with("No YouTube account"));
}

#[tokio::test]
async fn test_reset_posted_subset_then_all() {
    let h = Harness::with_publisher(orchestrator(&[
        StubPublisher::ok(Platform::Youtube),
        StubPublisher::ok(Platform::Facebook),
    ]));
    h.connect(Platform::Youtube).await;
    h.connect(Platform::Facebook).await;
    let series = h.series().await;
    let video = h.ready_video(&series).await;
    h.service
        .publish(
            video.id(),
            Some(vec![Platform::Youtube, Platform::Facebook]),
            &owner(),
        )
        .await
        .unwrap();

    let partial = h
        .service
        .reset_posted(video.id(), Some(vec![Platform::Facebook]), &owner())
        .await
        .unwrap();
    assert_eq!(*partial.status(), VideoStatus::Posted);
    assert_eq!(partial.posted_platforms().posted_platforms(), vec![Platform::Youtube]);

    let cleared = h
        .service
        .reset_posted(video.id(), Some(Vec::new()), &owner())
        .await
        .unwrap();
    assert_eq!(*cleared.status(), VideoStatus::Ready);
    assert!(cleared.posted_platforms().is_empty());
}

#[tokio::test]
async fn test_manual_link_upserts_and_marks_posted() {
    let h = Harness::new();
    let series = h.series().await;
    let video = h.ready_video(&series).await;

    h.service
        .update_manual_link(
            video.id(),
            Platform::Youtube,
            "https://youtu.be/abc123",
            &owner(),
        )
        .await
        .unwrap();
    let updated = h
        .service
        .update_manual_link(
            video.id(),
            Platform::Youtube,
            " https://www.youtube.com/shorts/xyz789 ",
            &owner(),
        )
        .await
        .unwrap();

    assert_eq!(*updated.status(), VideoStatus::Posted);
    assert_eq!(updated.posted_platforms().len(), 1);
    let entry = updated.posted_platforms().get(Platform::Youtube).unwrap();
    assert!(entry.manual_url);
    assert_eq!(
        entry.url.as_deref(),
        Some("https://www.youtube.com/shorts/xyz789")
    );
}

#[tokio::test]
async fn test_manual_link_rejects_foreign_url_without_mutation() {
    let h = Harness::new();
    let series = h.series().await;
    let video = h.ready_video(&series).await;

    let err = h
        .service
        .update_manual_link(
            video.id(),
            Platform::Youtube,
            "https://vimeo.com/123",
            &owner(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ReelErrorKind::Validation { field, .. } if field == "url"));
    let stored = h.store.get_video(video.id()).await.unwrap();
    assert_eq!(*stored.status(), VideoStatus::Ready);
    assert!(stored.posted_platforms().is_empty());
}
