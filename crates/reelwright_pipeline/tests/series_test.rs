mod common;

use common::{Harness, OWNER};
use reelwright_core::{
    AudioTrack, AutomationSchedule, Checkpoint, ImageSet, ScheduleFrequency, StageProgress, Timing,
    Video, VideoStatus,
};
use reelwright_error::ReelErrorKind;
use reelwright_interface::{AutomationRepository, Caller, SeriesRepository, VideoRepository};

#[tokio::test]
async fn test_delete_series_removes_files_rows_and_binding() {
    let h = Harness::new();
    let automation = h.automation(Vec::new()).await;
    let triggered = h
        .trigger
        .trigger(automation.id(), &Caller::user(OWNER))
        .await
        .unwrap();
    h.service
        .stop(triggered.video.id(), &Caller::user(OWNER))
        .await
        .unwrap();
    let series = h.store.get_series(&triggered.series_id).await.unwrap();
    let ready = h.ready_video(&series).await;
    let file = h.media.path().join("final.mp4");
    assert!(file.exists());

    let deletion = h
        .service
        .delete_series(series.id(), &Caller::user(OWNER))
        .await
        .unwrap();

    assert_eq!(deletion.videos_deleted, 2);
    assert_eq!(deletion.files_removed, 1);
    assert!(!file.exists());
    assert!(h.store.get_video(ready.id()).await.is_err());
    let err = h.store.get_series(series.id()).await.unwrap_err();
    assert!(matches!(err.kind(), ReelErrorKind::NotFound { .. }));
    let stored = h.store.get_automation(automation.id()).await.unwrap();
    assert!(stored.series_id().is_none());
}

#[tokio::test]
async fn test_delete_series_tolerates_missing_files() {
    let h = Harness::new();
    let series = h.series().await;
    let video = h.review_video(&series, 2).await;

    let deletion = h
        .service
        .delete_series(series.id(), &Caller::user(OWNER))
        .await
        .unwrap();

    assert_eq!(deletion.videos_deleted, 1);
    assert_eq!(deletion.files_removed, 0);
    assert!(h.store.get_video(video.id()).await.is_err());
}

#[tokio::test]
async fn test_delete_series_keeps_shared_music_track() {
    let h = Harness::new();
    let music = h.media.path().join("music");
    std::fs::create_dir_all(&music).unwrap();
    std::fs::write(music.join("shared.mp3"), b"mp3").unwrap();
    let checkpoint = Checkpoint::Review {
        progress: StageProgress::new(Some("music/shared.mp3".to_string())),
        audio: AudioTrack::new("audio/voice.mp3", 5_000).unwrap(),
        images: ImageSet::new(
            vec!["images/0.png".to_string()],
            vec!["prompt".to_string()],
            vec![Timing::new(0, 5_000)],
        )
        .unwrap(),
    };
    let doomed = h.series().await;
    let kept = h.series().await;
    for series in [&doomed, &kept] {
        let video = Video::builder()
            .series_id(series.id().clone())
            .user_id(series.user_id().clone())
            .status(VideoStatus::Review)
            .checkpoint(Some(checkpoint.clone()))
            .build()
            .unwrap();
        h.store.insert_video(&video).await.unwrap();
    }

    let deletion = h
        .service
        .delete_series(doomed.id(), &Caller::user(OWNER))
        .await
        .unwrap();

    assert_eq!(deletion.videos_deleted, 1);
    assert_eq!(deletion.files_removed, 0);
    assert!(music.join("shared.mp3").exists());
    assert_eq!(h.store.list_series_videos(kept.id()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_series_requires_owner() {
    let h = Harness::new();
    let series = h.series().await;
    h.video(&series, VideoStatus::Ready).await;

    let err = h
        .service
        .delete_series(series.id(), &Caller::user("intruder"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ReelErrorKind::Forbidden(_)));
    assert_eq!(h.store.video_count().await, 1);
}

#[tokio::test]
async fn test_schedule_change_clears_last_run() {
    let h = Harness::new();
    let automation = h.automation(Vec::new()).await;
    h.trigger
        .trigger(automation.id(), &Caller::user(OWNER))
        .await
        .unwrap();
    let schedule = AutomationSchedule {
        frequency: ScheduleFrequency::Weekly,
        times: vec!["07:30".to_string()],
        timezone: "America/New_York".to_string(),
        enabled: true,
    };

    let changed = h
        .service
        .update_schedule(automation.id(), schedule.clone(), &Caller::user(OWNER))
        .await
        .unwrap();
    let unchanged = h
        .service
        .update_schedule(automation.id(), schedule.clone(), &Caller::user(OWNER))
        .await
        .unwrap();

    assert!(changed);
    assert!(!unchanged);
    let stored = h.store.get_automation(automation.id()).await.unwrap();
    assert_eq!(stored.schedule(), &schedule);
    assert!(stored.last_run_at().is_none());
}

#[tokio::test]
async fn test_invalid_schedule_is_rejected() {
    let h = Harness::new();
    let automation = h.automation(Vec::new()).await;
    let schedule = AutomationSchedule {
        times: vec!["7:30pm".to_string()],
        ..AutomationSchedule::default()
    };

    let err = h
        .service
        .update_schedule(automation.id(), schedule, &Caller::user(OWNER))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ReelErrorKind::Validation { field, .. } if field == "times"));
}
