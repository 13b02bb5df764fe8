use mockito::{Matcher, Server};
use reelwright_core::{Platform, SocialAccount, UserId};
use reelwright_error::ReelErrorKind;
use reelwright_social::{
    FacebookPublisher, PublishConfig, PublishRequest, VideoPublisher, facebook_fallback_url,
};
use serde_json::json;
use std::io::Write;

fn account() -> SocialAccount {
    SocialAccount {
        user_id: UserId::from("user-1"),
        platform: Platform::Facebook,
        access_token: "page-token".to_string(),
        expires_at: None,
        account_id: "page-1".to_string(),
        display_name: "My Page".to_string(),
    }
}

fn video_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"fake mp4 bytes").expect("write video");
    file
}

fn publisher(server: &Server) -> FacebookPublisher {
    let config = PublishConfig {
        graph_api_base: server.url(),
        ..PublishConfig::immediate()
    };
    FacebookPublisher::new(reqwest::Client::new(), config)
}

async fn mock_upload(server: &mut Server) -> Vec<mockito::Mock> {
    let start = server
        .mock("POST", "/v19.0/page-1/video_reels")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("upload_phase".into(), "start".into()),
            Matcher::UrlEncoded("access_token".into(), "page-token".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "video_id": "video-1",
                "upload_url": format!("{}/upload/video-1", server.url()),
            })
            .to_string(),
        )
        .create_async()
        .await;
    let transfer = server
        .mock("POST", "/upload/video-1")
        .match_header("authorization", "OAuth page-token")
        .match_header("offset", "0")
        .match_header("file_size", "14")
        .match_body("fake mp4 bytes")
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;
    let finish = server
        .mock("POST", "/v19.0/page-1/video_reels")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("upload_phase".into(), "finish".into()),
            Matcher::UrlEncoded("video_id".into(), "video-1".into()),
            Matcher::UrlEncoded("video_state".into(), "PUBLISHED".into()),
            Matcher::UrlEncoded("description".into(), "Watch this".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;
    vec![start, transfer, finish]
}

#[tokio::test]
async fn test_three_phase_upload_with_permalink() {
    let mut server = Server::new_async().await;
    let upload = mock_upload(&mut server).await;
    let permalink = server
        .mock("GET", "/v19.0/video-1")
        .match_query(Matcher::UrlEncoded("fields".into(), "permalink_url".into()))
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "video-1", "permalink_url": "/reel/987654"}"#)
        .create_async()
        .await;

    let file = video_file();
    let request = PublishRequest::new(file.path(), None, "Title", "Watch this");
    let post = publisher(&server).publish(&account(), &request).await.unwrap();

    assert_eq!(post.post_id, "video-1");
    assert_eq!(post.url, "https://www.facebook.com/reel/987654");
    for mock in upload {
        mock.assert_async().await;
    }
    permalink.assert_async().await;
}

#[tokio::test]
async fn test_permalink_falls_back_when_never_ready() {
    let mut server = Server::new_async().await;
    let _upload = mock_upload(&mut server).await;
    let permalink = server
        .mock("GET", "/v19.0/video-1")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "video-1"}"#)
        .expect(3)
        .create_async()
        .await;

    let file = video_file();
    let request = PublishRequest::new(file.path(), None, "Title", "Watch this");
    let post = publisher(&server).publish(&account(), &request).await.unwrap();

    assert_eq!(post.url, facebook_fallback_url("video-1"));
    permalink.assert_async().await;
}

#[tokio::test]
async fn test_start_failure_carries_vendor_message() {
    let mut server = Server::new_async().await;
    let _start = server
        .mock("POST", "/v19.0/page-1/video_reels")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error": {"message": "(#4) Application request limit reached", "code": 4}}"#,
        )
        .create_async()
        .await;

    let file = video_file();
    let request = PublishRequest::new(file.path(), None, "Title", "Watch this");
    let err = publisher(&server)
        .publish(&account(), &request)
        .await
        .unwrap_err();

    match err.kind() {
        ReelErrorKind::Publish { platform, message } => {
            assert_eq!(platform, "Facebook");
            assert_eq!(message, "(#4) Application request limit reached");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_video_file_fails_before_any_request() {
    let server = Server::new_async().await;
    let request = PublishRequest::new("/nonexistent/video.mp4", None, "Title", "Caption");
    let err = publisher(&server)
        .publish(&account(), &request)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ReelErrorKind::Io(_)));
}
