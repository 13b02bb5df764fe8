//! YouTube Shorts publishing through a resumable upload session.

use crate::http::{field, send, send_json, with_retry};
use crate::{PublishConfig, PublishRequest, PublishedPost, VideoPublisher, publish_error};
use async_trait::async_trait;
use reelwright_core::{Platform, SocialAccount};
use reelwright_error::ReelResult;
use reqwest::Client;
use reqwest::header::LOCATION;
use serde_json::json;
use tokio_retry2::RetryError;
use tracing::{debug, info, instrument};

const PLATFORM: Platform = Platform::Youtube;

/// Public URL of a Short.
pub fn youtube_shorts_url(video_id: &str) -> String {
    format!("https://youtube.com/shorts/{video_id}")
}

/// Uploads to the channel authorized by the account's token.
#[derive(Debug, Clone)]
pub struct YoutubePublisher {
    client: Client,
    config: PublishConfig,
}

impl YoutubePublisher {
    /// Publisher using a shared HTTP client.
    pub fn new(client: Client, config: PublishConfig) -> Self {
        Self { client, config }
    }

    #[instrument(skip(self, token, request))]
    async fn open_session(
        &self,
        token: &str,
        request: &PublishRequest,
        size: usize,
    ) -> ReelResult<String> {
        let url = format!(
            "{}/upload/youtube/v3/videos",
            self.config.youtube_upload_base.trim_end_matches('/')
        );
        let title = if request.title().contains("#shorts") {
            request.title().clone()
        } else {
            format!("{} #shorts", request.title())
        };
        let metadata = json!({
            "snippet": {
                "title": title,
                "description": request.caption(),
                "categoryId": "22",
            },
            "status": {
                "privacyStatus": "public",
                "selfDeclaredMadeForKids": false,
            },
        });

        with_retry(&self.config, "youtube.session", || {
            let request = self
                .client
                .post(&url)
                .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
                .bearer_auth(token)
                .header("X-Upload-Content-Type", "video/mp4")
                .header("X-Upload-Content-Length", size.to_string())
                .json(&metadata);
            async move {
                let response = send(PLATFORM, request).await?;
                response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        RetryError::Permanent(publish_error(
                            PLATFORM,
                            "upload session returned no location",
                        ))
                    })
            }
        })
        .await
    }
}

#[async_trait]
impl VideoPublisher for YoutubePublisher {
    fn platform(&self) -> Platform {
        PLATFORM
    }

    #[instrument(skip(self, account, request), fields(channel = %account.account_id))]
    async fn publish(
        &self,
        account: &SocialAccount,
        request: &PublishRequest,
    ) -> ReelResult<PublishedPost> {
        let token = account.access_token.as_str();
        let bytes = request.read_video().await?;
        let session_url = self.open_session(token, request, bytes.len()).await?;
        debug!("Resumable session opened");

        let body = with_retry(&self.config, "youtube.upload", || {
            let upload = self
                .client
                .put(&session_url)
                .bearer_auth(token)
                .header("Content-Type", "video/mp4")
                .body(bytes.clone());
            send_json(PLATFORM, upload)
        })
        .await?;
        let video_id = field(PLATFORM, &body, "id")?;

        let url = youtube_shorts_url(&video_id);
        info!(video_id = %video_id, url = %url, "Published YouTube Short");
        Ok(PublishedPost {
            post_id: video_id,
            url,
        })
    }
}
