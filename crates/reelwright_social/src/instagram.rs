//! Instagram Reels publishing through the Graph API.
//!
//! Instagram pulls the video from a public URL into a media container, which
//! is polled until processing finishes and then published. The permalink is
//! polled the same way as Facebook's.

use crate::http::{field, into_inner, send_json, with_retry};
use crate::{
    PublishConfig, PublishRequest, PublishedPost, VideoPublisher, publish_error, resolve_permalink,
};
use async_trait::async_trait;
use reelwright_core::{Platform, SocialAccount};
use reelwright_error::ReelResult;
use reqwest::Client;
use tracing::{debug, info, instrument};

const PLATFORM: Platform = Platform::Instagram;

/// Deterministic reel URL used when the permalink never resolves.
pub fn instagram_fallback_url(media_id: &str) -> String {
    format!("https://www.instagram.com/reel/{media_id}/")
}

/// Publishes to the Instagram business account named by `account_id`.
#[derive(Debug, Clone)]
pub struct InstagramPublisher {
    client: Client,
    config: PublishConfig,
}

impl InstagramPublisher {
    /// Publisher using a shared HTTP client.
    pub fn new(client: Client, config: PublishConfig) -> Self {
        Self { client, config }
    }

    #[instrument(skip(self, token, caption))]
    async fn create_container(
        &self,
        ig_user_id: &str,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> ReelResult<String> {
        let url = self.config.graph_url(&format!("{ig_user_id}/media"));
        let body = with_retry(&self.config, "instagram.container", || {
            let request = self.client.post(&url).form(&[
                ("media_type", "REELS"),
                ("video_url", video_url),
                ("caption", caption),
                ("access_token", token),
            ]);
            send_json(PLATFORM, request)
        })
        .await?;
        field(PLATFORM, &body, "id")
    }

    /// Wait for the container to leave `IN_PROGRESS`.
    #[instrument(skip(self, token))]
    async fn await_container(&self, container_id: &str, token: &str) -> ReelResult<()> {
        let url = self.config.graph_url(container_id);
        for delay in self.config.container_poll_delays() {
            tokio::time::sleep(delay).await;
            let request = self
                .client
                .get(&url)
                .query(&[("fields", "status_code,status"), ("access_token", token)]);
            let body = send_json(PLATFORM, request).await.map_err(into_inner)?;
            match body["status_code"].as_str().unwrap_or_default() {
                "FINISHED" => return Ok(()),
                "ERROR" | "EXPIRED" => {
                    let status = body["status"].as_str().unwrap_or("unknown error");
                    return Err(publish_error(
                        PLATFORM,
                        format!("video processing failed: {status}"),
                    ));
                }
                other => debug!(status = other, "Container still processing"),
            }
        }
        Err(publish_error(
            PLATFORM,
            "video processing failed: container did not finish in time",
        ))
    }

    #[instrument(skip(self, token))]
    async fn publish_container(
        &self,
        ig_user_id: &str,
        container_id: &str,
        token: &str,
    ) -> ReelResult<String> {
        let url = self.config.graph_url(&format!("{ig_user_id}/media_publish"));
        let body = with_retry(&self.config, "instagram.publish", || {
            let request = self
                .client
                .post(&url)
                .form(&[("creation_id", container_id), ("access_token", token)]);
            send_json(PLATFORM, request)
        })
        .await?;
        field(PLATFORM, &body, "id")
    }

    async fn permalink(&self, media_id: &str, token: &str) -> ReelResult<Option<String>> {
        let request = self
            .client
            .get(self.config.graph_url(media_id))
            .query(&[("fields", "permalink"), ("access_token", token)]);
        let body = send_json(PLATFORM, request).await.map_err(into_inner)?;
        Ok(body["permalink"].as_str().map(str::to_string))
    }
}

#[async_trait]
impl VideoPublisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        PLATFORM
    }

    #[instrument(skip(self, account, request), fields(ig_user_id = %account.account_id))]
    async fn publish(
        &self,
        account: &SocialAccount,
        request: &PublishRequest,
    ) -> ReelResult<PublishedPost> {
        let token = account.access_token.as_str();
        let ig_user_id = account.account_id.as_str();
        let video_url = request.public_url().as_deref().ok_or_else(|| {
            publish_error(
                PLATFORM,
                "upload failed: Instagram needs a publicly reachable video URL",
            )
        })?;

        let container_id = self
            .create_container(ig_user_id, token, video_url, request.caption())
            .await?;
        self.await_container(&container_id, token).await?;
        let media_id = self.publish_container(ig_user_id, &container_id, token).await?;

        let url = resolve_permalink(
            &self.config.permalink_delays(),
            || self.permalink(&media_id, token),
            instagram_fallback_url(&media_id),
        )
        .await;
        info!(media_id = %media_id, url = %url, "Published Instagram reel");
        Ok(PublishedPost {
            post_id: media_id,
            url,
        })
    }
}
