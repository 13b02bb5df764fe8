//! Facebook Reels publishing through the Graph API.
//!
//! Three phases against `/{page_id}/video_reels`: `start` returns a video id
//! and upload URL, the bytes go to that URL, and `finish` publishes with the
//! caption. The permalink is then polled while Facebook transcodes.

use crate::http::{field, into_inner, send_json, with_retry};
use crate::{
    PublishConfig, PublishRequest, PublishedPost, VideoPublisher, publish_error, resolve_permalink,
};
use async_trait::async_trait;
use reelwright_core::{Platform, SocialAccount};
use reelwright_error::ReelResult;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument};

const PLATFORM: Platform = Platform::Facebook;

/// Deterministic reel URL used when the permalink never resolves.
pub fn facebook_fallback_url(video_id: &str) -> String {
    format!("https://www.facebook.com/reel/{video_id}")
}

/// Publishes Facebook Reels to the page named by the account's `account_id`.
#[derive(Debug, Clone)]
pub struct FacebookPublisher {
    client: Client,
    config: PublishConfig,
}

impl FacebookPublisher {
    /// Publisher using a shared HTTP client.
    pub fn new(client: Client, config: PublishConfig) -> Self {
        Self { client, config }
    }

    #[instrument(skip(self, token))]
    async fn start(&self, page_id: &str, token: &str) -> ReelResult<(String, String)> {
        let url = self.config.graph_url(&format!("{page_id}/video_reels"));
        let body = with_retry(&self.config, "facebook.start", || {
            let request = self
                .client
                .post(&url)
                .form(&[("upload_phase", "start"), ("access_token", token)]);
            send_json(PLATFORM, request)
        })
        .await?;
        let video_id = field(PLATFORM, &body, "video_id")?;
        let upload_url = field(PLATFORM, &body, "upload_url")?;
        debug!(video_id = %video_id, "Upload session started");
        Ok((video_id, upload_url))
    }

    #[instrument(skip(self, token, bytes), fields(size = bytes.len()))]
    async fn transfer(&self, upload_url: &str, token: &str, bytes: Vec<u8>) -> ReelResult<()> {
        let size = bytes.len().to_string();
        let body = with_retry(&self.config, "facebook.transfer", || {
            let request = self
                .client
                .post(upload_url)
                .header("Authorization", format!("OAuth {token}"))
                .header("offset", "0")
                .header("file_size", size.as_str())
                .body(bytes.clone());
            send_json(PLATFORM, request)
        })
        .await?;
        ensure_success(&body, "video upload was not accepted")
    }

    #[instrument(skip(self, token, caption))]
    async fn finish(&self, page_id: &str, video_id: &str, token: &str, caption: &str) -> ReelResult<()> {
        let url = self.config.graph_url(&format!("{page_id}/video_reels"));
        let body = with_retry(&self.config, "facebook.finish", || {
            let request = self.client.post(&url).form(&[
                ("upload_phase", "finish"),
                ("video_id", video_id),
                ("video_state", "PUBLISHED"),
                ("description", caption),
                ("access_token", token),
            ]);
            send_json(PLATFORM, request)
        })
        .await?;
        ensure_success(&body, "publishing did not finish")
    }

    async fn permalink(&self, video_id: &str, token: &str) -> ReelResult<Option<String>> {
        let url = self.config.graph_url(video_id);
        let request = self
            .client
            .get(&url)
            .query(&[("fields", "permalink_url"), ("access_token", token)]);
        let body = send_json(PLATFORM, request).await.map_err(into_inner)?;
        Ok(body["permalink_url"].as_str().map(absolute_facebook_url))
    }
}

fn ensure_success(body: &Value, message: &str) -> ReelResult<()> {
    if body["success"].as_bool().unwrap_or(false) {
        Ok(())
    } else {
        Err(publish_error(PLATFORM, format!("{message}: {body}")))
    }
}

fn absolute_facebook_url(permalink: &str) -> String {
    if permalink.starts_with("http") {
        permalink.to_string()
    } else {
        format!("https://www.facebook.com/{}", permalink.trim_start_matches('/'))
    }
}

#[async_trait]
impl VideoPublisher for FacebookPublisher {
    fn platform(&self) -> Platform {
        PLATFORM
    }

    #[instrument(skip(self, account, request), fields(page_id = %account.account_id))]
    async fn publish(
        &self,
        account: &SocialAccount,
        request: &PublishRequest,
    ) -> ReelResult<PublishedPost> {
        let token = account.access_token.as_str();
        let page_id = account.account_id.as_str();
        let bytes = request.read_video().await?;

        let (video_id, upload_url) = self.start(page_id, token).await?;
        self.transfer(&upload_url, token, bytes).await?;
        self.finish(page_id, &video_id, token, request.caption()).await?;

        let url = resolve_permalink(
            &self.config.permalink_delays(),
            || self.permalink(&video_id, token),
            facebook_fallback_url(&video_id),
        )
        .await;
        info!(video_id = %video_id, url = %url, "Published Facebook reel");
        Ok(PublishedPost {
            post_id: video_id,
            url,
        })
    }
}
