//! Publishing configuration.
//!
//! Loaded as the `[publish]` table of the server configuration:
//!
//! ```toml
//! [publish]
//! graph_api_base = "https://graph.facebook.com"
//! graph_api_version = "v19.0"
//! permalink_delays_ms = [3000, 5000, 5000]
//! error_excerpt_chars = 150
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints, polling delays and retry limits for the platform publishers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Facebook Graph API host, shared by Facebook and Instagram.
    pub graph_api_base: String,

    /// Graph API version path segment.
    pub graph_api_version: String,

    /// Google upload host for YouTube resumable uploads.
    pub youtube_upload_base: String,

    /// Waits before each permalink poll.
    pub permalink_delays_ms: Vec<u64>,

    /// Waits before each Instagram container status poll.
    pub container_poll_delays_ms: Vec<u64>,

    /// How much of the raw vendor error to keep in classified messages.
    pub error_excerpt_chars: usize,

    /// First backoff for transient HTTP failures.
    pub retry_initial_ms: u64,

    /// Retries after the first attempt for transient HTTP failures.
    pub retry_attempts: usize,

    /// Backoff ceiling.
    pub retry_max_delay_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            graph_api_base: "https://graph.facebook.com".to_string(),
            graph_api_version: "v19.0".to_string(),
            youtube_upload_base: "https://www.googleapis.com".to_string(),
            permalink_delays_ms: vec![3_000, 5_000, 5_000],
            container_poll_delays_ms: vec![3_000; 20],
            error_excerpt_chars: 150,
            retry_initial_ms: 500,
            retry_attempts: 2,
            retry_max_delay_secs: 10,
        }
    }
}

impl PublishConfig {
    /// Permalink poll delays as durations.
    pub fn permalink_delays(&self) -> Vec<Duration> {
        self.permalink_delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }

    /// Container poll delays as durations.
    pub fn container_poll_delays(&self) -> Vec<Duration> {
        self.container_poll_delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }

    /// `{graph_api_base}/{graph_api_version}/{path}`.
    pub fn graph_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.graph_api_base.trim_end_matches('/'),
            self.graph_api_version,
            path.trim_start_matches('/')
        )
    }

    /// Configuration that never sleeps or retries, for tests against local mocks.
    pub fn immediate() -> Self {
        Self {
            permalink_delays_ms: vec![0, 0, 0],
            container_poll_delays_ms: vec![0, 0, 0],
            retry_attempts: 0,
            ..Self::default()
        }
    }
}
