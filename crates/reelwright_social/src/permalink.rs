//! Permalink resolution with bounded polling.

use reelwright_error::ReelResult;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Poll for a permalink, sleeping before each attempt.
///
/// A platform may still be processing a fresh post, so a missing permalink or
/// a failed lookup only means "not yet". When every attempt comes back empty
/// the deterministic `fallback` is returned instead of failing the publish.
pub async fn resolve_permalink<F, Fut>(delays: &[Duration], mut poll: F, fallback: String) -> String
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ReelResult<Option<String>>>,
{
    for (attempt, delay) in delays.iter().enumerate() {
        tokio::time::sleep(*delay).await;
        match poll().await {
            Ok(Some(url)) if !url.trim().is_empty() => {
                debug!(attempt = attempt + 1, url = %url, "Permalink resolved");
                return url;
            }
            Ok(_) => debug!(attempt = attempt + 1, "Permalink not ready"),
            Err(e) => warn!(attempt = attempt + 1, error = %e, "Permalink lookup failed"),
        }
    }
    debug!(fallback = %fallback, "Permalink polling exhausted, using fallback");
    fallback
}
