//! HTTP plumbing shared by the platform publishers.

use crate::{PublishConfig, publish_error};
use reelwright_core::Platform;
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// Best human-readable message in a vendor error body.
///
/// Graph and Google APIs both nest it under `error.message`; Google adds a
/// machine reason under `error.errors[0].reason`.
pub(crate) fn vendor_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let error = &json["error"];
        if let Some(message) = error["message"].as_str().or_else(|| error.as_str()) {
            return match error["errors"][0]["reason"].as_str() {
                Some(reason) => format!("{message} ({reason})"),
                None => message.to_string(),
            };
        }
    }
    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.trim().to_string()
    }
}

/// Send a request, mapping transport errors and non-2xx statuses.
///
/// Connection failures and 5xx responses come back as transient.
pub(crate) async fn send(
    platform: Platform,
    request: RequestBuilder,
) -> Result<Response, RetryError<ReelError>> {
    let response = request.send().await.map_err(|e| {
        warn!(platform = %platform, error = %e, "Request failed to send");
        RetryError::Transient {
            err: ReelError::new(ReelErrorKind::Http(e.to_string())),
            retry_after: None,
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = publish_error(platform, vendor_message(status, &body));
    warn!(platform = %platform, status = %status, error = %err, "Platform API returned error");
    if status.is_server_error() {
        Err(RetryError::Transient {
            err,
            retry_after: None,
        })
    } else {
        Err(RetryError::Permanent(err))
    }
}

/// Send a request and parse the JSON body. Parse failures are permanent.
pub(crate) async fn send_json(
    platform: Platform,
    request: RequestBuilder,
) -> Result<Value, RetryError<ReelError>> {
    let response = send(platform, request).await?;
    response.json::<Value>().await.map_err(|e| {
        RetryError::Permanent(publish_error(
            platform,
            format!("unreadable response: {e}"),
        ))
    })
}

/// Drop the retry classification once retrying is over.
pub(crate) fn into_inner<E>(e: RetryError<E>) -> E {
    match e {
        RetryError::Permanent(err) => err,
        RetryError::Transient { err, .. } => err,
    }
}

/// Run one API step, retrying transient failures with exponential backoff.
pub(crate) async fn with_retry<T, F, Fut>(config: &PublishConfig, step: &str, action: F) -> ReelResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryError<ReelError>>>,
{
    let strategy = ExponentialBackoff::from_millis(config.retry_initial_ms.max(1))
        .factor(2)
        .max_delay(Duration::from_secs(config.retry_max_delay_secs))
        .map(jitter)
        .take(config.retry_attempts);
    debug!(step, retries = config.retry_attempts, "Running API step");
    Retry::spawn(strategy, action).await
}

/// A required string field of a JSON response.
pub(crate) fn field(platform: Platform, value: &Value, name: &str) -> ReelResult<String> {
    match &value[name] {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(publish_error(
            platform,
            format!("response is missing `{name}`: {value}"),
        )),
    }
}
