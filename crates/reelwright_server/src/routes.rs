//! HTTP routes.

use crate::{ApiResult, AppState, Authenticated};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use reelwright_core::{AutomationId, AutomationSchedule, Capability, Platform, SeriesId, VideoId};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_pipeline::{SeriesDeletion, Submission, TriggerOutcome};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::str::FromStr;

/// Body of `POST /videos/{id}/assemble`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembleBody {
    /// Image slots to keep; all when absent.
    #[serde(default)]
    pub scene_indices: Option<Vec<usize>>,
}

/// Body of `POST /videos/{id}/regenerate-image`.
#[derive(Debug, Deserialize)]
pub struct RegenerateImageBody {
    /// Slot to replace.
    pub index: usize,
    /// New image prompt.
    pub prompt: String,
}

/// Body of the publish and reset-posted routes.
#[derive(Debug, Default, Deserialize)]
pub struct PlatformsBody {
    /// Platforms to act on; the default set when absent.
    #[serde(default)]
    pub platforms: Option<Vec<Platform>>,
}

/// Body of `POST /videos/{id}/manual-link`.
#[derive(Debug, Deserialize)]
pub struct ManualLinkBody {
    /// Platform the post lives on.
    pub platform: Platform,
    /// Public post URL.
    pub url: String,
}

fn invalid_body(e: serde_json::Error) -> ReelError {
    ReelError::new(ReelErrorKind::validation("body", e.to_string()))
}

/// Parse a required JSON body.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ReelResult<T> {
    serde_json::from_slice(body).map_err(invalid_body)
}

/// Parse an optional JSON body; an empty body means the default.
fn parse_optional<T: DeserializeOwned + Default>(body: &Bytes) -> ReelResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_body(body)
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/automations/:id/trigger", post(trigger))
        .route("/automations/:id/schedule", put(update_schedule))
        .route("/videos/:id", get(get_video))
        .route("/videos/:id/stop", post(stop))
        .route("/videos/:id/retry", post(retry))
        .route("/videos/:id/assemble", post(assemble))
        .route("/videos/:id/regenerate-image", post(regenerate_image))
        .route("/videos/:id/publish", post(publish))
        .route("/videos/:id/reset-posted", post(reset_posted))
        .route("/videos/:id/manual-link", post(manual_link))
        .route("/series/:id", delete(delete_series))
        .route("/providers/:capability", get(provider_choices))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn trigger(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<TriggerOutcome>)> {
    let outcome = state
        .trigger
        .trigger(&AutomationId::from(id.as_str()), &caller)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}

async fn update_schedule(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<serde_json::Value>> {
    let schedule: AutomationSchedule = parse_body(&body)?;
    let changed = state
        .lifecycle
        .update_schedule(&AutomationId::from(id.as_str()), schedule, &caller)
        .await?;
    Ok(Json(json!({ "changed": changed })))
}

async fn get_video(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let video = state
        .lifecycle
        .get_video(&VideoId::from(id.as_str()), &caller)
        .await?;
    Ok(Json(video))
}

async fn stop(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let video = state
        .lifecycle
        .stop(&VideoId::from(id.as_str()), &caller)
        .await?;
    Ok(Json(video))
}

async fn retry(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    let submission = state
        .lifecycle
        .retry(&VideoId::from(id.as_str()), &caller)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(submission)))
}

async fn assemble(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    let body: AssembleBody = parse_optional(&body)?;
    let submission = state
        .lifecycle
        .assemble(&VideoId::from(id.as_str()), body.scene_indices, &caller)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(submission)))
}

async fn regenerate_image(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let body: RegenerateImageBody = parse_body(&body)?;
    let video = state
        .lifecycle
        .regenerate_image(&VideoId::from(id.as_str()), body.index, &body.prompt, &caller)
        .await?;
    Ok(Json(video))
}

async fn publish(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let body: PlatformsBody = parse_optional(&body)?;
    let video = state
        .lifecycle
        .publish(&VideoId::from(id.as_str()), body.platforms, &caller)
        .await?;
    Ok(Json(video))
}

async fn reset_posted(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let body: PlatformsBody = parse_optional(&body)?;
    let video = state
        .lifecycle
        .reset_posted(&VideoId::from(id.as_str()), body.platforms, &caller)
        .await?;
    Ok(Json(video))
}

async fn manual_link(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let body: ManualLinkBody = parse_body(&body)?;
    let video = state
        .lifecycle
        .update_manual_link(&VideoId::from(id.as_str()), body.platform, &body.url, &caller)
        .await?;
    Ok(Json(video))
}

async fn delete_series(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<SeriesDeletion>> {
    let deletion = state
        .lifecycle
        .delete_series(&SeriesId::from(id.as_str()), &caller)
        .await?;
    Ok(Json(deletion))
}

async fn provider_choices(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(capability): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let capability = Capability::from_str(&capability).map_err(|_| {
        ReelError::new(ReelErrorKind::validation(
            "capability",
            format!("unknown capability {capability:?}"),
        ))
    })?;
    let providers = state.lifecycle.provider_choices(capability).await?;
    Ok(Json(json!({
        "capability": capability.to_string(),
        "providers": providers,
    })))
}
