//! Caller identity from request headers.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity in `x-user-id`, `x-user-role` and `x-user-plan`. These headers,
//! `x-user-role: ADMIN` included, are taken at face value, so the server must
//! only be reachable through that gateway. With `gateway_token` configured,
//! requests must also carry the shared secret in `x-gateway-token`; anything
//! else is rejected with 401 before the identity headers are read.

use crate::{ApiError, AppState};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use reelwright_core::{Role, UserId};
use reelwright_error::{ReelError, ReelErrorKind};
use reelwright_interface::Caller;
use std::str::FromStr;
use tracing::warn;

/// Header carrying the user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the role (`USER` or `ADMIN`).
pub const USER_ROLE_HEADER: &str = "x-user-role";
/// Header carrying the plan name.
pub const USER_PLAN_HEADER: &str = "x-user-plan";
/// Header carrying the gateway's shared secret.
pub const GATEWAY_TOKEN_HEADER: &str = "x-gateway-token";

/// Extracts the authenticated [`Caller`]; requests without one get 401.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Caller);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(expected) = state.gateway_token.as_deref()
            && header(parts, GATEWAY_TOKEN_HEADER) != Some(expected)
        {
            warn!("Request did not come through the gateway");
            return Err(ReelError::new(ReelErrorKind::Unauthenticated).into());
        }
        let user_id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| ReelError::new(ReelErrorKind::Unauthenticated))?;
        let role = match header(parts, USER_ROLE_HEADER) {
            Some(raw) => Role::from_str(raw).map_err(|_| {
                ReelError::new(ReelErrorKind::validation(
                    USER_ROLE_HEADER,
                    format!("unknown role {raw:?}"),
                ))
            })?,
            None => Role::User,
        };
        Ok(Self(Caller {
            user_id: UserId::from(user_id),
            role,
            plan: header(parts, USER_PLAN_HEADER).unwrap_or_default().to_string(),
        }))
    }
}
