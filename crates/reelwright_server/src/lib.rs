//! HTTP surface for the Reelwright orchestrator.
//!
//! Every route requires a caller identity forwarded by the gateway (see
//! [`Authenticated`]). Errors map onto status codes by category:
//!
//! | category | status |
//! |---|---|
//! | validation | 400 |
//! | unauthenticated | 401 |
//! | forbidden | 403 |
//! | not found | 404 |
//! | conflict | 409 |
//! | external | 502 |
//! | internal | 500 |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod caller;
mod config;
mod error;
mod logging;
mod routes;
mod state;

pub use caller::{
    Authenticated, GATEWAY_TOKEN_HEADER, USER_ID_HEADER, USER_PLAN_HEADER, USER_ROLE_HEADER,
};
pub use config::{CONFIG_FILE, ENV_PREFIX, ServerConfig};
pub use error::{ApiError, ApiResult, status_for};
pub use logging::init_logging;
pub use routes::{AssembleBody, ManualLinkBody, PlatformsBody, RegenerateImageBody, router};
pub use state::AppState;
