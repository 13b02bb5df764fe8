//! Authenticated caller identity.

use reelwright_core::{Role, UserId};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use serde::{Deserialize, Serialize};

/// The current user as reported by the authentication subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Account id.
    pub user_id: UserId,
    /// Privilege level.
    pub role: Role,
    /// Subscription plan.
    pub plan: String,
}

impl Caller {
    /// A regular user.
    pub fn user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::User,
            plan: String::new(),
        }
    }

    /// An administrator.
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
            plan: String::new(),
        }
    }

    /// Whether the caller may act on any user's records.
    pub fn is_privileged(&self) -> bool {
        self.role == Role::Admin
    }

    /// Reject callers that neither own the record nor are privileged.
    pub fn authorize_owner(&self, owner: &UserId) -> ReelResult<()> {
        if &self.user_id == owner || self.is_privileged() {
            Ok(())
        } else {
            Err(ReelError::new(ReelErrorKind::Forbidden(format!(
                "user {} does not own this record",
                self.user_id
            ))))
        }
    }
}
