//! Record identifiers.

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            derive_more::Display, derive_more::From,
        )]
        #[serde(transparent)]
        #[display("{}", _0)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

record_id!(
    /// Identifies a [`crate::Video`].
    VideoId
);
record_id!(
    /// Identifies a [`crate::Series`].
    SeriesId
);
record_id!(
    /// Identifies an [`crate::Automation`].
    AutomationId
);
record_id!(
    /// Identifies a user account.
    UserId
);
record_id!(
    /// Identifies a [`crate::Character`].
    CharacterId
);
record_id!(
    /// Identifies a job accepted by the worker queue.
    JobId
);
