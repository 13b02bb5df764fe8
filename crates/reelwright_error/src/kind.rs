//! Error kinds and their categories.

/// Coarse classification of an error, used to choose a response at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorCategory {
    /// Malformed input, rejected before any mutation.
    #[display("validation")]
    Validation,
    /// Caller is not authenticated.
    #[display("unauthenticated")]
    Unauthenticated,
    /// Caller is authenticated but not allowed.
    #[display("forbidden")]
    Forbidden,
    /// Referenced record does not exist.
    #[display("not_found")]
    NotFound,
    /// Action is illegal for the record's current state.
    #[display("conflict")]
    Conflict,
    /// An external vendor (generation provider or social platform) failed.
    #[display("external")]
    External,
    /// Storage, configuration or other internal failure.
    #[display("internal")]
    Internal,
}

/// Specific error conditions raised across the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReelErrorKind {
    /// A request field failed validation.
    #[display("Invalid {}: {}", field, reason)]
    Validation {
        /// Offending field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// No authenticated caller.
    #[display("Authentication required")]
    Unauthenticated,

    /// Caller does not own the record and is not privileged.
    #[display("Forbidden: {}", _0)]
    Forbidden(String),

    /// Record lookup failed.
    #[display("{} not found: {}", entity, id)]
    NotFound {
        /// Record type (video, series, automation, ...).
        entity: &'static str,
        /// Record id.
        id: String,
    },

    /// Action is not legal for the current lifecycle state.
    #[display("State conflict: {}", _0)]
    StateConflict(String),

    /// Optimistic concurrency check failed.
    #[display("Version conflict on {}: expected {}, found {}", id, expected, found)]
    VersionConflict {
        /// Record id.
        id: String,
        /// Version the writer read.
        expected: u64,
        /// Version currently stored.
        found: u64,
    },

    /// A generation provider failed or returned an unusable result.
    #[display("Provider {} failed: {}", provider, message)]
    Provider {
        /// Provider id.
        provider: String,
        /// Classified failure message.
        message: String,
    },

    /// A social platform publish step failed.
    #[display("Publishing to {} failed: {}", platform, message)]
    Publish {
        /// Platform name.
        platform: String,
        /// Classified failure message.
        message: String,
    },

    /// The job queue rejected a submission.
    #[display("Job queue error: {}", _0)]
    Queue(String),

    /// Persistent storage failure.
    #[display("Storage error: {}", _0)]
    Storage(String),

    /// Configuration could not be loaded or is invalid.
    #[display("Configuration error: {}", _0)]
    Config(String),

    /// JSON (de)serialization failure.
    #[display("JSON error: {}", _0)]
    Json(String),

    /// Transport-level HTTP failure.
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// Filesystem failure.
    #[display("I/O error: {}", _0)]
    Io(String),

    /// A record could not be assembled from its parts.
    #[display("Builder error: {}", _0)]
    Builder(String),
}

impl ReelErrorKind {
    /// Shorthand for a field validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing record.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Category this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } | Self::Json(_) => ErrorCategory::Validation,
            Self::Unauthenticated => ErrorCategory::Unauthenticated,
            Self::Forbidden(_) => ErrorCategory::Forbidden,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::StateConflict(_) | Self::VersionConflict { .. } => ErrorCategory::Conflict,
            Self::Provider { .. } | Self::Publish { .. } | Self::Http(_) => {
                ErrorCategory::External
            }
            Self::Queue(_)
            | Self::Storage(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Builder(_) => ErrorCategory::Internal,
        }
    }

    /// Whether a local retry may succeed without user action.
    ///
    /// State machine violations are never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Storage(_) | Self::Queue(_) | Self::VersionConflict { .. }
        )
    }
}
