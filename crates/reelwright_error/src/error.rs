//! Top-level error wrapper.

use crate::{ErrorCategory, ReelErrorKind};

/// Reelwright error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelwright_error::{ReelError, ReelErrorKind};
///
/// let err = ReelError::new(ReelErrorKind::not_found("video", "v-1"));
/// assert!(err.to_string().contains("video not found: v-1"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Reelwright Error: {} at line {} in {}", kind, line, file)]
pub struct ReelError {
    /// The condition that occurred.
    pub kind: ReelErrorKind,
    /// Line number where the error was created.
    pub line: u32,
    /// File where the error was created.
    pub file: &'static str,
}

impl ReelError {
    /// Create a new error at the caller's location.
    #[track_caller]
    pub fn new(kind: ReelErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReelErrorKind {
        &self.kind
    }

    /// Category of the underlying kind.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Whether a local retry may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Message suitable for API clients, without the source location.
    pub fn public_message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<ReelErrorKind> for ReelError {
    #[track_caller]
    fn from(kind: ReelErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<serde_json::Error> for ReelError {
    #[track_caller]
    fn from(e: serde_json::Error) -> Self {
        Self::new(ReelErrorKind::Json(e.to_string()))
    }
}

impl From<std::io::Error> for ReelError {
    #[track_caller]
    fn from(e: std::io::Error) -> Self {
        Self::new(ReelErrorKind::Io(e.to_string()))
    }
}

/// Result type for Reelwright operations.
pub type ReelResult<T> = std::result::Result<T, ReelError>;
