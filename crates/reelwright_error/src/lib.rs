//! Error types for Reelwright.
//!
//! All fallible operations in the workspace return [`ReelResult`]. Errors follow
//! the `ErrorKind` + wrapper struct pattern:
//! - [`ReelErrorKind`] names the specific condition
//! - [`ReelError`] wraps the kind with the source location that raised it
//!
//! Every kind belongs to an [`ErrorCategory`], which is what callers at the
//! edge (the HTTP layer) branch on. State conflicts are kept apart from
//! validation failures so clients can show an "already running" message
//! instead of a generic failure.
//!
//! # Examples
//!
//! ```
//! use reelwright_error::{ErrorCategory, ReelError, ReelErrorKind, ReelResult};
//!
//! fn retry_ready_video() -> ReelResult<()> {
//!     Err(ReelError::new(ReelErrorKind::StateConflict(
//!         "video is READY".to_string(),
//!     )))
//! }
//!
//! let err = retry_ready_video().unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Conflict);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod kind;

pub use error::{ReelError, ReelResult};
pub use kind::{ErrorCategory, ReelErrorKind};
