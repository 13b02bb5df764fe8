//! External worker queue.

use async_trait::async_trait;
use reelwright_core::{GenerationJob, JobId};
use reelwright_error::ReelResult;

/// Accepts generation jobs for the external worker pool.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Submit a fully resolved job.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue is unavailable or rejects the payload.
    async fn submit(&self, job: GenerationJob) -> ReelResult<JobId>;
}
