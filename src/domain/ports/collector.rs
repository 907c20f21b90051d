use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::sample::ResourceSample;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("failed to collect system metrics: {0}")]
    MetricsUnavailable(String),
    #[error("root filesystem not found: {0}")]
    RootFilesystemNotFound(String),
}

#[async_trait]
pub trait ResourceSampler: Send + Sync {
    /// Take one utilization sample of the host.
    ///
    /// The CPU figure is averaged over a short measurement window, so this
    /// call takes roughly that long to complete.
    ///
    /// # Errors
    ///
    /// Returns `SampleError` if any underlying OS query fails.
    async fn sample(&self) -> Result<ResourceSample, SampleError>;
}
