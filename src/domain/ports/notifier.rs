use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Delivers a human-readable alert through an external channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a notification with the given subject and plain-text body.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the message cannot be built or the transport
    /// rejects it (authentication, network, DNS).
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}
