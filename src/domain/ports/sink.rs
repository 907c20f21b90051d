use thiserror::Error;

use crate::domain::entities::report::SampleReport;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to write report: {0}")]
    WriteFailed(#[from] std::io::Error),
    #[error("output sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for rendered usage reports.
///
/// Implementations serialize their own writes; `emit` takes `&self`.
pub trait ReportSink: Send + Sync {
    /// Write one report.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the underlying stream cannot be written.
    fn emit(&self, report: &SampleReport) -> Result<(), SinkError>;
}
