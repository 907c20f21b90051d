use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::domain::entities::report::SampleReport;
use crate::domain::ports::sink::{ReportSink, SinkError};
use crate::presentation::cli::formatters::report_fmt::format_report;

/// Prints reports to stdout, coloured when the terminal supports it.
pub struct ConsoleSink {
    lock: Mutex<()>,
}

impl ConsoleSink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lock: Mutex::new(()),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for ConsoleSink {
    fn emit(&self, report: &SampleReport) -> Result<(), SinkError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| SinkError::Unavailable(format!("console lock poisoned: {e}")))?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "\n{}", format_report(report, true))?;
        stdout.flush()?;
        Ok(())
    }
}

/// Appends plain-text reports to a file.
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn append(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ReportSink for FileSink {
    fn emit(&self, report: &SampleReport) -> Result<(), SinkError> {
        let mut file = self
            .file
            .lock()
            .map_err(|e| SinkError::Unavailable(format!("output file lock poisoned: {e}")))?;
        writeln!(file, "\n{}", format_report(report, false))?;
        file.flush()?;
        Ok(())
    }
}

/// Pick the report sink: the `--output` file when given, the terminal otherwise.
///
/// # Errors
///
/// Returns an error if the output file cannot be opened. The failure is
/// logged before it is returned.
pub fn open_sink(output: Option<&Path>) -> std::io::Result<Box<dyn ReportSink>> {
    let Some(path) = output else {
        return Ok(Box::new(ConsoleSink::new()));
    };
    match FileSink::append(path) {
        Ok(sink) => Ok(Box::new(sink)),
        Err(e) => {
            tracing::error!("Failed to open output file {}: {e}", path.display());
            Err(e)
        }
    }
}
