//! Result type alias for exporter operations.

use super::exporter_error::ExporterError;

/// Type alias for Results using ExporterError.
pub type ExporterResult<T> = Result<T, ExporterError>;

/// Extension trait for naming the operation that failed.
///
/// # Example
///
/// ```ignore
/// use ring_exporter::error::ResultExt;
///
/// let config = load_config(path).context("load config")?;
/// ```
pub trait ResultExt<T> {
    /// Wrap an error with the operation that produced it.
    fn context(self, operation: &'static str) -> ExporterResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ExporterError>,
{
    fn context(self, operation: &'static str) -> ExporterResult<T> {
        self.map_err(|e| e.into().with_context(operation))
    }
}
