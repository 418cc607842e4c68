use thiserror::Error;

/// Failure to read delimited text at all.
///
/// Individual malformed rows are never errors; they are dropped during
/// ingestion.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text has no header line.
    #[error("delimited text is empty")]
    Empty,

    #[error("failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),
}
