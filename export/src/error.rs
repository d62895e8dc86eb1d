//! Export error types.

use thiserror::Error;

/// Errors that can occur while rendering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A row carries a column the format does not define.
    #[error("Unknown column `{column}` for format {format}")]
    UnknownColumn {
        format: &'static str,
        column: String,
    },

    /// A value does not fit the column's field kind.
    #[error("Invalid value for `{column}`: {reason}")]
    InvalidValue { column: String, reason: String },

    /// Header configuration is incomplete or inconsistent.
    #[error("Invalid export configuration: {0}")]
    InvalidConfig(String),

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File or buffer failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendered output is not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl ExportError {
    /// Get error code for callers that map errors to responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            ExportError::InvalidValue { .. } => "INVALID_VALUE",
            ExportError::InvalidConfig(_) => "INVALID_CONFIG",
            ExportError::Csv(_) => "CSV_ERROR",
            ExportError::Io(_) => "IO_ERROR",
            ExportError::Encoding(_) => "ENCODING_ERROR",
        }
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
