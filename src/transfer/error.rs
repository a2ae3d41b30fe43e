use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("CSV must contain a header and at least one data row")]
    NotEnoughRows,

    #[error("Failed to read CSV upload")]
    CsvRead(#[source] csv::Error),

    #[error("Failed to write CSV export")]
    CsvWrite(#[source] csv::Error),

    #[error("Failed to flush CSV export")]
    CsvFlush(#[source] std::io::Error),

    #[error("CSV export is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to serialize JSON export")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write export file '{0}'")]
    FileWrite(PathBuf, #[source] std::io::Error),
}
