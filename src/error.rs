use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown municipality: {0}")]
    UnknownRegion(String),

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Trade data could not be loaded: {0}")]
    DatasetUnavailable(String),
}

pub type Result<T> = std::result::Result<T, ComexError>;
