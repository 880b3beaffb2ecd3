use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogsiftError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{0}")]
    Pdf(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Filter '{0}' is already registered")]
    DuplicateFilter(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Unsupported document: {0}")]
    DocumentFormat(String),

    #[error("No custom filter is waiting for confirmation")]
    NoPendingFilter,
}

impl From<LogsiftError> for String {
    fn from(e: LogsiftError) -> Self {
        e.to_string()
    }
}

pub type Result<T> = std::result::Result<T, LogsiftError>;
