use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source table '{table}' is unavailable: {reason}")]
    SourceUnavailable { table: String, reason: String },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn source_unavailable(table: &str, reason: impl Into<String>) -> Self {
        Error::SourceUnavailable {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}
