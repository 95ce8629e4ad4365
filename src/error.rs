use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApoteoError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown band: {0}")]
    UnknownBand(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ApoteoError>;
