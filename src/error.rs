use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShotDataError {
    #[error("Shot data file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Expected CSV file, got: {0}")]
    UnsupportedExtension(String),

    #[error("CSV file is empty (no data rows)")]
    Empty,

    #[error("Failed to read CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Column '{column}' should be {expected}: {detail}")]
    InvalidDataType {
        column: String,
        expected: String,
        detail: String,
    },

    #[error("Cannot convert '{0}' to boolean")]
    InvalidValue(String),

    #[error("{0}")]
    Validation(String),
}

impl ShotDataError {
    /// Names of the absent columns for a structural failure.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            ShotDataError::MissingColumns(cols) => Some(cols),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No player found matching: {0}")]
    PlayerNotFound(String),

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("No shots found for game: {0}")]
    GameNotFound(String),

    #[error("API rate limit hit: {0}")]
    RateLimit(String),

    #[error("{0}")]
    Api(String),

    #[error("fetched shot data is invalid: {0}")]
    Data(#[from] ShotDataError),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("No shots found for {0}")]
    NoShots(String),

    #[error("Unsupported output format: {0} (only .svg and .png are rendered)")]
    UnsupportedFormat(String),

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
