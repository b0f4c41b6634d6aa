use thiserror::Error;

pub type Result<T> = std::result::Result<T, EloError>;

#[derive(Debug, Error)]
pub enum EloError {
    #[error("Reversion coefficient must be within [0, 1], got {0}")]
    InvalidReversionCoefficient(f64),

    #[error("Mean rating must be finite, got {0}")]
    InvalidMean(f64),

    #[error("Unknown margin of victory type '{0}', expected one of 'nfl' or 'nba'")]
    UnknownMovType(String),

    #[error("Unknown home/away/neutral value '{0}', expected one of 'H', 'A' or 'N'")]
    UnknownHomeAwayNeutral(String),

    #[error("Expected inputs of equal length, got {left} and {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Row {row} is missing column '{column}'")]
    MissingColumn { row: usize, column: String },

    #[error("Row {row} has an invalid value in column '{column}': {reason}")]
    InvalidValue { row: usize, column: String, reason: String },

    #[error("Invalid match table: {0}")]
    InvalidTable(String),

    #[error("Failed to read or write table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error)
}
