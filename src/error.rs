use std::io;

use thiserror::Error;

/// Error type for validation, storage and serialization failures.
#[derive(Debug, Error)]
pub enum SnapError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("'{0}' is not in the catalog")]
    UnknownAnimal(String),
    #[error("score {score} is outside the allowed range 0..={max}")]
    ScoreOutOfRange { score: u32, max: u32 },
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid user name '{0}': use letters, digits, spaces, '-' or '_'")]
    InvalidUser(String),
    #[error("invalid star rating {0}: expected 1 to 4")]
    InvalidStars(u8),
    #[error("invalid tier '{0}': expected Bronze, Silver, Gold or Diamond")]
    InvalidTier(String),
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("unsupported photo '{0}': expected a jpg, jpeg or png file")]
    UnsupportedPhoto(String),
    #[error("invalid timestamp '{0}': expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp(String),
}

pub type Result<T> = std::result::Result<T, SnapError>;
