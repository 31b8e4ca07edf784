use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid supported range bound: {0}")]
    InvalidBound(String),

    #[error("Supported range is inverted: minimum {min} is above maximum {max}")]
    Inverted { min: String, max: String },
}
