use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("file name {filename:?} sanitizes to an empty acquisition identifier")]
    EmptyIdentifier { filename: String },
    #[error("invalid acquisition identifier {0:?}")]
    InvalidIdentifier(String),
    #[error("age must be positive, got zero")]
    ZeroAge,
    #[error("unknown age unit {0:?}")]
    UnknownAgeUnit(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
