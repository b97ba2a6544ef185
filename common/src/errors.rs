use thiserror::Error;

/// Errors raised while building or transforming datasets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Malformed sizes or parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
