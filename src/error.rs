use thiserror::Error;

/// Errors raised by the clustering core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("point has no coordinates")]
    EmptyPoint,

    #[error("dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("non-finite coordinate at index {index}")]
    NonFiniteCoordinate { index: usize },

    #[error("point would overflow cluster statistics")]
    NumericOverflow,

    #[error("eviction attempted with no live cluster")]
    EmptyCollection,
}
