//! Error types for the implied-volatility pipeline.
//!
//! Per-quote problems never surface as errors from the batch driver: they are
//! recorded as [`Rejection`]s or solver outcomes inside the report. Only a
//! structurally unusable call is returned as an [`IvError`].

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, IvError>;

/// Hard failures that reject a whole call.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum IvError {
    /// Underlying records were supplied but none of them carries a usable spot price.
    #[error("no usable spot price among {supplied} underlying records")]
    InvalidSpot { supplied: usize },

    /// Configuration values are inconsistent (e.g. inverted bracket).
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}
