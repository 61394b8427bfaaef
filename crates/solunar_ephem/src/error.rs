//! Error types for the ephemeris layer.

use solunar_time::TimeError;
use thiserror::Error;

/// Errors from location validation or ephemeris evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EphemError {
    /// Geographic coordinates out of range or not finite.
    #[error("invalid location: {0}")]
    InvalidLocation(&'static str),
    /// Ephemeris configuration rejected.
    #[error("invalid ephemeris config: {0}")]
    InvalidConfig(&'static str),
    /// Numerical evaluation failed (non-finite position, no convergence).
    #[error("ephemeris computation failed: {0}")]
    Computation(&'static str),
    /// Time conversion failed.
    #[error("time error: {0}")]
    Time(#[from] TimeError),
}
