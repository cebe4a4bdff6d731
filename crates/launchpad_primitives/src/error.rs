use thiserror::Error;

/// Failures raised by curve construction before any pricing happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("invalid curve parameters: {0}")]
    InvalidParameters(String),
}
