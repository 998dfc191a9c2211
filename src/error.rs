use thiserror::Error;

use crate::models::ViolationKind;

/// Numeric failures inside the engine. Validation outcomes are not errors;
/// they are reported through `ValidationReport`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("{field} must be a finite positive number (got {value})")]
    NonFiniteInput { field: &'static str, value: f64 },

    #[error("bin step must be a finite positive number of basis points (got {0})")]
    InvalidBinStep(f64),

    #[error("derived bin id {0} is outside the representable ladder")]
    BinIdOverflow(f64),

    #[error("submission blocked by {0:?}")]
    SubmissionBlocked(Vec<ViolationKind>),
}

pub type RangeResult<T> = Result<T, RangeError>;

/// Guard used at every numeric entry point.
#[inline]
pub fn ensure_positive_finite(field: &'static str, value: f64) -> RangeResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RangeError::NonFiniteInput { field, value })
    }
}
