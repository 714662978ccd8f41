//! Validation errors surfaced to the user on explicit form submission.

use thiserror::Error;

/// Reasons a manual line item was rejected.
///
/// These only block the submission that caused them; the estimate is left
/// exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// The description was empty or whitespace
    #[error("Line item needs a description")]
    EmptyDescription,

    /// The unit cost was zero, negative or not a number
    #[error("Unit cost must be greater than zero (got {0})")]
    NonPositiveUnitCost(f64),
}
