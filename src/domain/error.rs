//! Domain error types for Crewbook.
//!
//! Validation failures are always recoverable by the caller; a rejected
//! write leaves the record exactly as it was.

use crate::domain::employee::EmployeeId;
use crate::domain::review::ReviewId;
use thiserror::Error;

/// Field-level validation failures for review data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("year must be 2000 or later, got {0}")]
    YearBeforeMinimum(i32),

    #[error("summary must not be empty")]
    EmptySummary,

    #[error("employee id must be positive, got {0}")]
    NonPositiveEmployeeId(EmployeeId),

    #[error("no employee exists with id {0}")]
    UnknownEmployee(EmployeeId),
}

/// Lifecycle errors for review persistence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("review has not been saved yet")]
    Unsaved,

    #[error("review {0} is already saved")]
    AlreadySaved(ReviewId),
}
