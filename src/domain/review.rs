use crate::domain::employee::{EmployeeDirectory, EmployeeId};
use crate::domain::error::ValidationError;
use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Unique identifier for a review, assigned by the store on first save.
pub type ReviewId = i64;

/// Earliest year a review may be filed for.
pub const MIN_REVIEW_YEAR: i32 = 2000;

/// A yearly performance review for one employee.
///
/// Fields are private and every write path runs the field's validator, so a
/// live instance always satisfies the invariants: `year >= 2000`, non-empty
/// summary, and an employee id that resolved through the directory at
/// assignment time. Employee existence is not re-checked afterwards; a
/// record whose employee is later removed stays valid.
///
/// `Serialize` only: deserializing raw data would bypass the validators.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    id: Option<ReviewId>,
    year: i32,
    summary: String,
    employee_id: EmployeeId,
}

impl Review {
    /// Build an unsaved review, validating in field order: year, employee
    /// id, then summary. The first violation wins and nothing partial is
    /// constructed.
    pub fn new(
        year: i32,
        summary: impl Into<String>,
        employee_id: EmployeeId,
        directory: &dyn EmployeeDirectory,
    ) -> Result<Self> {
        let year = validate_year(year)?;
        let employee_id = validate_employee_id(employee_id, directory)?;
        let summary = validate_summary(summary.into())?;
        Ok(Self {
            id: None,
            year,
            summary,
            employee_id,
        })
    }

    /// Store-assigned id; `None` while unsaved or after delete.
    pub fn id(&self) -> Option<ReviewId> {
        self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Rejects years before [`MIN_REVIEW_YEAR`]; on rejection the stored
    /// value is untouched.
    pub fn set_year(&mut self, year: i32) -> Result<(), ValidationError> {
        self.year = validate_year(year)?;
        Ok(())
    }

    /// Rejects empty summaries; on rejection the stored value is untouched.
    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ValidationError> {
        self.summary = validate_summary(summary.into())?;
        Ok(())
    }

    /// Queries the directory on every call; a non-positive or unresolvable
    /// id is rejected and the stored value untouched.
    pub fn set_employee_id(
        &mut self,
        employee_id: EmployeeId,
        directory: &dyn EmployeeDirectory,
    ) -> Result<()> {
        self.employee_id = validate_employee_id(employee_id, directory)?;
        Ok(())
    }

    pub(crate) fn assign_id(&mut self, id: ReviewId) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(
                f,
                "review {id}: {}, {:?}, employee {}",
                self.year, self.summary, self.employee_id
            ),
            None => write!(
                f,
                "unsaved review: {}, {:?}, employee {}",
                self.year, self.summary, self.employee_id
            ),
        }
    }
}

fn validate_year(year: i32) -> Result<i32, ValidationError> {
    if year >= MIN_REVIEW_YEAR {
        Ok(year)
    } else {
        Err(ValidationError::YearBeforeMinimum(year))
    }
}

fn validate_summary(summary: String) -> Result<String, ValidationError> {
    if summary.is_empty() {
        Err(ValidationError::EmptySummary)
    } else {
        Ok(summary)
    }
}

fn validate_employee_id(
    employee_id: EmployeeId,
    directory: &dyn EmployeeDirectory,
) -> Result<EmployeeId> {
    if employee_id <= 0 {
        return Err(ValidationError::NonPositiveEmployeeId(employee_id).into());
    }
    match directory.find_by_id(employee_id)? {
        Some(_) => Ok(employee_id),
        None => Err(ValidationError::UnknownEmployee(employee_id).into()),
    }
}
