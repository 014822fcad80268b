use crate::domain::department::DepartmentId;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Unique identifier for an employee.
pub type EmployeeId = i64;

/// A person on the payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Store-assigned identifier.
    pub id: EmployeeId,
    pub name: String,
    pub job_title: String,
    pub department_id: DepartmentId,
}

/// Existence lookup consumed by review validation.
///
/// Every employee-id assignment queries the directory again; results are
/// never cached, so the check always reflects the store at assignment time.
pub trait EmployeeDirectory {
    fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>>;
}
