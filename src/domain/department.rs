use serde::{Deserialize, Serialize};

/// Unique identifier for a department.
pub type DepartmentId = i64;

/// An organizational unit employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Store-assigned identifier.
    pub id: DepartmentId,
    pub name: String,
    pub location: String,
}
