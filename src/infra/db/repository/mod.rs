//! Repository implementations for data access in Crewbook.
//!
//! Provides database operations for departments, employees, and reviews.

mod department;
mod employee;
mod review;

pub use department::DepartmentRepository;
pub use employee::EmployeeRepository;
pub use review::{ReviewRepository, SharedReview};

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub(super) type DbConn = Arc<Mutex<Connection>>;

#[cfg(test)]
mod tests;
