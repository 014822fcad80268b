//! Crewbook: a small HR record keeper backed by SQLite.
//!
//! Departments and employees are plain records; reviews are validated on
//! every write and identity-cached per repository, so loading the same row
//! twice hands back the same in-memory instance.

pub mod domain;
pub mod infra;
