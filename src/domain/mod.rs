//! Domain types for Crewbook.
//! Defines the HR records and the validation rules that guard them.

pub mod department;
pub mod employee;
pub mod error;
pub mod review;

pub use department::*;
pub use employee::*;
pub use error::*;
pub use review::*;
