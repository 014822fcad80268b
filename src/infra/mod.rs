//! Infrastructure layer (adapters/implementations).
//!
//! This module contains the SQLite persistence for Crewbook records.

pub mod db;
