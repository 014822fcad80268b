//! SQLite database setup and connection management for Crewbook.
//! Handles database opening and shared-connection handout.

use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::infra::db::repository::{DepartmentRepository, EmployeeRepository, ReviewRepository};

/// Database wrapper that manages the shared SQLite connection.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create or open the database at the default location.
    pub fn open() -> Result<Self> {
        Self::open_at(Self::default_path())
    }

    /// Create an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// Create or open the database at a specific path.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        log::debug!("opened crewbook database at {}", path.display());
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// Get the default database path.
    fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("CREWBOOK_DB_PATH") {
            return PathBuf::from(path);
        }

        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".crewbook")
            .join("db.sqlite")
    }

    /// Table creation is an explicit per-repository operation
    /// (`create_table`), so init only turns on foreign-key enforcement.
    fn init(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    /// Get a reference to the connection.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    pub fn department_repo(&self) -> DepartmentRepository {
        DepartmentRepository::new(self.connection())
    }

    pub fn employee_repo(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.connection())
    }

    /// Review repository backed by this database's employee table for the
    /// existence checks.
    pub fn review_repo(&self) -> ReviewRepository {
        ReviewRepository::new(
            self.connection(),
            Arc::new(EmployeeRepository::new(self.connection())),
        )
    }
}
