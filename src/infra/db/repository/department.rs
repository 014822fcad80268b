use super::DbConn;
use crate::domain::{Department, DepartmentId};
use anyhow::Result;

/// Repository for department records.
pub struct DepartmentRepository {
    conn: DbConn,
}

impl DepartmentRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Idempotently ensure the departments table exists.
    pub fn create_table(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .expect("DepartmentRepository: failed to acquire database lock");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS departments (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                location TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Idempotently remove the departments table.
    pub fn drop_table(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .expect("DepartmentRepository: failed to acquire database lock");
        conn.execute_batch("DROP TABLE IF EXISTS departments;")?;
        Ok(())
    }

    pub fn create(&self, name: &str, location: &str) -> Result<Department> {
        let conn = self
            .conn
            .lock()
            .expect("DepartmentRepository: failed to acquire database lock");
        conn.execute(
            "INSERT INTO departments (name, location) VALUES (?1, ?2)",
            (name, location),
        )?;
        Ok(Department {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            location: location.to_string(),
        })
    }

    pub fn find_by_id(&self, id: DepartmentId) -> Result<Option<Department>> {
        let conn = self
            .conn
            .lock()
            .expect("DepartmentRepository: failed to acquire database lock");
        let mut stmt = conn.prepare("SELECT id, name, location FROM departments WHERE id = ?1")?;
        let mut rows = stmt.query_map([id], |row| {
            Ok(Department {
                id: row.get(0)?,
                name: row.get(1)?,
                location: row.get(2)?,
            })
        })?;

        match rows.next() {
            Some(row) => row.map(Some).map_err(Into::into),
            None => Ok(None),
        }
    }

    pub fn list_all(&self) -> Result<Vec<Department>> {
        let conn = self
            .conn
            .lock()
            .expect("DepartmentRepository: failed to acquire database lock");
        let mut stmt = conn.prepare("SELECT id, name, location FROM departments")?;
        let rows = stmt.query_map([], |row| {
            Ok(Department {
                id: row.get(0)?,
                name: row.get(1)?,
                location: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
