use super::DbConn;
use crate::domain::{DepartmentId, Employee, EmployeeDirectory, EmployeeId};
use anyhow::Result;

/// Repository for employee records. Also serves as the [`EmployeeDirectory`]
/// that review validation queries.
pub struct EmployeeRepository {
    conn: DbConn,
}

impl EmployeeRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Idempotently ensure the employees table exists.
    pub fn create_table(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .expect("EmployeeRepository: failed to acquire database lock");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                job_title TEXT NOT NULL,
                department_id INTEGER NOT NULL,
                FOREIGN KEY (department_id) REFERENCES departments(id)
            );
            "#,
        )?;
        Ok(())
    }

    /// Idempotently remove the employees table.
    pub fn drop_table(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .expect("EmployeeRepository: failed to acquire database lock");
        conn.execute_batch("DROP TABLE IF EXISTS employees;")?;
        Ok(())
    }

    pub fn create(
        &self,
        name: &str,
        job_title: &str,
        department_id: DepartmentId,
    ) -> Result<Employee> {
        let conn = self
            .conn
            .lock()
            .expect("EmployeeRepository: failed to acquire database lock");
        conn.execute(
            "INSERT INTO employees (name, job_title, department_id) VALUES (?1, ?2, ?3)",
            (name, job_title, department_id),
        )?;
        Ok(Employee {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            job_title: job_title.to_string(),
            department_id,
        })
    }

    pub fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>> {
        let conn = self
            .conn
            .lock()
            .expect("EmployeeRepository: failed to acquire database lock");
        let mut stmt = conn
            .prepare("SELECT id, name, job_title, department_id FROM employees WHERE id = ?1")?;
        let mut rows = stmt.query_map([id], |row| {
            Ok(Employee {
                id: row.get(0)?,
                name: row.get(1)?,
                job_title: row.get(2)?,
                department_id: row.get(3)?,
            })
        })?;

        match rows.next() {
            Some(row) => row.map(Some).map_err(Into::into),
            None => Ok(None),
        }
    }

    pub fn list_all(&self) -> Result<Vec<Employee>> {
        let conn = self
            .conn
            .lock()
            .expect("EmployeeRepository: failed to acquire database lock");
        let mut stmt = conn.prepare("SELECT id, name, job_title, department_id FROM employees")?;
        let rows = stmt.query_map([], |row| {
            Ok(Employee {
                id: row.get(0)?,
                name: row.get(1)?,
                job_title: row.get(2)?,
                department_id: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl EmployeeDirectory for EmployeeRepository {
    fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>> {
        EmployeeRepository::find_by_id(self, id)
    }
}
