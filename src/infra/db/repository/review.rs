use super::DbConn;
use crate::domain::{EmployeeDirectory, EmployeeId, Review, ReviewError, ReviewId};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// A review instance shared through the identity cache.
pub type SharedReview = Rc<RefCell<Review>>;

type ReviewRow = (ReviewId, i32, String, EmployeeId);

/// Repository for review records.
///
/// Owns the identity cache: at most one live in-memory [`Review`] per
/// persisted id, for the lifetime of the repository. The cache is
/// deliberately unsynchronized (`Rc` makes the repository `!Send`), which
/// matches the single-threaded execution model of the rest of the crate.
/// A fresh repository over the same connection starts with an empty cache.
pub struct ReviewRepository {
    conn: DbConn,
    employees: Arc<dyn EmployeeDirectory>,
    cache: RefCell<HashMap<ReviewId, SharedReview>>,
}

impl ReviewRepository {
    pub fn new(conn: DbConn, employees: Arc<dyn EmployeeDirectory>) -> Self {
        Self {
            conn,
            employees,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Idempotently ensure the reviews table exists.
    pub fn create_table(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .expect("ReviewRepository: failed to acquire database lock");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY,
                year INTEGER NOT NULL,
                summary TEXT NOT NULL,
                employee_id INTEGER NOT NULL,
                FOREIGN KEY (employee_id) REFERENCES employees(id)
            );
            "#,
        )?;
        Ok(())
    }

    /// Idempotently remove the reviews table.
    pub fn drop_table(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .expect("ReviewRepository: failed to acquire database lock");
        conn.execute_batch("DROP TABLE IF EXISTS reviews;")?;
        Ok(())
    }

    /// First-time save of an unsaved review: insert the row, assign the
    /// store-generated id, and register the instance in the identity cache.
    ///
    /// Fails with [`ReviewError::AlreadySaved`] if the review has an id;
    /// use [`update`](Self::update) for persisted instances.
    pub fn save(&self, review: &SharedReview) -> Result<()> {
        if let Some(id) = review.borrow().id() {
            return Err(ReviewError::AlreadySaved(id).into());
        }

        let id = {
            let conn = self
                .conn
                .lock()
                .expect("ReviewRepository: failed to acquire database lock");
            let r = review.borrow();
            conn.execute(
                "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3)",
                (r.year(), r.summary(), r.employee_id()),
            )?;
            conn.last_insert_rowid()
        };

        review.borrow_mut().assign_id(id);
        self.cache.borrow_mut().insert(id, Rc::clone(review));
        log::debug!("saved review {id}");
        Ok(())
    }

    /// Construct and save in one step. A `ValidationError` propagates
    /// before anything is inserted.
    pub fn create(&self, year: i32, summary: &str, employee_id: EmployeeId) -> Result<SharedReview> {
        let review = Review::new(year, summary, employee_id, self.employees.as_ref())?;
        let shared = Rc::new(RefCell::new(review));
        self.save(&shared)?;
        Ok(shared)
    }

    /// Overwrite the stored row with the instance's current field values.
    /// The cache is untouched; instance identity does not change.
    ///
    /// Fails with [`ReviewError::Unsaved`] if the review has no id.
    pub fn update(&self, review: &Review) -> Result<()> {
        let id = review.id().ok_or(ReviewError::Unsaved)?;
        let conn = self
            .conn
            .lock()
            .expect("ReviewRepository: failed to acquire database lock");
        conn.execute(
            "UPDATE reviews SET year = ?1, summary = ?2, employee_id = ?3 WHERE id = ?4",
            (review.year(), review.summary(), review.employee_id(), id),
        )?;
        Ok(())
    }

    /// Delete the row, evict the cache entry, and clear the instance's id,
    /// returning it to the unsaved state.
    ///
    /// Fails with [`ReviewError::Unsaved`] if the review has no id.
    pub fn delete(&self, review: &SharedReview) -> Result<()> {
        let id = review.borrow().id().ok_or(ReviewError::Unsaved)?;
        {
            let conn = self
                .conn
                .lock()
                .expect("ReviewRepository: failed to acquire database lock");
            conn.execute("DELETE FROM reviews WHERE id = ?1", [id])?;
        }

        self.cache.borrow_mut().remove(&id);
        review.borrow_mut().clear_id();
        log::debug!("deleted review {id}");
        Ok(())
    }

    pub fn find_by_id(&self, id: ReviewId) -> Result<Option<SharedReview>> {
        let row = {
            let conn = self
                .conn
                .lock()
                .expect("ReviewRepository: failed to acquire database lock");
            let mut stmt =
                conn.prepare("SELECT id, year, summary, employee_id FROM reviews WHERE id = ?1")?;
            let mut rows = stmt.query_map([id], row_to_tuple)?;
            match rows.next() {
                Some(row) => Some(row?),
                None => None,
            }
        };

        // Lock released above; reconciliation re-locks the connection for
        // the employee existence check.
        match row {
            Some(row) => self.reconcile(row).map(Some),
            None => Ok(None),
        }
    }

    /// Every row in store iteration order (no ORDER BY), each reconciled
    /// against the identity cache.
    pub fn get_all(&self) -> Result<Vec<SharedReview>> {
        let fetched: Vec<ReviewRow> = {
            let conn = self
                .conn
                .lock()
                .expect("ReviewRepository: failed to acquire database lock");
            let mut stmt = conn.prepare("SELECT id, year, summary, employee_id FROM reviews")?;
            let rows = stmt.query_map([], row_to_tuple)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        fetched.into_iter().map(|row| self.reconcile(row)).collect()
    }

    /// Instance-from-row rule: a cached instance is updated in place through
    /// the validating setters and returned as-is, preserving reference
    /// identity for existing callers; an uncached row becomes a new cached
    /// instance.
    fn reconcile(&self, (id, year, summary, employee_id): ReviewRow) -> Result<SharedReview> {
        let cached = self.cache.borrow().get(&id).cloned();
        if let Some(existing) = cached {
            {
                let mut review = existing.borrow_mut();
                review.set_year(year)?;
                review.set_employee_id(employee_id, self.employees.as_ref())?;
                review.set_summary(summary)?;
            }
            return Ok(existing);
        }

        let mut review = Review::new(year, summary, employee_id, self.employees.as_ref())?;
        review.assign_id(id);
        let shared = Rc::new(RefCell::new(review));
        self.cache.borrow_mut().insert(id, Rc::clone(&shared));
        Ok(shared)
    }
}

fn row_to_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}
