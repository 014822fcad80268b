use crate::domain::{Review, ReviewError, ValidationError};
use crate::infra::db::Database;
use std::rc::Rc;

/// In-memory database with all tables and one seeded employee.
fn setup() -> anyhow::Result<(Database, i64)> {
    let db = Database::open_in_memory()?;
    db.department_repo().create_table()?;
    db.employee_repo().create_table()?;
    db.review_repo().create_table()?;

    let dept = db.department_repo().create("Engineering", "Building 3")?;
    let employee = db
        .employee_repo()
        .create("Rosa Diaz", "Backend Engineer", dept.id)?;
    Ok((db, employee.id))
}

#[test]
fn test_department_repository_round_trip() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let repo = db.department_repo();
    repo.create_table()?;

    let dept = repo.create("Sales", "Floor 2")?;
    assert_eq!(dept.id, 1);

    let found = repo.find_by_id(dept.id)?.expect("department");
    assert_eq!(found, dept);
    assert!(repo.find_by_id(99)?.is_none());
    assert_eq!(repo.list_all()?.len(), 1);

    Ok(())
}

#[test]
fn test_employee_repository_round_trip() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    db.department_repo().create_table()?;
    let repo = db.employee_repo();
    repo.create_table()?;

    let dept = db.department_repo().create("Sales", "Floor 2")?;
    let employee = repo.create("Jake Peralta", "Account Manager", dept.id)?;
    assert_eq!(employee.id, 1);

    let found = repo.find_by_id(employee.id)?.expect("employee");
    assert_eq!(found, employee);
    assert!(repo.find_by_id(42)?.is_none());
    assert_eq!(repo.list_all()?.len(), 1);

    Ok(())
}

#[test]
fn test_create_and_find_round_trip() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let created = repo.create(2020, "Good work", employee_id)?;
    let id = created.borrow().id().expect("assigned id");

    let found = repo.find_by_id(id)?.expect("review");
    assert!(Rc::ptr_eq(&created, &found));
    assert_eq!(found.borrow().year(), 2020);
    assert_eq!(found.borrow().summary(), "Good work");
    assert_eq!(found.borrow().employee_id(), employee_id);

    Ok(())
}

#[test]
fn test_find_by_id_returns_same_instance() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let created = repo.create(2021, "Strong year", employee_id)?;
    let id = created.borrow().id().unwrap();

    let first = repo.find_by_id(id)?.expect("review");
    let second = repo.find_by_id(id)?.expect("review");
    assert!(Rc::ptr_eq(&first, &second));

    Ok(())
}

#[test]
fn test_first_row_gets_id_one() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let review = repo.create(2021, "Exceeded expectations", employee_id)?;
    assert_eq!(review.borrow().id(), Some(1));

    Ok(())
}

#[test]
fn test_create_rejects_invalid_year_without_insert() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let err = repo.create(1999, "x", employee_id).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::YearBeforeMinimum(1999))
    );
    assert!(repo.get_all()?.is_empty());

    Ok(())
}

#[test]
fn test_create_rejects_bad_employee_ids() -> anyhow::Result<()> {
    let (db, _) = setup()?;
    let repo = db.review_repo();

    let err = repo.create(2020, "Good work", 0).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::NonPositiveEmployeeId(0))
    );

    let err = repo.create(2020, "Good work", 999).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::UnknownEmployee(999))
    );

    Ok(())
}

#[test]
fn test_update_persists_across_caches() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let review = repo.create(2020, "Good work", employee_id)?;
    let id = review.borrow().id().unwrap();

    review.borrow_mut().set_summary("Great work")?;
    repo.update(&review.borrow())?;

    // A second repository has an empty cache, so this is a real re-read.
    let fresh_repo = db.review_repo();
    let reloaded = fresh_repo.find_by_id(id)?.expect("review");
    assert!(!Rc::ptr_eq(&review, &reloaded));
    assert_eq!(reloaded.borrow().summary(), "Great work");

    Ok(())
}

#[test]
fn test_update_requires_saved_review() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let employees = db.employee_repo();
    let review = Review::new(2020, "Good work", employee_id, &employees)?;
    let err = repo.update(&review).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ReviewError>(),
        Some(&ReviewError::Unsaved)
    );

    Ok(())
}

#[test]
fn test_save_twice_errors() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let review = repo.create(2020, "Good work", employee_id)?;
    let id = review.borrow().id().unwrap();

    let err = repo.save(&review).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ReviewError>(),
        Some(&ReviewError::AlreadySaved(id))
    );

    Ok(())
}

#[test]
fn test_delete_clears_row_cache_and_id() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let review = repo.create(2020, "Good work", employee_id)?;
    let id = review.borrow().id().unwrap();

    repo.delete(&review)?;
    assert_eq!(review.borrow().id(), None);
    assert!(repo.find_by_id(id)?.is_none());

    // Deleting again is an explicit error, not a silent no-op.
    let err = repo.delete(&review).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ReviewError>(),
        Some(&ReviewError::Unsaved)
    );

    Ok(())
}

#[test]
fn test_get_all_returns_every_row() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    repo.create(2020, "Good work", employee_id)?;
    repo.create(2021, "Better work", employee_id)?;
    repo.create(2022, "Best work", employee_id)?;

    let all = repo.get_all()?;
    assert_eq!(all.len(), 3);
    for review in &all {
        let review = review.borrow();
        assert!(review.year() >= 2000);
        assert!(!review.summary().is_empty());
        assert_eq!(review.employee_id(), employee_id);
    }

    // Repeated loads keep handing back the cached instances.
    let again = repo.get_all()?;
    for (a, b) in all.iter().zip(&again) {
        assert!(Rc::ptr_eq(a, b));
    }

    Ok(())
}

#[test]
fn test_reconcile_updates_cached_instance_in_place() -> anyhow::Result<()> {
    let (db, employee_id) = setup()?;
    let repo = db.review_repo();

    let review = repo.create(2020, "Good work", employee_id)?;
    let id = review.borrow().id().unwrap();

    // Mutate the row behind the cache's back.
    {
        let conn = db.connection();
        let guard = conn.lock().unwrap();
        guard.execute("UPDATE reviews SET summary = ?1 WHERE id = ?2", ("Revised", id))?;
    }

    let reloaded = repo.find_by_id(id)?.expect("review");
    assert!(Rc::ptr_eq(&review, &reloaded));
    assert_eq!(review.borrow().summary(), "Revised");

    Ok(())
}

#[test]
fn test_create_and_drop_table_are_idempotent() -> anyhow::Result<()> {
    let (db, _) = setup()?;
    let repo = db.review_repo();

    repo.create_table()?;
    repo.drop_table()?;
    repo.drop_table()?;
    repo.create_table()?;

    Ok(())
}

#[test]
fn test_store_error_propagates_untranslated() -> anyhow::Result<()> {
    // No employees table: the existence lookup fails at the store level,
    // which is neither a ValidationError nor a ReviewError.
    let db = Database::open_in_memory()?;
    let repo = db.review_repo();
    repo.create_table()?;

    let err = repo.create(2020, "Good work", 1).unwrap_err();
    assert!(err.downcast_ref::<ValidationError>().is_none());
    assert!(err.downcast_ref::<ReviewError>().is_none());
    assert!(err.downcast_ref::<rusqlite::Error>().is_some());

    Ok(())
}
