use std::sync::Arc;

use chrono::{TimeZone, Utc};
use entity::{benefit, employee};
use migration::{Migrator, MigratorTrait};
use products_hr::clock::{Clock, FixedClock};
use products_hr::database::DbEmployeeStore;
use products_hr::repository::{EmployeeStore, ListFilter, RepoError, Repository};
use products_hr::seed;
use sea_orm::Database;

async fn migrated_store() -> DbEmployeeStore {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    let instant = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(instant));
    DbEmployeeStore::new(conn, clock, "tests")
}

fn new_employee(first: &str, last: &str) -> employee::Model {
    employee::Model {
        id: 0,
        first_name: first.to_string(),
        last_name: last.to_string(),
        social_security_number: Some("123-45-6789".to_string()),
        address1: None,
        address2: None,
        city: None,
        state: None,
        zip_code: None,
        phone_number: None,
        email: None,
        created_by: None,
        updated_by: None,
        created_at: None,
        updated_at: None,
    }
}

fn new_benefit(name: &str, base_cost_cents: i64) -> benefit::Model {
    benefit::Model {
        id: 0,
        name: name.to_string(),
        description: None,
        base_cost_cents,
    }
}

#[tokio::test]
async fn autoincrement_ids_and_audit_stamps() {
    let store = migrated_store().await;
    let john = store.create(new_employee("John", "Doe")).await.unwrap();
    let jane = store.create(new_employee("Jane", "Smith")).await.unwrap();
    assert_eq!(john.id, 1);
    assert_eq!(jane.id, 2);

    let fetched = store.get_by_id(john.id).await.unwrap().unwrap();
    assert_eq!(fetched.first_name, "John");
    assert_eq!(fetched.created_by.as_deref(), Some("tests"));
    assert!(fetched.created_at.is_some());
    assert_eq!(fetched.updated_at, None);
}

#[tokio::test]
async fn create_rejects_preassigned_id() {
    let store = migrated_store().await;
    let mut employee = new_employee("John", "Doe");
    employee.id = 5;
    let err = store.create(employee).await.unwrap_err();
    assert!(matches!(err, RepoError::InvalidArgument(_)));
}

#[tokio::test]
async fn update_copies_only_the_contact_whitelist() {
    let store = migrated_store().await;
    let created = store.create(new_employee("John", "Doe")).await.unwrap();

    let mut incoming = created.clone();
    incoming.first_name = "Hacked".into();
    incoming.social_security_number = Some("000-00-0000".into());
    incoming.address1 = Some("123 Main St".into());
    incoming.city = Some("Anytown".into());
    let saved = store.update(incoming).await.unwrap();

    assert_eq!(saved.first_name, "John");
    assert_eq!(saved.social_security_number.as_deref(), Some("123-45-6789"));
    assert_eq!(saved.address1.as_deref(), Some("123 Main St"));
    assert_eq!(saved.updated_by.as_deref(), Some("tests"));
    assert!(saved.updated_at.is_some());
}

#[tokio::test]
async fn update_unknown_id_fails_and_leaves_rows_unchanged() {
    let store = migrated_store().await;
    store.create(new_employee("John", "Doe")).await.unwrap();
    let before = store.get_all().await.unwrap();

    let mut ghost = new_employee("Ghost", "Nobody");
    ghost.id = 99;
    let err = store.update(ghost).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
    assert_eq!(store.get_all().await.unwrap(), before);
}

#[tokio::test]
async fn delete_removes_exactly_the_target() {
    let store = migrated_store().await;
    let john = store.create(new_employee("John", "Doe")).await.unwrap();
    let jane = store.create(new_employee("Jane", "Smith")).await.unwrap();

    store.delete(&john).await.unwrap();
    let remaining = store.get_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, jane.id);
    assert!(store.get_by_id(john.id).await.unwrap().is_none());
    assert!(matches!(
        store.delete(&john).await.unwrap_err(),
        RepoError::NotFound
    ));
}

#[tokio::test]
async fn list_paginates_and_filters_case_insensitively() {
    let store = migrated_store().await;
    store.create(new_employee("John", "Doe")).await.unwrap();
    store.create(new_employee("Jane", "Smith")).await.unwrap();

    let filter = ListFilter {
        page: 2,
        per_page: 1,
        ..ListFilter::default()
    };
    let page = store.list(&filter).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].first_name, "Jane");

    let filter = ListFilter {
        first_name_contains: Some("JOH".into()),
        ..ListFilter::default()
    };
    let hits = store.list(&filter).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].first_name, "John");

    let filter = ListFilter {
        last_name_contains: Some("mit".into()),
        ..ListFilter::default()
    };
    let hits = store.list(&filter).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].last_name, "Smith");
}

#[tokio::test]
async fn unique_enrollment_pair_is_enforced_by_the_index() {
    let store = migrated_store().await;
    let john = store.create(new_employee("John", "Doe")).await.unwrap();
    let health = store.add_benefit(new_benefit("Health", 100_00)).await.unwrap();

    store.enroll(john.id, health.id, Some(90_00)).await.unwrap();
    let err = store.enroll(john.id, health.id, None).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert_eq!(store.benefits_for(john.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_benefit_names_conflict() {
    let store = migrated_store().await;
    store.add_benefit(new_benefit("Health", 100_00)).await.unwrap();
    let err = store
        .add_benefit(new_benefit("Health", 90_00))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[tokio::test]
async fn seed_is_idempotent() {
    let store = migrated_store().await;
    seed::seed(&store).await.unwrap();
    seed::seed(&store).await.unwrap();

    let employees = store.get_all().await.unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(store.benefit_catalog().await.unwrap().len(), 3);
    assert_eq!(store.benefits_for(employees[0].id).await.unwrap().len(), 2);
    assert_eq!(store.benefits_for(employees[1].id).await.unwrap().len(), 2);
}
