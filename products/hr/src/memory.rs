use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use entity::{benefit, employee, employee_benefit};

use crate::clock::Clock;
use crate::repository::{
    EmployeeStore, ListFilter, RepoEntity, RepoError, RepoResult, Repository,
};

/// Generic list-backed repository: a Vec plus linear scans, behind a single
/// coarse lock. Safe for concurrent handlers only because of that lock;
/// there is no finer-grained concurrency control.
pub struct ListRepository<T> {
    items: Mutex<Vec<T>>,
}

impl<T: RepoEntity> ListRepository<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl<T: RepoEntity> Default for ListRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: RepoEntity> Repository<T> for ListRepository<T> {
    async fn get_by_id(&self, id: i32) -> RepoResult<Option<T>> {
        let items = self.items.lock().expect("repository lock poisoned");
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    async fn get_all(&self) -> RepoResult<Vec<T>> {
        let items = self.items.lock().expect("repository lock poisoned");
        Ok(items.clone())
    }

    async fn create(&self, mut entity: T) -> RepoResult<T> {
        if entity.id() != 0 {
            return Err(RepoError::InvalidArgument(
                "entity must not carry an id before create",
            ));
        }
        let mut items = self.items.lock().expect("repository lock poisoned");
        let next_id = items.iter().map(|item| item.id()).max().unwrap_or(0) + 1;
        entity.assign_id(next_id);
        items.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> RepoResult<T> {
        if entity.id() == 0 {
            return Err(RepoError::InvalidArgument("entity id missing on update"));
        }
        let mut items = self.items.lock().expect("repository lock poisoned");
        match items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(existing) => {
                existing.apply_update(&entity);
                Ok(existing.clone())
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, entity: &T) -> RepoResult<()> {
        if entity.id() == 0 {
            return Err(RepoError::InvalidArgument("entity id missing on delete"));
        }
        let mut items = self.items.lock().expect("repository lock poisoned");
        let before = items.len();
        items.retain(|item| item.id() != entity.id());
        if items.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// In-memory employee store: a `ListRepository` for the employees plus two
/// plain lists for the benefit catalog and the enrollments.
pub struct MemoryEmployeeStore {
    employees: ListRepository<employee::Model>,
    benefits: Mutex<Vec<benefit::Model>>,
    enrollments: Mutex<Vec<employee_benefit::Model>>,
    clock: Arc<dyn Clock>,
    actor: String,
}

impl MemoryEmployeeStore {
    pub fn new(clock: Arc<dyn Clock>, actor: impl Into<String>) -> Self {
        Self {
            employees: ListRepository::new(),
            benefits: Mutex::new(Vec::new()),
            enrollments: Mutex::new(Vec::new()),
            clock,
            actor: actor.into(),
        }
    }
}

#[async_trait]
impl Repository<employee::Model> for MemoryEmployeeStore {
    async fn get_by_id(&self, id: i32) -> RepoResult<Option<employee::Model>> {
        self.employees.get_by_id(id).await
    }

    async fn get_all(&self) -> RepoResult<Vec<employee::Model>> {
        self.employees.get_all().await
    }

    async fn create(&self, mut entity: employee::Model) -> RepoResult<employee::Model> {
        entity.created_by = Some(self.actor.clone());
        entity.created_at = Some(self.clock.now().into());
        self.employees.create(entity).await
    }

    async fn update(&self, mut entity: employee::Model) -> RepoResult<employee::Model> {
        entity.updated_by = Some(self.actor.clone());
        entity.updated_at = Some(self.clock.now().into());
        self.employees.update(entity).await
    }

    async fn delete(&self, entity: &employee::Model) -> RepoResult<()> {
        self.employees.delete(entity).await
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn list(&self, filter: &ListFilter) -> RepoResult<Vec<employee::Model>> {
        fn matches(value: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .is_none_or(|n| value.to_lowercase().contains(&n.to_lowercase()))
        }

        let skip = filter.page.saturating_sub(1) * filter.per_page;
        let all = self.employees.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|e| {
                matches(&e.first_name, &filter.first_name_contains)
                    && matches(&e.last_name, &filter.last_name_contains)
            })
            .skip(skip as usize)
            .take(filter.per_page as usize)
            .collect())
    }

    async fn benefits_for(&self, employee_id: i32) -> RepoResult<Vec<employee_benefit::Model>> {
        let enrollments = self.enrollments.lock().expect("repository lock poisoned");
        Ok(enrollments
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn benefit_catalog(&self) -> RepoResult<Vec<benefit::Model>> {
        let benefits = self.benefits.lock().expect("repository lock poisoned");
        Ok(benefits.clone())
    }

    async fn add_benefit(&self, mut benefit: benefit::Model) -> RepoResult<benefit::Model> {
        if benefit.id != 0 {
            return Err(RepoError::InvalidArgument(
                "benefit must not carry an id before create",
            ));
        }
        let mut benefits = self.benefits.lock().expect("repository lock poisoned");
        if benefits.iter().any(|b| b.name == benefit.name) {
            return Err(RepoError::Conflict("benefit name already exists"));
        }
        benefit.id = benefits.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        benefits.push(benefit.clone());
        Ok(benefit)
    }

    async fn enroll(
        &self,
        employee_id: i32,
        benefit_id: i32,
        cost_cents: Option<i64>,
    ) -> RepoResult<employee_benefit::Model> {
        if self.employees.get_by_id(employee_id).await?.is_none() {
            return Err(RepoError::NotFound);
        }
        {
            let benefits = self.benefits.lock().expect("repository lock poisoned");
            if !benefits.iter().any(|b| b.id == benefit_id) {
                return Err(RepoError::NotFound);
            }
        }
        let mut enrollments = self.enrollments.lock().expect("repository lock poisoned");
        if enrollments
            .iter()
            .any(|e| e.employee_id == employee_id && e.benefit_id == benefit_id)
        {
            return Err(RepoError::Conflict("employee already enrolled in benefit"));
        }
        let enrollment = employee_benefit::Model {
            id: enrollments.iter().map(|e| e.id).max().unwrap_or(0) + 1,
            employee_id,
            benefit_id,
            cost_cents,
        };
        enrollments.push(enrollment.clone());
        Ok(enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::clock::FixedClock;

    fn fixed_store() -> MemoryEmployeeStore {
        let instant = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        MemoryEmployeeStore::new(Arc::new(FixedClock(instant)), "system")
    }

    fn new_employee(first: &str, last: &str) -> employee::Model {
        employee::Model {
            id: 0,
            first_name: first.to_string(),
            last_name: last.to_string(),
            social_security_number: None,
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

    #[tokio::test]
    async fn create_assigns_max_plus_one_ids() {
        let store = fixed_store();
        let john = store.create(new_employee("John", "Doe")).await.unwrap();
        let jane = store.create(new_employee("Jane", "Doe")).await.unwrap();
        assert_eq!(john.id, 1);
        assert_eq!(jane.id, 2);

        store.delete(&john).await.unwrap();
        let third = store.create(new_employee("Jim", "Doe")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn create_rejects_preassigned_id() {
        let store = fixed_store();
        let mut employee = new_employee("John", "Doe");
        employee.id = 7;
        let err = store.create(employee).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn create_stamps_audit_fields_from_injected_clock() {
        let instant = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let store = MemoryEmployeeStore::new(Arc::new(FixedClock(instant)), "seed-bot");
        let created = store.create(new_employee("John", "Doe")).await.unwrap();
        assert_eq!(created.created_by.as_deref(), Some("seed-bot"));
        assert_eq!(created.created_at, Some(instant.into()));
        assert_eq!(created.updated_at, None);

        let mut incoming = created.clone();
        incoming.city = Some("Anytown".into());
        let updated = store.update(incoming).await.unwrap();
        assert_eq!(updated.updated_by.as_deref(), Some("seed-bot"));
        assert_eq!(updated.updated_at, Some(instant.into()));
    }

    #[tokio::test]
    async fn update_copies_only_the_contact_whitelist() {
        let store = fixed_store();
        let mut seeded = new_employee("John", "Doe");
        seeded.social_security_number = Some("123-45-6789".into());
        let created = store.create(seeded).await.unwrap();

        let mut incoming = created.clone();
        incoming.first_name = "Hacked".into();
        incoming.social_security_number = Some("000-00-0000".into());
        incoming.address1 = Some("123 Main St".into());
        store.update(incoming).await.unwrap();

        let stored = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "John");
        assert_eq!(stored.social_security_number.as_deref(), Some("123-45-6789"));
        assert_eq!(stored.address1.as_deref(), Some("123 Main St"));
    }

    #[tokio::test]
    async fn update_unknown_id_fails_and_leaves_store_unchanged() {
        let store = fixed_store();
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
        let store = fixed_store();
        let john = store.create(new_employee("John", "Doe")).await.unwrap();
        let jane = store.create(new_employee("Jane", "Doe")).await.unwrap();

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
    async fn list_pages_in_insertion_order() {
        let store = fixed_store();
        store.create(new_employee("John", "Doe")).await.unwrap();
        store.create(new_employee("Jane", "Doe")).await.unwrap();

        let filter = ListFilter {
            page: 2,
            per_page: 1,
            ..ListFilter::default()
        };
        let page = store.list(&filter).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].first_name, "Jane");
    }

    #[tokio::test]
    async fn list_filters_are_case_insensitive_substrings() {
        let store = fixed_store();
        store.create(new_employee("John", "Doe")).await.unwrap();
        store.create(new_employee("Jane", "Smith")).await.unwrap();

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
    async fn enroll_rejects_duplicate_pair() {
        let store = fixed_store();
        let john = store.create(new_employee("John", "Doe")).await.unwrap();
        let health = store
            .add_benefit(benefit::Model {
                id: 0,
                name: "Health".into(),
                description: None,
                base_cost_cents: 100_00,
            })
            .await
            .unwrap();

        store.enroll(john.id, health.id, Some(90_00)).await.unwrap();
        let err = store.enroll(john.id, health.id, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
        assert_eq!(store.benefits_for(john.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn enroll_requires_existing_employee_and_benefit() {
        let store = fixed_store();
        let john = store.create(new_employee("John", "Doe")).await.unwrap();
        assert!(matches!(
            store.enroll(99, 1, None).await.unwrap_err(),
            RepoError::NotFound
        ));
        assert!(matches!(
            store.enroll(john.id, 99, None).await.unwrap_err(),
            RepoError::NotFound
        ));
    }
}
