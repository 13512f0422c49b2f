use entity::{benefit, employee};
use tracing::info;

use crate::repository::{EmployeeStore, RepoResult};

/// Populate baseline data. Idempotent: each section runs only when its rows
/// are absent, so calling this at every startup is safe.
pub async fn seed(store: &dyn EmployeeStore) -> RepoResult<()> {
    if store.get_all().await?.is_empty() {
        store
            .create(seed_employee(
                "John",
                "Doe",
                "123-45-6789",
                "123 Main St",
                None,
                "Anytown",
                "NY",
                "12345",
                "555-123-4567",
                "john.doe@example.com",
            ))
            .await?;
        store
            .create(seed_employee(
                "Jane",
                "Smith",
                "987-65-4321",
                "456 Elm St",
                Some("Apt 2B"),
                "Othertown",
                "CA",
                "98765",
                "555-987-6543",
                "jane.smith@example.com",
            ))
            .await?;
        info!("seeded employees");
    }

    if store.benefit_catalog().await?.is_empty() {
        store
            .add_benefit(seed_benefit(
                "Health",
                "Medical, dental, and vision coverage",
                100_00,
            ))
            .await?;
        store
            .add_benefit(seed_benefit("Dental", "Dental coverage", 50_00))
            .await?;
        store
            .add_benefit(seed_benefit("Vision", "Vision coverage", 30_00))
            .await?;
        info!("seeded benefit catalog");
    }

    let employees = store.get_all().await?;
    let mut any_enrollment = false;
    for employee in &employees {
        if !store.benefits_for(employee.id).await?.is_empty() {
            any_enrollment = true;
            break;
        }
    }
    if !any_enrollment {
        let catalog = store.benefit_catalog().await?;
        let benefit_id =
            |name: &str| catalog.iter().find(|b| b.name == name).map(|b| b.id);
        let john = employees.iter().find(|e| e.first_name == "John");
        let jane = employees.iter().find(|e| e.first_name == "Jane");
        if let (Some(john), Some(jane), Some(health), Some(dental), Some(vision)) = (
            john,
            jane,
            benefit_id("Health"),
            benefit_id("Dental"),
            benefit_id("Vision"),
        ) {
            store.enroll(john.id, health, Some(100_00)).await?;
            store.enroll(john.id, dental, None).await?;
            store.enroll(jane.id, health, Some(120_00)).await?;
            store.enroll(jane.id, vision, None).await?;
            info!("seeded employee benefit enrollments");
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn seed_employee(
    first_name: &str,
    last_name: &str,
    ssn: &str,
    address1: &str,
    address2: Option<&str>,
    city: &str,
    state: &str,
    zip_code: &str,
    phone_number: &str,
    email: &str,
) -> employee::Model {
    employee::Model {
        id: 0,
        first_name: first_name.into(),
        last_name: last_name.into(),
        social_security_number: Some(ssn.into()),
        address1: Some(address1.into()),
        address2: address2.map(Into::into),
        city: Some(city.into()),
        state: Some(state.into()),
        zip_code: Some(zip_code.into()),
        phone_number: Some(phone_number.into()),
        email: Some(email.into()),
        created_by: None,
        updated_by: None,
        created_at: None,
        updated_at: None,
    }
}

fn seed_benefit(name: &str, description: &str, base_cost_cents: i64) -> benefit::Model {
    benefit::Model {
        id: 0,
        name: name.into(),
        description: Some(description.into()),
        base_cost_cents,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;
    use crate::memory::MemoryEmployeeStore;
    use crate::repository::Repository;

    #[tokio::test]
    async fn seeding_twice_leaves_counts_unchanged() {
        let instant = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let store = MemoryEmployeeStore::new(Arc::new(FixedClock(instant)), "system");

        seed(&store).await.unwrap();
        seed(&store).await.unwrap();

        let employees = store.get_all().await.unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(store.benefit_catalog().await.unwrap().len(), 3);

        let john = &employees[0];
        let jane = &employees[1];
        assert_eq!(john.first_name, "John");
        assert_eq!(store.benefits_for(john.id).await.unwrap().len(), 2);
        assert_eq!(store.benefits_for(jane.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seeded_overrides_and_base_costs() {
        let instant = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let store = MemoryEmployeeStore::new(Arc::new(FixedClock(instant)), "system");
        seed(&store).await.unwrap();

        let catalog = store.benefit_catalog().await.unwrap();
        let health = catalog.iter().find(|b| b.name == "Health").unwrap();
        let john = &store.get_all().await.unwrap()[0];
        let enrollments = store.benefits_for(john.id).await.unwrap();
        let health_enrollment = enrollments
            .iter()
            .find(|e| e.benefit_id == health.id)
            .unwrap();
        assert_eq!(health_enrollment.cost_cents, Some(100_00));
        let dental_enrollment = enrollments
            .iter()
            .find(|e| e.benefit_id != health.id)
            .unwrap();
        assert_eq!(dental_enrollment.cost_cents, None);
    }
}
