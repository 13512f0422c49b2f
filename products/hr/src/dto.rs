use entity::{benefit, employee, employee_benefit};
use serde::{Deserialize, Serialize};

use crate::repository::{DEFAULT_RECORDS_PER_PAGE, ListFilter};

/// Payload for POST /employees. Identity and audit fields are never
/// caller-supplied; the repository fills them in at insert.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub social_security_number: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl CreateEmployeeRequest {
    /// Validation guarantees the names are present before this runs.
    pub fn into_entity(self) -> employee::Model {
        employee::Model {
            id: 0,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            social_security_number: self.social_security_number,
            address1: self.address1,
            address2: self.address2,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            phone_number: self.phone_number,
            email: self.email,
            created_by: None,
            updated_by: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Payload for PUT /employees/{id}. Names and SSN are immutable after
/// creation and deliberately absent here.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateEmployeeRequest {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl UpdateEmployeeRequest {
    pub fn apply_to(&self, target: &mut employee::Model) {
        target.address1 = self.address1.clone();
        target.address2 = self.address2.clone();
        target.city = self.city.clone();
        target.state = self.state.clone();
        target.zip_code = self.zip_code.clone();
        target.phone_number = self.phone_number.clone();
        target.email = self.email.clone();
    }
}

/// Query string for GET /employees.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListEmployeesQuery {
    pub page: Option<i64>,
    pub records_per_page: Option<i64>,
    pub first_name_contains: Option<String>,
    pub last_name_contains: Option<String>,
}

impl ListEmployeesQuery {
    /// Validation guarantees page and records_per_page are in range.
    pub fn into_filter(self) -> ListFilter {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        ListFilter {
            page: self.page.unwrap_or(1) as u64,
            per_page: self
                .records_per_page
                .map(|n| n as u64)
                .unwrap_or(DEFAULT_RECORDS_PER_PAGE),
            first_name_contains: non_blank(self.first_name_contains),
            last_name_contains: non_blank(self.last_name_contains),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBenefitResponse {
    pub id: i32,
    pub employee_id: i32,
    pub benefit_id: i32,
    pub cost_cents: Option<i64>,
}

impl EmployeeBenefitResponse {
    /// Projects one enrollment; the cost falls back to the benefit's base
    /// cost when no employee-specific override is stored.
    pub fn from_enrollment(
        enrollment: &employee_benefit::Model,
        catalog: &[benefit::Model],
    ) -> Self {
        Self {
            id: enrollment.id,
            employee_id: enrollment.employee_id,
            benefit_id: enrollment.benefit_id,
            cost_cents: enrollment.cost_cents.or_else(|| {
                catalog
                    .iter()
                    .find(|b| b.id == enrollment.benefit_id)
                    .map(|b| b.base_cost_cents)
            }),
        }
    }
}

/// The response shape deliberately has no SSN field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub benefits: Vec<EmployeeBenefitResponse>,
}

impl EmployeeResponse {
    pub fn from_entity(
        employee: employee::Model,
        enrollments: &[employee_benefit::Model],
        catalog: &[benefit::Model],
    ) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            address1: employee.address1,
            address2: employee.address2,
            city: employee.city,
            state: employee.state,
            zip_code: employee.zip_code,
            phone_number: employee.phone_number,
            email: employee.email,
            benefits: enrollments
                .iter()
                .map(|enrollment| EmployeeBenefitResponse::from_enrollment(enrollment, catalog))
                .collect(),
        }
    }
}
