use entity::employee;
use platform_api::ValidationErrors;

use crate::dto::{CreateEmployeeRequest, ListEmployeesQuery, UpdateEmployeeRequest};
use crate::repository::{RepoResult, Repository};

pub const MAX_RECORDS_PER_PAGE: i64 = 100;

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

pub fn validate_create(request: &CreateEmployeeRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if is_blank(&request.first_name) {
        errors.add("firstName", "first name must not be empty");
    }
    if is_blank(&request.last_name) {
        errors.add("lastName", "last name must not be empty");
    }
    errors
}

pub fn validate_list(query: &ListEmployeesQuery) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Some(page) = query.page {
        if page < 1 {
            errors.add("page", "page number must be set to a positive number");
        }
    }
    if let Some(records) = query.records_per_page {
        if records < 1 {
            errors.add("recordsPerPage", "you must return at least one record");
        } else if records > MAX_RECORDS_PER_PAGE {
            errors.add("recordsPerPage", "you cannot return more than 100 records");
        }
    }
    errors
}

/// Update validation is stateful: it reads the currently stored record
/// through a read-only repository handle, so an address that was already
/// set cannot be silently blanked out.
pub struct UpdateEmployeeValidator<'a> {
    employees: &'a dyn Repository<employee::Model>,
}

impl<'a> UpdateEmployeeValidator<'a> {
    pub fn new(employees: &'a dyn Repository<employee::Model>) -> Self {
        Self { employees }
    }

    pub async fn validate(
        &self,
        id: i32,
        request: &UpdateEmployeeRequest,
    ) -> RepoResult<ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(existing) = self.employees.get_by_id(id).await? {
            if existing.address1.is_some() && is_blank(&request.address1) {
                errors.add(
                    "address1",
                    "address1 must not be empty as an address was already set for the employee",
                );
            }
        }
        Ok(errors)
    }
}
