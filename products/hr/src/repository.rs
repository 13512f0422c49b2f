use async_trait::async_trait;
use entity::{benefit, employee, employee_benefit};
use platform_api::ApiError;
use thiserror::Error;

pub const DEFAULT_RECORDS_PER_PAGE: u64 = 100;

#[derive(Debug, Error)]
pub enum RepoError {
    /// Contract violation by the caller, not a user-facing failure.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("record not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound => ApiError::NotFound,
            other => ApiError::internal(other.into()),
        }
    }
}

/// Identity access and merge rules an entity exposes to the generic
/// repository. `apply_update` copies only the mutable field whitelist.
pub trait RepoEntity: Clone + Send + Sync + 'static {
    fn id(&self) -> i32;
    fn assign_id(&mut self, id: i32);
    fn apply_update(&mut self, incoming: &Self);
}

/// CRUD contract over one entity type with integer identity.
///
/// `create` rejects an entity that already carries an id and `update`/
/// `delete` reject one without an id; an unknown id on `update` or `delete`
/// is an explicit `RepoError::NotFound`, never a silent no-op.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    async fn get_by_id(&self, id: i32) -> RepoResult<Option<T>>;
    async fn get_all(&self) -> RepoResult<Vec<T>>;
    async fn create(&self, entity: T) -> RepoResult<T>;
    async fn update(&self, entity: T) -> RepoResult<T>;
    async fn delete(&self, entity: &T) -> RepoResult<()>;
}

/// Filter and pagination for the employee list operation.
#[derive(Clone, Debug)]
pub struct ListFilter {
    pub page: u64,
    pub per_page: u64,
    pub first_name_contains: Option<String>,
    pub last_name_contains: Option<String>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_RECORDS_PER_PAGE,
            first_name_contains: None,
            last_name_contains: None,
        }
    }
}

/// Everything the HTTP layer and the seed routine need beyond plain CRUD.
/// Implementations are selected at composition time and injected as
/// `Arc<dyn EmployeeStore>`.
#[async_trait]
pub trait EmployeeStore: Repository<employee::Model> {
    async fn list(&self, filter: &ListFilter) -> RepoResult<Vec<employee::Model>>;
    async fn benefits_for(&self, employee_id: i32) -> RepoResult<Vec<employee_benefit::Model>>;
    async fn benefit_catalog(&self) -> RepoResult<Vec<benefit::Model>>;
    async fn add_benefit(&self, benefit: benefit::Model) -> RepoResult<benefit::Model>;
    async fn enroll(
        &self,
        employee_id: i32,
        benefit_id: i32,
        cost_cents: Option<i64>,
    ) -> RepoResult<employee_benefit::Model>;
}

impl RepoEntity for employee::Model {
    fn id(&self) -> i32 {
        self.id
    }

    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }

    // Names and SSN are immutable after creation; the audit stamps travel
    // with the update because the store sets them before handing off.
    fn apply_update(&mut self, incoming: &Self) {
        self.address1 = incoming.address1.clone();
        self.address2 = incoming.address2.clone();
        self.city = incoming.city.clone();
        self.state = incoming.state.clone();
        self.zip_code = incoming.zip_code.clone();
        self.phone_number = incoming.phone_number.clone();
        self.email = incoming.email.clone();
        self.updated_by = incoming.updated_by.clone();
        self.updated_at = incoming.updated_at;
    }
}
