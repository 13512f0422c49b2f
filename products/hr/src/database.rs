use std::sync::Arc;

use async_trait::async_trait;
use entity::{benefit, employee, employee_benefit};
use platform_db::DbPool;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr,
};

use crate::clock::Clock;
use crate::repository::{
    EmployeeStore, ListFilter, RepoError, RepoResult, Repository,
};

/// Employee store backed by the relational database. Identity assignment is
/// delegated to the table's autoincrement; the unique enrollment pair is
/// enforced by the `uq_employee_benefit_pair` index.
pub struct DbEmployeeStore {
    db: DbPool,
    clock: Arc<dyn Clock>,
    actor: String,
}

impl DbEmployeeStore {
    pub fn new(db: DbPool, clock: Arc<dyn Clock>, actor: impl Into<String>) -> Self {
        Self {
            db,
            clock,
            actor: actor.into(),
        }
    }
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn contains_lowered(column: employee::Column, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}

#[async_trait]
impl Repository<employee::Model> for DbEmployeeStore {
    async fn get_by_id(&self, id: i32) -> RepoResult<Option<employee::Model>> {
        Ok(employee::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn get_all(&self) -> RepoResult<Vec<employee::Model>> {
        Ok(employee::Entity::find()
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn create(&self, entity: employee::Model) -> RepoResult<employee::Model> {
        if entity.id != 0 {
            return Err(RepoError::InvalidArgument(
                "entity must not carry an id before create",
            ));
        }
        let now = self.clock.now();
        let created = employee::ActiveModel {
            id: NotSet,
            first_name: Set(entity.first_name),
            last_name: Set(entity.last_name),
            social_security_number: Set(entity.social_security_number),
            address1: Set(entity.address1),
            address2: Set(entity.address2),
            city: Set(entity.city),
            state: Set(entity.state),
            zip_code: Set(entity.zip_code),
            phone_number: Set(entity.phone_number),
            email: Set(entity.email),
            created_by: Set(Some(self.actor.clone())),
            updated_by: Set(None),
            created_at: Set(Some(now.into())),
            updated_at: Set(None),
        }
        .insert(&self.db)
        .await?;
        Ok(created)
    }

    async fn update(&self, entity: employee::Model) -> RepoResult<employee::Model> {
        if entity.id == 0 {
            return Err(RepoError::InvalidArgument("entity id missing on update"));
        }
        let existing = employee::Entity::find_by_id(entity.id)
            .one(&self.db)
            .await?
            .ok_or(RepoError::NotFound)?;

        let now = self.clock.now();
        let mut model: employee::ActiveModel = existing.into();
        model.address1 = Set(entity.address1);
        model.address2 = Set(entity.address2);
        model.city = Set(entity.city);
        model.state = Set(entity.state);
        model.zip_code = Set(entity.zip_code);
        model.phone_number = Set(entity.phone_number);
        model.email = Set(entity.email);
        model.updated_by = Set(Some(self.actor.clone()));
        model.updated_at = Set(Some(now.into()));
        Ok(model.update(&self.db).await?)
    }

    async fn delete(&self, entity: &employee::Model) -> RepoResult<()> {
        if entity.id == 0 {
            return Err(RepoError::InvalidArgument("entity id missing on delete"));
        }
        let result = employee::Entity::delete_by_id(entity.id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for DbEmployeeStore {
    async fn list(&self, filter: &ListFilter) -> RepoResult<Vec<employee::Model>> {
        let mut condition = Condition::all();
        if let Some(needle) = &filter.first_name_contains {
            condition = condition.add(contains_lowered(employee::Column::FirstName, needle));
        }
        if let Some(needle) = &filter.last_name_contains {
            condition = condition.add(contains_lowered(employee::Column::LastName, needle));
        }

        let skip = filter.page.saturating_sub(1) * filter.per_page;
        Ok(employee::Entity::find()
            .filter(condition)
            .order_by_asc(employee::Column::Id)
            .offset(skip)
            .limit(filter.per_page)
            .all(&self.db)
            .await?)
    }

    async fn benefits_for(&self, employee_id: i32) -> RepoResult<Vec<employee_benefit::Model>> {
        Ok(employee_benefit::Entity::find()
            .filter(employee_benefit::Column::EmployeeId.eq(employee_id))
            .order_by_asc(employee_benefit::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn benefit_catalog(&self) -> RepoResult<Vec<benefit::Model>> {
        Ok(benefit::Entity::find()
            .order_by_asc(benefit::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn add_benefit(&self, benefit: benefit::Model) -> RepoResult<benefit::Model> {
        if benefit.id != 0 {
            return Err(RepoError::InvalidArgument(
                "benefit must not carry an id before create",
            ));
        }
        let model = benefit::ActiveModel {
            id: NotSet,
            name: Set(benefit.name),
            description: Set(benefit.description),
            base_cost_cents: Set(benefit.base_cost_cents),
        };
        match model.insert(&self.db).await {
            Ok(created) => Ok(created),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::Conflict("benefit name already exists"))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn enroll(
        &self,
        employee_id: i32,
        benefit_id: i32,
        cost_cents: Option<i64>,
    ) -> RepoResult<employee_benefit::Model> {
        let model = employee_benefit::ActiveModel {
            id: NotSet,
            employee_id: Set(employee_id),
            benefit_id: Set(benefit_id),
            cost_cents: Set(cost_cents),
        };
        match model.insert(&self.db).await {
            Ok(created) => Ok(created),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::Conflict("employee already enrolled in benefit"))
            }
            Err(err) => Err(err.into()),
        }
    }
}
