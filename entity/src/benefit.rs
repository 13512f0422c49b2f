use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "benefit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub name: String,
    pub description: Option<String>,
    pub base_cost_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    EmployeeBenefit,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::EmployeeBenefit => Entity::has_many(super::employee_benefit::Entity).into(),
        }
    }
}

impl Related<super::employee_benefit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeBenefit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
