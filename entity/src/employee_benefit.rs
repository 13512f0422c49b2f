use sea_orm::entity::prelude::*;

/// Join entity linking one employee to one benefit, optionally carrying an
/// employee-specific cost override. The `(benefit_id, employee_id)` pair is
/// unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employee_benefit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    #[sea_orm(indexed)]
    pub benefit_id: i32,
    pub cost_cents: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::benefit::Entity",
        from = "Column::BenefitId",
        to = "super::benefit::Column::Id",
        on_delete = "Cascade"
    )]
    Benefit,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::benefit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Benefit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
