use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
    FirstName,
    LastName,
    SocialSecurityNumber,
    Address1,
    Address2,
    City,
    State,
    ZipCode,
    PhoneNumber,
    Email,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Benefit {
    Table,
    Id,
    Name,
    Description,
    BaseCostCents,
}

#[derive(DeriveIden)]
enum EmployeeBenefit {
    Table,
    Id,
    EmployeeId,
    BenefitId,
    CostCents,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employee::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::SocialSecurityNumber).string_len(16))
                    .col(ColumnDef::new(Employee::Address1).string_len(256))
                    .col(ColumnDef::new(Employee::Address2).string_len(256))
                    .col(ColumnDef::new(Employee::City).string_len(128))
                    .col(ColumnDef::new(Employee::State).string_len(64))
                    .col(ColumnDef::new(Employee::ZipCode).string_len(16))
                    .col(ColumnDef::new(Employee::PhoneNumber).string_len(64))
                    .col(ColumnDef::new(Employee::Email).string_len(320))
                    .col(ColumnDef::new(Employee::CreatedBy).string_len(128))
                    .col(ColumnDef::new(Employee::UpdatedBy).string_len(128))
                    .col(ColumnDef::new(Employee::CreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Employee::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_first_name")
                    .table(Employee::Table)
                    .col(Employee::FirstName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_last_name")
                    .table(Employee::Table)
                    .col(Employee::LastName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Benefit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Benefit::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Benefit::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Benefit::Description).string_len(512))
                    .col(ColumnDef::new(Benefit::BaseCostCents).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_benefit_name")
                    .table(Benefit::Table)
                    .col(Benefit::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeBenefit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeBenefit::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmployeeBenefit::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(EmployeeBenefit::BenefitId).integer().not_null())
                    .col(ColumnDef::new(EmployeeBenefit::CostCents).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_benefit_employee")
                            .from(EmployeeBenefit::Table, EmployeeBenefit::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_benefit_benefit")
                            .from(EmployeeBenefit::Table, EmployeeBenefit::BenefitId)
                            .to(Benefit::Table, Benefit::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One enrollment per employee/benefit pair.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_employee_benefit_pair")
                    .table(EmployeeBenefit::Table)
                    .col(EmployeeBenefit::BenefitId)
                    .col(EmployeeBenefit::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeBenefit::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Benefit::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await?;
        Ok(())
    }
}
