use sea_orm_migration::prelude::*;

use super::m20261012_000002_create_companies::Companies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Jobs::Table)
          .if_not_exists()
          .col(ColumnDef::new(Jobs::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Jobs::CompanyId).string().not_null())
          .col(ColumnDef::new(Jobs::Title).json().not_null())
          .col(ColumnDef::new(Jobs::Location).json().not_null())
          .col(ColumnDef::new(Jobs::Description).json().not_null())
          .col(ColumnDef::new(Jobs::Requirements).json().not_null())
          .col(ColumnDef::new(Jobs::JobType).string().null())
          .col(ColumnDef::new(Jobs::Salary).string().null())
          .col(
            ColumnDef::new(Jobs::Status).string().not_null().default("active"),
          )
          .col(
            ColumnDef::new(Jobs::IsInternal).boolean().not_null().default(false),
          )
          .col(ColumnDef::new(Jobs::ImageUrl).string().null())
          .col(ColumnDef::new(Jobs::ProfessionalArea).string().null())
          .col(ColumnDef::new(Jobs::PostedDate).date_time().not_null())
          .col(ColumnDef::new(Jobs::ExpiryDate).date_time().not_null())
          .col(ColumnDef::new(Jobs::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_jobs_company")
              .from(Jobs::Table, Jobs::CompanyId)
              .to(Companies::Table, Companies::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_jobs_company")
          .table(Jobs::Table)
          .col(Jobs::CompanyId)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_jobs_status_expiry")
          .table(Jobs::Table)
          .col(Jobs::Status)
          .col(Jobs::ExpiryDate)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Jobs::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Jobs {
  Table,
  Id,
  CompanyId,
  Title,
  Location,
  Description,
  Requirements,
  JobType,
  Salary,
  Status,
  IsInternal,
  ImageUrl,
  ProfessionalArea,
  PostedDate,
  ExpiryDate,
  UpdatedAt,
}
