use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // plan_id is a weak reference: plans can be deleted while companies
    // still point at them, so no foreign key here.
    manager
      .create_table(
        Table::create()
          .table(Companies::Table)
          .if_not_exists()
          .col(ColumnDef::new(Companies::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Companies::Name).json().not_null())
          .col(ColumnDef::new(Companies::Description).json().not_null())
          .col(ColumnDef::new(Companies::Email).string().null())
          .col(ColumnDef::new(Companies::Phone).string().null())
          .col(ColumnDef::new(Companies::Website).string().null())
          .col(ColumnDef::new(Companies::PlanId).string().null())
          .col(ColumnDef::new(Companies::JobPostingsRemaining).integer().null())
          .col(ColumnDef::new(Companies::SubscriptionEndDate).date_time().null())
          .col(
            ColumnDef::new(Companies::IsRecruitmentClient)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Companies::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_companies_plan")
          .table(Companies::Table)
          .col(Companies::PlanId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Companies::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Companies {
  Table,
  Id,
  Name,
  Description,
  Email,
  Phone,
  Website,
  PlanId,
  JobPostingsRemaining,
  SubscriptionEndDate,
  IsRecruitmentClient,
  CreatedAt,
}
