use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(SubscriptionPlans::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(SubscriptionPlans::Id)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(SubscriptionPlans::Name).json().not_null())
          .col(ColumnDef::new(SubscriptionPlans::Description).json().not_null())
          .col(ColumnDef::new(SubscriptionPlans::Price).double().not_null())
          .col(
            ColumnDef::new(SubscriptionPlans::Currency)
              .string()
              .not_null()
              .default("EUR"),
          )
          .col(
            ColumnDef::new(SubscriptionPlans::PlanType)
              .string()
              .not_null()
              .default("subscription"),
          )
          .col(ColumnDef::new(SubscriptionPlans::DurationUnit).string().null())
          .col(ColumnDef::new(SubscriptionPlans::DurationValue).integer().null())
          .col(
            ColumnDef::new(SubscriptionPlans::JobPostingsLimit)
              .integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(SubscriptionPlans::Features).json().not_null())
          .col(
            ColumnDef::new(SubscriptionPlans::IsFeatured)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(SubscriptionPlans::IsActive)
              .boolean()
              .not_null()
              .default(true),
          )
          .col(
            ColumnDef::new(SubscriptionPlans::CreatedAt).date_time().not_null(),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(SubscriptionPlans::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum SubscriptionPlans {
  Table,
  Id,
  Name,
  Description,
  Price,
  Currency,
  PlanType,
  DurationUnit,
  DurationValue,
  JobPostingsLimit,
  Features,
  IsFeatured,
  IsActive,
  CreatedAt,
}
