//! Database migrations using SeaORM

pub use sea_orm_migration::prelude::*;

mod m20261012_000001_create_subscription_plans;
mod m20261012_000002_create_companies;
mod m20261012_000003_create_jobs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20261012_000001_create_subscription_plans::Migration),
      Box::new(m20261012_000002_create_companies::Migration),
      Box::new(m20261012_000003_create_jobs::Migration),
    ]
  }
}
