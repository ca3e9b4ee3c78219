//! Subscription plan entity - what a company buys to publish jobs

use chrono::{Months, TimeDelta};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Localized, Tags};

#[derive(
  Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
  /// Recurring, bounded by a duration.
  #[sea_orm(string_value = "subscription")]
  Subscription,
  /// One-off bundle of postings without an end date.
  #[sea_orm(string_value = "package")]
  Package,
}

#[derive(
  Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
  #[sea_orm(string_value = "week")]
  Week,
  #[sea_orm(string_value = "month")]
  Month,
  #[sea_orm(string_value = "year")]
  Year,
}

impl DurationUnit {
  pub fn advance(self, from: DateTime, value: u32) -> Option<DateTime> {
    match self {
      Self::Week => from.checked_add_signed(TimeDelta::weeks(value as i64)),
      Self::Month => from.checked_add_months(Months::new(value)),
      Self::Year => from.checked_add_months(Months::new(value.checked_mul(12)?)),
    }
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription_plans")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub name: Localized,
  pub description: Localized,
  pub price: f64,
  pub currency: String,
  #[serde(rename = "type")]
  pub plan_type: PlanType,
  pub duration_unit: Option<DurationUnit>,
  pub duration_value: Option<i32>,
  /// -1 unlimited, 0 none, N finite
  pub job_postings_limit: i32,
  pub features: Tags,
  pub is_featured: bool,
  pub is_active: bool,
  pub created_at: DateTime,
}

impl Model {
  /// End of a subscription period started at `from`; packages never end.
  pub fn period_end(&self, from: DateTime) -> Option<DateTime> {
    match (self.plan_type, self.duration_unit, self.duration_value) {
      (PlanType::Subscription, Some(unit), Some(value)) if value > 0 => {
        unit.advance(from, value as u32)
      }
      _ => None,
    }
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
