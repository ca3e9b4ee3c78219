//! Job entity - a single posting owned by a company

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Localized;

#[derive(
  Clone,
  Copy,
  Debug,
  Default,
  PartialEq,
  Eq,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
  #[default]
  #[sea_orm(string_value = "active")]
  Active,
  #[sea_orm(string_value = "paused")]
  Paused,
  #[sea_orm(string_value = "closed")]
  Closed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub company_id: String,
  pub title: Localized,
  pub location: Localized,
  pub description: Localized,
  pub requirements: Localized,
  #[serde(rename = "type")]
  pub job_type: Option<String>,
  pub salary: Option<String>,
  pub status: JobStatus,
  /// Posting for the platform's own careers page rather than a client.
  pub is_internal: bool,
  pub image_url: Option<String>,
  pub professional_area: Option<String>,
  pub posted_date: DateTime,
  pub expiry_date: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::company::Entity",
    from = "Column::CompanyId",
    to = "super::company::Column::Id"
  )]
  Company,
}

impl Related<super::company::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Company.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
