//! Company entity - employer accounts holding the posting quota

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Localized;
use crate::quota;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub name: Localized,
  pub description: Localized,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub website: Option<String>,
  /// Weak reference, the plan may no longer exist.
  pub plan_id: Option<String>,
  /// Authoritative counter, -1 means unlimited.
  pub job_postings_remaining: Option<i32>,
  pub subscription_end_date: Option<DateTime>,
  pub is_recruitment_client: bool,
  pub created_at: DateTime,
}

impl Model {
  pub fn may_post(&self) -> bool {
    quota::may_post(self.is_recruitment_client, self.job_postings_remaining)
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::job::Entity")]
  Jobs,
}

impl Related<super::job::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Jobs.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
