use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
  entity::{DurationUnit, Localized, PlanType, Tags, plan},
  prelude::*,
  state::Config,
};

fn default_currency() -> String {
  String::from("EUR")
}

fn default_true() -> bool {
  true
}

/// Admin payload for creating or replacing a plan.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlanData {
  #[validate(length(min = 1, max = 64))]
  pub id: Option<String>,
  pub name: Localized,
  #[serde(default)]
  pub description: Localized,
  #[validate(range(min = 0.0))]
  pub price: f64,
  #[serde(default = "default_currency")]
  #[validate(length(equal = 3))]
  pub currency: String,
  #[serde(rename = "type")]
  pub plan_type: PlanType,
  pub duration_unit: Option<DurationUnit>,
  #[validate(range(min = 1))]
  pub duration_value: Option<i32>,
  #[validate(range(min = -1))]
  pub job_postings_limit: i32,
  #[serde(default)]
  pub features: Tags,
  #[serde(default)]
  pub is_featured: bool,
  #[serde(default = "default_true")]
  pub is_active: bool,
}

impl PlanData {
  pub fn check(&self, locales: &[String]) -> Result<()> {
    self.validate()?;

    let missing = self.name.missing(locales);
    if !missing.is_empty() {
      return Err(Error::Validation(format!(
        "name: missing text for {}",
        missing.join(", ")
      )));
    }

    match (self.plan_type, self.duration_unit, self.duration_value) {
      (PlanType::Subscription, Some(_), Some(_)) => Ok(()),
      (PlanType::Subscription, _, _) => Err(Error::Validation(
        "subscription plans need durationUnit and durationValue".into(),
      )),
      (PlanType::Package, None, None) => Ok(()),
      (PlanType::Package, _, _) => Err(Error::Validation(
        "package plans have no duration".into(),
      )),
    }
  }
}

pub struct Plan<'a> {
  db: &'a DatabaseConnection,
  config: &'a Config,
}

impl<'a> Plan<'a> {
  pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
    Self { db, config }
  }

  pub async fn create(&self, data: PlanData) -> Result<plan::Model> {
    data.check(&self.config.locales)?;

    let now = Utc::now().naive_utc();
    let id = data.id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let plan = plan::ActiveModel {
      id: Set(id),
      name: Set(data.name),
      description: Set(data.description),
      price: Set(data.price),
      currency: Set(data.currency.to_uppercase()),
      plan_type: Set(data.plan_type),
      duration_unit: Set(data.duration_unit),
      duration_value: Set(data.duration_value),
      job_postings_limit: Set(data.job_postings_limit),
      features: Set(data.features),
      is_featured: Set(data.is_featured),
      is_active: Set(data.is_active),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    info!("Plan `{}` created ({:?})", plan.id, plan.plan_type);
    Ok(plan)
  }

  pub async fn by_id(&self, id: &str) -> Result<Option<plan::Model>> {
    Ok(plan::Entity::find_by_id(id).one(self.db).await?)
  }

  /// Active plans only unless `all` is set.
  pub async fn list(&self, all: bool) -> Result<Vec<plan::Model>> {
    let mut query = plan::Entity::find();

    if !all {
      query = query.filter(plan::Column::IsActive.eq(true));
    }

    let plans = query
      .order_by_desc(plan::Column::IsFeatured)
      .order_by_asc(plan::Column::Price)
      .all(self.db)
      .await?;
    Ok(plans)
  }

  /// Replaces every editable field. Companies already on the plan keep
  /// their counters until entitlements are applied again.
  pub async fn update(&self, id: &str, data: PlanData) -> Result<plan::Model> {
    data.check(&self.config.locales)?;

    let plan = plan::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::PlanNotFound)?;

    let plan = plan::ActiveModel {
      name: Set(data.name),
      description: Set(data.description),
      price: Set(data.price),
      currency: Set(data.currency.to_uppercase()),
      plan_type: Set(data.plan_type),
      duration_unit: Set(data.duration_unit),
      duration_value: Set(data.duration_value),
      job_postings_limit: Set(data.job_postings_limit),
      features: Set(data.features),
      is_featured: Set(data.is_featured),
      is_active: Set(data.is_active),
      ..plan.into()
    }
    .update(self.db)
    .await?;

    Ok(plan)
  }

  pub async fn delete(&self, id: &str) -> Result<()> {
    let res = plan::Entity::delete_by_id(id).exec(self.db).await?;
    if res.rows_affected == 0 {
      return Err(Error::PlanNotFound);
    }

    info!("Plan `{id}` deleted");
    Ok(())
  }
}
