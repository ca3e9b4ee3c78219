use sea_orm::sea_query::Expr;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
  entity::{Localized, company, plan},
  prelude::*,
  quota::{self, QuotaView},
};

/// Admin payload for company accounts.
///
/// `id` and `jobPostingsRemaining` are only read on creation; updates keep
/// the stored values so the counter is never reset by a profile edit.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyData {
  #[validate(length(min = 1, max = 64))]
  pub id: Option<String>,
  pub name: Localized,
  #[serde(default)]
  pub description: Localized,
  #[validate(email)]
  pub email: Option<String>,
  #[validate(length(max = 32))]
  pub phone: Option<String>,
  #[validate(url)]
  pub website: Option<String>,
  #[serde(default)]
  pub is_recruitment_client: bool,
  #[validate(range(min = -1))]
  pub job_postings_remaining: Option<i32>,
}

impl CompanyData {
  fn check(&self) -> Result<()> {
    self.validate()?;

    if self.name.0.values().all(|name| name.trim().is_empty()) {
      return Err(Error::Validation("name: must not be empty".into()));
    }
    Ok(())
  }
}

/// Grants one posting to `company_id` inside the caller's transaction.
///
/// The decrement is a single conditional update, so concurrent grants
/// against the same row can never take the counter below zero. When it
/// matches nothing the grant can only come from the recruitment bypass or
/// the unlimited sentinel.
pub async fn take_posting<C: ConnectionTrait>(
  conn: &C,
  company_id: &str,
) -> Result<company::Model> {
  let consumed = company::Entity::update_many()
    .col_expr(
      company::Column::JobPostingsRemaining,
      Expr::col(company::Column::JobPostingsRemaining).sub(1),
    )
    .filter(company::Column::Id.eq(company_id))
    .filter(company::Column::IsRecruitmentClient.eq(false))
    .filter(company::Column::JobPostingsRemaining.gt(0))
    .exec(conn)
    .await?
    .rows_affected;

  let company = company::Entity::find_by_id(company_id)
    .one(conn)
    .await?
    .ok_or(Error::CompanyNotFound)?;

  if consumed == 0 && !company.may_post() {
    return Err(Error::QuotaExceeded);
  }

  Ok(company)
}

/// Credits one posting back to a finite counter. Returns whether anything
/// changed.
pub async fn return_posting<C: ConnectionTrait>(
  conn: &C,
  company_id: &str,
) -> Result<bool> {
  let res = company::Entity::update_many()
    .col_expr(
      company::Column::JobPostingsRemaining,
      Expr::col(company::Column::JobPostingsRemaining).add(1),
    )
    .filter(company::Column::Id.eq(company_id))
    .filter(company::Column::IsRecruitmentClient.eq(false))
    .filter(company::Column::JobPostingsRemaining.gte(0))
    .exec(conn)
    .await?;

  Ok(res.rows_affected > 0)
}

pub struct Company<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Company<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(&self, data: CompanyData) -> Result<company::Model> {
    data.check()?;

    let now = Utc::now().naive_utc();
    let id = data.id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let company = company::ActiveModel {
      id: Set(id),
      name: Set(data.name),
      description: Set(data.description),
      email: Set(data.email),
      phone: Set(data.phone),
      website: Set(data.website),
      plan_id: Set(None),
      job_postings_remaining: Set(data.job_postings_remaining),
      subscription_end_date: Set(None),
      is_recruitment_client: Set(data.is_recruitment_client),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    info!("Company `{}` created", company.id);
    Ok(company)
  }

  pub async fn by_id(&self, id: &str) -> Result<Option<company::Model>> {
    Ok(company::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn all(&self) -> Result<Vec<company::Model>> {
    let companies = company::Entity::find()
      .order_by_asc(company::Column::CreatedAt)
      .all(self.db)
      .await?;
    Ok(companies)
  }

  pub async fn update(
    &self,
    id: &str,
    data: CompanyData,
  ) -> Result<company::Model> {
    data.check()?;

    let company = company::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::CompanyNotFound)?;

    let company = company::ActiveModel {
      name: Set(data.name),
      description: Set(data.description),
      email: Set(data.email),
      phone: Set(data.phone),
      website: Set(data.website),
      is_recruitment_client: Set(data.is_recruitment_client),
      ..company.into()
    }
    .update(self.db)
    .await?;

    Ok(company)
  }

  /// Points the company at another plan, or at none.
  ///
  /// Only `plan_id` changes. The counter and end date stay as they were
  /// until [`Company::apply_entitlements`] is called.
  pub async fn change_plan(
    &self,
    id: &str,
    plan_id: Option<String>,
  ) -> Result<company::Model> {
    let company = company::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::CompanyNotFound)?;

    if let Some(plan_id) = &plan_id {
      plan::Entity::find_by_id(plan_id)
        .one(self.db)
        .await?
        .ok_or(Error::PlanNotFound)?;
    }

    let previous = company.plan_id.clone();
    let company = company::ActiveModel { plan_id: Set(plan_id), ..company.into() }
      .update(self.db)
      .await?;

    info!(
      "Company `{}` plan changed: {:?} -> {:?}",
      company.id, previous, company.plan_id
    );
    Ok(company)
  }

  /// Resets the counter to the assigned plan's limit and starts a new
  /// subscription period.
  pub async fn apply_entitlements(&self, id: &str) -> Result<company::Model> {
    let txn = self.db.begin().await?;

    let company = company::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::CompanyNotFound)?;

    let plan_id = company.plan_id.clone().ok_or(Error::PlanNotAssigned)?;
    let plan = plan::Entity::find_by_id(&plan_id)
      .one(&txn)
      .await?
      .ok_or(Error::PlanNotFound)?;

    let now = Utc::now().naive_utc();
    let company = company::ActiveModel {
      job_postings_remaining: Set(Some(plan.job_postings_limit)),
      subscription_end_date: Set(plan.period_end(now)),
      ..company.into()
    }
    .update(&txn)
    .await?;

    txn.commit().await?;

    info!(
      "Company `{}` entitled by plan `{}`: {} postings until {:?}",
      company.id,
      plan.id,
      plan.job_postings_limit,
      company.subscription_end_date
    );
    Ok(company)
  }

  pub async fn quota(&self, id: &str) -> Result<QuotaView> {
    let company = self.by_id(id).await?.ok_or(Error::CompanyNotFound)?;
    Ok(QuotaView::from(&company))
  }

  /// Zeroes the counter of every non-recruitment company whose
  /// subscription ended before `now`.
  pub async fn lapse_expired(&self, now: DateTime) -> Result<u64> {
    let res = company::Entity::update_many()
      .col_expr(company::Column::JobPostingsRemaining, Expr::value(0))
      .filter(company::Column::SubscriptionEndDate.lt(now))
      .filter(company::Column::IsRecruitmentClient.eq(false))
      .filter(company::Column::JobPostingsRemaining.ne(0))
      .exec(self.db)
      .await?;

    Ok(res.rows_affected)
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use crate::{
    state::tests::{config, memory_db},
    sv::plan::{Plan, tests::subscription},
  };

  pub fn company(id: &str, remaining: Option<i32>) -> CompanyData {
    CompanyData {
      id: Some(id.into()),
      name: [("es", "Acme")].into_iter().collect(),
      description: Localized::default(),
      email: Some("hr@acme.example".into()),
      phone: None,
      website: None,
      is_recruitment_client: false,
      job_postings_remaining: remaining,
    }
  }

  #[tokio::test]
  async fn test_take_posting_decrements() {
    let db = memory_db().await;
    Company::new(&db).create(company("c1", Some(2))).await.unwrap();

    let company = take_posting(&db, "c1").await.unwrap();

    assert_eq!(company.job_postings_remaining, Some(1));
  }

  #[tokio::test]
  async fn test_take_posting_rejects_exhausted() {
    let db = memory_db().await;
    let sv = Company::new(&db);
    sv.create(company("zero", Some(0))).await.unwrap();
    sv.create(company("none", None)).await.unwrap();

    assert!(matches!(take_posting(&db, "zero").await, Err(Error::QuotaExceeded)));
    assert!(matches!(take_posting(&db, "none").await, Err(Error::QuotaExceeded)));
    assert!(matches!(
      take_posting(&db, "ghost").await,
      Err(Error::CompanyNotFound)
    ));
  }

  #[tokio::test]
  async fn test_take_posting_keeps_unlimited_and_bypass() {
    let db = memory_db().await;
    let sv = Company::new(&db);
    sv.create(company("unlimited", Some(quota::UNLIMITED))).await.unwrap();
    let mut client = company("client", Some(3));
    client.is_recruitment_client = true;
    sv.create(client).await.unwrap();

    for _ in 0..3 {
      take_posting(&db, "unlimited").await.unwrap();
      take_posting(&db, "client").await.unwrap();
    }

    let unlimited = sv.by_id("unlimited").await.unwrap().unwrap();
    let client = sv.by_id("client").await.unwrap().unwrap();
    assert_eq!(unlimited.job_postings_remaining, Some(quota::UNLIMITED));
    assert_eq!(client.job_postings_remaining, Some(3));
  }

  #[tokio::test]
  async fn test_return_posting_skips_unlimited() {
    let db = memory_db().await;
    let sv = Company::new(&db);
    sv.create(company("finite", Some(0))).await.unwrap();
    sv.create(company("unlimited", Some(quota::UNLIMITED))).await.unwrap();

    assert!(return_posting(&db, "finite").await.unwrap());
    assert!(!return_posting(&db, "unlimited").await.unwrap());

    let finite = sv.by_id("finite").await.unwrap().unwrap();
    assert_eq!(finite.job_postings_remaining, Some(1));
  }

  #[tokio::test]
  async fn test_change_plan_keeps_counter() {
    let db = memory_db().await;
    let config = config();
    Plan::new(&db, &config)
      .create(subscription("plan_pro_monthly", 25))
      .await
      .unwrap();
    let sv = Company::new(&db);
    sv.create(company("c1", Some(4))).await.unwrap();

    let company = sv
      .change_plan("c1", Some("plan_pro_monthly".into()))
      .await
      .unwrap();

    assert_eq!(company.plan_id.as_deref(), Some("plan_pro_monthly"));
    assert_eq!(company.job_postings_remaining, Some(4));
    assert_eq!(company.subscription_end_date, None);
  }

  #[tokio::test]
  async fn test_change_plan_unknown() {
    let db = memory_db().await;
    let sv = Company::new(&db);
    sv.create(company("c1", Some(4))).await.unwrap();

    assert!(matches!(
      sv.change_plan("c1", Some("missing".into())).await,
      Err(Error::PlanNotFound)
    ));
    assert!(matches!(
      sv.change_plan("ghost", None).await,
      Err(Error::CompanyNotFound)
    ));

    let cleared = sv.change_plan("c1", None).await.unwrap();
    assert_eq!(cleared.plan_id, None);
  }

  #[tokio::test]
  async fn test_apply_entitlements() {
    let db = memory_db().await;
    let config = config();
    Plan::new(&db, &config)
      .create(subscription("plan_pro_monthly", 25))
      .await
      .unwrap();
    let sv = Company::new(&db);
    sv.create(company("c1", Some(0))).await.unwrap();

    assert!(matches!(
      sv.apply_entitlements("c1").await,
      Err(Error::PlanNotAssigned)
    ));

    sv.change_plan("c1", Some("plan_pro_monthly".into())).await.unwrap();
    let before = Utc::now().naive_utc();
    let company = sv.apply_entitlements("c1").await.unwrap();

    assert_eq!(company.job_postings_remaining, Some(25));
    let end = company.subscription_end_date.unwrap();
    assert!(end >= before + TimeDelta::days(28));
    assert!(end <= before + TimeDelta::days(32));
  }

  #[tokio::test]
  async fn test_lapse_expired() {
    let db = memory_db().await;
    let sv = Company::new(&db);
    for id in ["lapsed", "current", "client"] {
      let mut data = company(id, Some(5));
      data.is_recruitment_client = id == "client";
      sv.create(data).await.unwrap();
    }

    let now = Utc::now().naive_utc();
    for (id, end) in [
      ("lapsed", now - TimeDelta::days(1)),
      ("current", now + TimeDelta::days(1)),
      ("client", now - TimeDelta::days(1)),
    ] {
      company::ActiveModel {
        id: sea_orm::Unchanged(id.to_string()),
        subscription_end_date: Set(Some(end)),
        ..Default::default()
      }
      .update(&db)
      .await
      .unwrap();
    }

    assert_eq!(sv.lapse_expired(now).await.unwrap(), 1);

    let quota = sv.quota("lapsed").await.unwrap();
    assert_eq!(quota.job_postings_remaining, Some(0));
    assert!(!quota.can_post_job);
    assert!(sv.quota("current").await.unwrap().can_post_job);
    assert!(sv.quota("client").await.unwrap().can_post_job);
  }
}
