use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
  entity::{JobStatus, Localized, job},
  prelude::*,
  state::Config,
  sv::company,
};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Job payload accepted by create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
  #[validate(length(min = 1, max = 64))]
  pub company_id: String,
  pub title: Localized,
  pub location: Localized,
  pub description: Localized,
  #[serde(default)]
  pub requirements: Localized,
  #[serde(rename = "type")]
  #[validate(length(max = 64))]
  pub job_type: Option<String>,
  #[validate(length(max = 128))]
  pub salary: Option<String>,
  #[serde(default)]
  pub is_internal: bool,
  pub status: Option<JobStatus>,
  #[validate(url)]
  pub image_url: Option<String>,
  #[validate(length(max = 128))]
  pub professional_area: Option<String>,
}

impl JobData {
  pub fn check(&self, locales: &[String]) -> Result<()> {
    self.validate()?;

    for (field, text) in [
      ("title", &self.title),
      ("location", &self.location),
      ("description", &self.description),
    ] {
      let missing = text.missing(locales);
      if !missing.is_empty() {
        return Err(Error::Validation(format!(
          "{field}: missing text for {}",
          missing.join(", ")
        )));
      }
    }

    Ok(())
  }
}

impl From<job::Model> for JobData {
  /// Copy of the content only, the copy starts active.
  fn from(job: job::Model) -> Self {
    Self {
      company_id: job.company_id,
      title: job.title,
      location: job.location,
      description: job.description,
      requirements: job.requirements,
      job_type: job.job_type,
      salary: job.salary,
      is_internal: job.is_internal,
      status: None,
      image_url: job.image_url,
      professional_area: job.professional_area,
    }
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
  pub company_id: Option<String>,
  pub status: Option<JobStatus>,
  pub is_internal: Option<bool>,
  pub page: Option<u64>,
  pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct JobPage {
  pub jobs: Vec<job::Model>,
  pub total: u64,
}

pub struct Job<'a> {
  db: &'a DatabaseConnection,
  config: &'a Config,
}

impl<'a> Job<'a> {
  pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
    Self { db, config }
  }

  /// Publishes a job if the company's quota admits it.
  ///
  /// Admission, counter decrement and insert share one transaction; any
  /// failure leaves both the counter and the jobs table untouched.
  pub async fn create(&self, data: JobData) -> Result<job::Model> {
    data.check(&self.config.locales)?;

    let txn = self.db.begin().await?;
    let job = self.publish(&txn, data).await?;
    txn.commit().await?;

    Ok(job)
  }

  /// New job with the content of `id`, paid from the company's quota.
  pub async fn duplicate(&self, id: &str) -> Result<job::Model> {
    let source = self.by_id(id).await?.ok_or(Error::JobNotFound)?;

    let txn = self.db.begin().await?;
    let job = self.publish(&txn, source.into()).await?;

    txn.commit().await?;
    Ok(job)
  }

  /// Like [`Job::duplicate`], and closes the source job.
  pub async fn repost(&self, id: &str) -> Result<job::Model> {
    let source = self.by_id(id).await?.ok_or(Error::JobNotFound)?;

    let txn = self.db.begin().await?;
    let job = self.publish(&txn, source.clone().into()).await?;

    if source.status != JobStatus::Closed {
      job::ActiveModel {
        status: Set(JobStatus::Closed),
        updated_at: Set(job.posted_date),
        ..source.into()
      }
      .update(&txn)
      .await?;
    }

    txn.commit().await?;
    Ok(job)
  }

  /// Takes the posting before anything else so the transaction starts with
  /// its write.
  async fn publish<C: ConnectionTrait>(
    &self,
    conn: &C,
    data: JobData,
  ) -> Result<job::Model> {
    let now = Utc::now().naive_utc();
    let expiry_date = self
      .config
      .job_lifetime()
      .and_then(|lifetime| now.checked_add_signed(lifetime))
      .ok_or(Error::LifetimeOutOfRange)?;

    let company = company::take_posting(conn, &data.company_id).await?;

    let job = job::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      company_id: Set(company.id.clone()),
      title: Set(data.title),
      location: Set(data.location),
      description: Set(data.description),
      requirements: Set(data.requirements),
      job_type: Set(data.job_type),
      salary: Set(data.salary),
      status: Set(data.status.unwrap_or_default()),
      is_internal: Set(data.is_internal),
      image_url: Set(data.image_url),
      professional_area: Set(data.professional_area),
      posted_date: Set(now),
      expiry_date: Set(expiry_date),
      updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    info!(
      "Job `{}` posted by `{}` (remaining: {:?})",
      job.id, company.id, company.job_postings_remaining
    );
    Ok(job)
  }

  pub async fn by_id(&self, id: &str) -> Result<Option<job::Model>> {
    Ok(job::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn list(&self, filter: JobFilter) -> Result<JobPage> {
    let mut query = job::Entity::find();

    if let Some(company_id) = filter.company_id {
      query = query.filter(job::Column::CompanyId.eq(company_id));
    }
    if let Some(status) = filter.status {
      query = query.filter(job::Column::Status.eq(status));
    }
    if let Some(is_internal) = filter.is_internal {
      query = query.filter(job::Column::IsInternal.eq(is_internal));
    }

    let page = filter.page.unwrap_or(1).max(1);
    let limit = filter.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    (page - 1)
      .checked_mul(limit)
      .filter(|offset| *offset <= i64::MAX as u64)
      .ok_or_else(|| Error::Validation(format!("page: {page} is out of range")))?;

    let paginator = query
      .order_by_desc(job::Column::PostedDate)
      .order_by_asc(job::Column::Id)
      .paginate(self.db, limit);

    let total = paginator.num_items().await?;
    let jobs = paginator.fetch_page(page - 1).await?;

    Ok(JobPage { jobs, total })
  }

  /// Edits content and status. The owning company is fixed at creation.
  pub async fn update(&self, id: &str, data: JobData) -> Result<job::Model> {
    data.check(&self.config.locales)?;

    let job = job::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::JobNotFound)?;

    if job.company_id != data.company_id {
      return Err(Error::Validation("companyId: cannot be changed".into()));
    }

    let status = data.status.unwrap_or(job.status);
    let job = job::ActiveModel {
      title: Set(data.title),
      location: Set(data.location),
      description: Set(data.description),
      requirements: Set(data.requirements),
      job_type: Set(data.job_type),
      salary: Set(data.salary),
      status: Set(status),
      is_internal: Set(data.is_internal),
      image_url: Set(data.image_url),
      professional_area: Set(data.professional_area),
      updated_at: Set(Utc::now().naive_utc()),
      ..job.into()
    }
    .update(self.db)
    .await?;

    Ok(job)
  }

  pub async fn set_status(
    &self,
    id: &str,
    status: JobStatus,
  ) -> Result<job::Model> {
    let job = job::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::JobNotFound)?;

    let job = job::ActiveModel {
      status: Set(status),
      updated_at: Set(Utc::now().naive_utc()),
      ..job.into()
    }
    .update(self.db)
    .await?;

    Ok(job)
  }

  pub async fn delete(&self, id: &str) -> Result<()> {
    let txn = self.db.begin().await?;

    let job = job::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::JobNotFound)?;

    job::Entity::delete_by_id(job.id.as_str()).exec(&txn).await?;

    if self.config.restore_quota_on_delete
      && company::return_posting(&txn, &job.company_id).await?
    {
      debug!("Posting returned to `{}` for job `{}`", job.company_id, job.id);
    }

    txn.commit().await?;

    info!("Job `{}` deleted", job.id);
    Ok(())
  }

  /// Closes every open job whose expiry date passed before `now`.
  pub async fn close_expired(&self, now: DateTime) -> Result<u64> {
    let res = job::Entity::update_many()
      .set(job::ActiveModel {
        status: Set(JobStatus::Closed),
        updated_at: Set(now),
        ..Default::default()
      })
      .filter(job::Column::ExpiryDate.lt(now))
      .filter(job::Column::Status.ne(JobStatus::Closed))
      .exec(self.db)
      .await?;

    Ok(res.rows_affected)
  }
}
