use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::Deserialize;

use crate::{
  entity::{JobStatus, job},
  prelude::*,
  state::AppState,
  sv::job::{JobData, JobFilter, JobPage},
};

#[derive(Debug, Deserialize)]
pub struct StatusChange {
  pub status: JobStatus,
}

pub async fn list(
  State(app): State<Arc<AppState>>,
  Query(filter): Query<JobFilter>,
) -> Result<Json<JobPage>> {
  Ok(Json(app.sv().job.list(filter).await?))
}

pub async fn get(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<job::Model>> {
  let job = app.sv().job.by_id(&id).await?.ok_or(Error::JobNotFound)?;
  Ok(Json(job))
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  Json(data): Json<JobData>,
) -> Result<(StatusCode, Json<job::Model>)> {
  let job = app.sv().job.create(data).await?;
  Ok((StatusCode::CREATED, Json(job)))
}

pub async fn update(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(data): Json<JobData>,
) -> Result<Json<job::Model>> {
  Ok(Json(app.sv().job.update(&id, data).await?))
}

pub async fn set_status(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(change): Json<StatusChange>,
) -> Result<Json<job::Model>> {
  Ok(Json(app.sv().job.set_status(&id, change.status).await?))
}

pub async fn delete(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode> {
  app.sv().job.delete(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn duplicate(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<(StatusCode, Json<job::Model>)> {
  let job = app.sv().job.duplicate(&id).await?;
  Ok((StatusCode::CREATED, Json(job)))
}

pub async fn repost(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<(StatusCode, Json<job::Model>)> {
  let job = app.sv().job.repost(&id).await?;
  Ok((StatusCode::CREATED, Json(job)))
}
