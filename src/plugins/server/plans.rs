use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
};
use serde::Deserialize;

use super::auth::{self, Admin};
use crate::{entity::plan, prelude::*, state::AppState, sv::plan::PlanData};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
  /// Include inactive plans, admin only.
  #[serde(default)]
  pub all: bool,
}

pub async fn list(
  State(app): State<Arc<AppState>>,
  headers: HeaderMap,
  Query(query): Query<ListQuery>,
) -> Result<Json<Vec<plan::Model>>> {
  if query.all {
    auth::verify(&app, &headers)?;
  }

  Ok(Json(app.sv().plan.list(query.all).await?))
}

pub async fn get(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<plan::Model>> {
  let plan = app.sv().plan.by_id(&id).await?.ok_or(Error::PlanNotFound)?;
  Ok(Json(plan))
}

pub async fn create(
  _: Admin,
  State(app): State<Arc<AppState>>,
  Json(data): Json<PlanData>,
) -> Result<(StatusCode, Json<plan::Model>)> {
  let plan = app.sv().plan.create(data).await?;
  Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn update(
  _: Admin,
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(data): Json<PlanData>,
) -> Result<Json<plan::Model>> {
  Ok(Json(app.sv().plan.update(&id, data).await?))
}

pub async fn delete(
  _: Admin,
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode> {
  app.sv().plan.delete(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
