use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use serde::Deserialize;

use super::auth::Admin;
use crate::{
  entity::company,
  prelude::*,
  quota::QuotaView,
  state::AppState,
  sv::company::CompanyData,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanChange {
  #[serde(default)]
  pub plan_id: Option<String>,
}

pub async fn list(
  _: Admin,
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<company::Model>>> {
  Ok(Json(app.sv().company.all().await?))
}

pub async fn get(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<company::Model>> {
  let company =
    app.sv().company.by_id(&id).await?.ok_or(Error::CompanyNotFound)?;
  Ok(Json(company))
}

pub async fn create(
  _: Admin,
  State(app): State<Arc<AppState>>,
  Json(data): Json<CompanyData>,
) -> Result<(StatusCode, Json<company::Model>)> {
  let company = app.sv().company.create(data).await?;
  Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update(
  _: Admin,
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(data): Json<CompanyData>,
) -> Result<Json<company::Model>> {
  Ok(Json(app.sv().company.update(&id, data).await?))
}

pub async fn change_plan(
  _: Admin,
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(change): Json<PlanChange>,
) -> Result<Json<company::Model>> {
  Ok(Json(app.sv().company.change_plan(&id, change.plan_id).await?))
}

pub async fn apply_entitlements(
  _: Admin,
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<company::Model>> {
  Ok(Json(app.sv().company.apply_entitlements(&id).await?))
}

pub async fn quota(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<QuotaView>> {
  Ok(Json(app.sv().company.quota(&id).await?))
}
