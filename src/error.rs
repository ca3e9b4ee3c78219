use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("Company not found")]
  CompanyNotFound,

  #[error("Job not found")]
  JobNotFound,

  #[error("Plan not found")]
  PlanNotFound,

  #[error("No job postings remaining.")]
  QuotaExceeded,

  #[error("Company has no plan assigned")]
  PlanNotAssigned,

  #[error("{0}")]
  Validation(String),

  #[error("Unauthorized")]
  Unauthorized,

  #[error("Job lifetime does not fit the calendar")]
  LifetimeOutOfRange,
}

impl From<validator::ValidationErrors> for Error {
  fn from(err: validator::ValidationErrors) -> Self {
    Self::Validation(err.to_string())
  }
}

impl Error {
  pub fn status(&self) -> StatusCode {
    match self {
      Error::CompanyNotFound | Error::JobNotFound | Error::PlanNotFound => {
        StatusCode::NOT_FOUND
      }
      Error::QuotaExceeded => StatusCode::FORBIDDEN,
      Error::PlanNotAssigned => StatusCode::CONFLICT,
      Error::Validation(_) => StatusCode::BAD_REQUEST,
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::Database(_) | Error::LifetimeOutOfRange => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();

    let body = if status.is_server_error() {
      tracing::error!(error = %self, "Request failed");
      json::json!({
        "success": false,
        "message": "Internal server error",
        "error": self.to_string(),
      })
    } else {
      json::json!({
        "success": false,
        "message": self.to_string(),
      })
    };

    (status, Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
