use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};

use crate::{prelude::*, state::AppState};

/// Extractor for admin-only endpoints, checks `Authorization: Bearer`.
pub struct Admin;

pub fn verify(app: &AppState, headers: &HeaderMap) -> Result<()> {
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "));

  match token {
    Some(token)
      if !app.config.admin_token.is_empty()
        && token == app.config.admin_token =>
    {
      Ok(())
    }
    _ => Err(Error::Unauthorized),
  }
}

impl FromRequestParts<Arc<AppState>> for Admin {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self> {
    verify(app, &parts.headers).inspect_err(|_| {
      warn!("Rejected admin request to {}", parts.uri.path());
    })?;
    Ok(Admin)
  }
}
