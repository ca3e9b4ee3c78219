mod auth;
mod companies;
mod jobs;
mod plans;

use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
  Router,
  routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "http"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();

    let router = router(app)
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let port: u16 =
      std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    let limiter = async {
      loop {
        tokio::time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => {
        match &result {
            Ok(_) => info!("Server stopped gracefully"),
            Err(err) => error!("Server stopped with error: {err}"),
        }
        result
      }
      _ = limiter => {
        error!("Rate limiter cleaner stopped unexpectedly!");
        Ok(())
      }
    }
  }
}

pub fn router(app: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/plans", get(plans::list).post(plans::create))
    .route(
      "/api/plans/{id}",
      get(plans::get).put(plans::update).delete(plans::delete),
    )
    .route("/api/companies", get(companies::list).post(companies::create))
    .route("/api/companies/{id}", get(companies::get).put(companies::update))
    .route("/api/companies/{id}/plan", put(companies::change_plan))
    .route(
      "/api/companies/{id}/entitlements",
      post(companies::apply_entitlements),
    )
    .route("/api/companies/{id}/quota", get(companies::quota))
    .route("/api/jobs", get(jobs::list).post(jobs::create))
    .route(
      "/api/jobs/{id}",
      get(jobs::get).put(jobs::update).delete(jobs::delete),
    )
    .route("/api/jobs/{id}/status", put(jobs::set_status))
    .route("/api/jobs/{id}/duplicate", post(jobs::duplicate))
    .route("/api/jobs/{id}/repost", post(jobs::repost))
    .layer(
      ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
          .allow_origin(Any)
          .allow_methods(Any)
          .allow_headers(Any),
      ),
    )
    .with_state(app)
}

pub async fn health() -> &'static str {
  "OK"
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
  };
  use json::{Value, json};
  use tower::ServiceExt;

  use super::*;
  use crate::state::tests::{ADMIN_TOKEN, memory};

  struct Client {
    router: Router,
  }

  impl Client {
    async fn new() -> Self {
      Self { router: router(Arc::new(memory().await)) }
    }

    async fn send(
      &self,
      method: &str,
      uri: &str,
      body: Option<Value>,
      admin: bool,
    ) -> (StatusCode, Value) {
      let mut req = Request::builder().method(method).uri(uri);
      if admin {
        req = req.header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"));
      }
      let req = match body {
        Some(body) => req
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
      }
      .unwrap();

      let res = self.router.clone().oneshot(req).await.unwrap();
      let status = res.status();
      let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
      let value =
        if bytes.is_empty() { Value::Null } else { json::from_slice(&bytes).unwrap() };
      (status, value)
    }

    async fn company(&self, id: &str, extra: Value) -> Value {
      let mut body = json!({ "id": id, "name": { "es": "Acme" } });
      if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        body.extend(extra.clone());
      }
      let (status, company) =
        self.send("POST", "/api/companies", Some(body), true).await;
      assert_eq!(status, StatusCode::CREATED);
      company
    }
  }

  fn job(company_id: &str) -> Value {
    json!({
      "companyId": company_id,
      "title": { "es": "Analista", "en": "Analyst" },
      "location": { "es": "Barcelona", "en": "Barcelona" },
      "description": { "es": "Datos", "en": "Data" },
      "type": "full_time",
      "isInternal": false,
    })
  }

  #[tokio::test]
  async fn test_health() {
    let client = Client::new().await;
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let res = client.router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn test_last_posting_scenario() {
    let client = Client::new().await;
    client.company("c1", json!({ "jobPostingsRemaining": 1 })).await;

    let (status, created) =
      client.send("POST", "/api/jobs", Some(job("c1")), false).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["companyId"], "c1");

    let (_, quota) = client.send("GET", "/api/companies/c1/quota", None, false).await;
    assert_eq!(quota["jobPostingsRemaining"], 0);
    assert_eq!(quota["canPostJob"], false);

    for _ in 0..3 {
      let (status, body) =
        client.send("POST", "/api/jobs", Some(job("c1")), false).await;
      assert_eq!(status, StatusCode::FORBIDDEN);
      assert_eq!(body["message"], "No job postings remaining.");
    }

    let (_, page) = client.send("GET", "/api/jobs?companyId=c1", None, false).await;
    assert_eq!(page["total"], 1);
    let (_, company) = client.send("GET", "/api/companies/c1", None, false).await;
    assert_eq!(company["jobPostingsRemaining"], 0);
  }

  #[tokio::test]
  async fn test_missing_company_is_not_found() {
    let client = Client::new().await;

    let (status, _) =
      client.send("POST", "/api/jobs", Some(job("ghost")), false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_invalid_job_is_bad_request() {
    let client = Client::new().await;
    client.company("c1", json!({ "jobPostingsRemaining": 5 })).await;

    let mut body = job("c1");
    body["title"] = json!({ "es": "Analista" });
    let (status, body) = client.send("POST", "/api/jobs", Some(body), false).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let (_, quota) = client.send("GET", "/api/companies/c1/quota", None, false).await;
    assert_eq!(quota["jobPostingsRemaining"], 5);
  }

  #[tokio::test]
  async fn test_oversized_page_is_bad_request() {
    let client = Client::new().await;

    let uri = format!("/api/jobs?page={}&limit=100", u64::MAX);
    let (status, body) = client.send("GET", &uri, None, false).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
  }

  #[tokio::test]
  async fn test_change_plan_keeps_counter() {
    let client = Client::new().await;
    let plan = json!({
      "id": "plan_pro_monthly",
      "name": { "es": "Pro", "en": "Pro" },
      "price": 99.0,
      "type": "subscription",
      "durationUnit": "month",
      "durationValue": 1,
      "jobPostingsLimit": 20,
    });
    let (status, _) = client.send("POST", "/api/plans", Some(plan), true).await;
    assert_eq!(status, StatusCode::CREATED);
    client.company("c1", json!({ "jobPostingsRemaining": 2 })).await;

    let change = json!({ "planId": "plan_pro_monthly" });
    let (status, company) = client
      .send("PUT", "/api/companies/c1/plan", Some(change), true)
      .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(company["planId"], "plan_pro_monthly");
    assert_eq!(company["jobPostingsRemaining"], 2);

    let (status, company) = client
      .send("POST", "/api/companies/c1/entitlements", None, true)
      .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(company["jobPostingsRemaining"], 20);
    assert!(company["subscriptionEndDate"].is_string());
  }

  #[tokio::test]
  async fn test_admin_routes_require_token() {
    let client = Client::new().await;
    client.company("c1", json!({})).await;

    let change = json!({ "planId": null });
    let (status, _) = client
      .send("PUT", "/api/companies/c1/plan", Some(change), false)
      .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = client.send("GET", "/api/plans?all=true", None, false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, plans) = client.send("GET", "/api/plans", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plans, json!([]));
  }

  #[tokio::test]
  async fn test_recruitment_client_and_unlimited() {
    let client = Client::new().await;
    client
      .company("agency", json!({ "isRecruitmentClient": true, "jobPostingsRemaining": 0 }))
      .await;
    client.company("big", json!({ "jobPostingsRemaining": -1 })).await;

    for id in ["agency", "big"] {
      for _ in 0..3 {
        let (status, _) = client.send("POST", "/api/jobs", Some(job(id)), false).await;
        assert_eq!(status, StatusCode::CREATED);
      }
    }

    let (_, quota) = client.send("GET", "/api/companies/big/quota", None, false).await;
    assert_eq!(quota["jobPostingsRemaining"], -1);
    assert_eq!(quota["unlimited"], true);
    let (_, quota) = client.send("GET", "/api/companies/agency/quota", None, false).await;
    assert_eq!(quota["jobPostingsRemaining"], 0);
    assert_eq!(quota["canPostJob"], true);
  }

  #[tokio::test]
  async fn test_job_lifecycle() {
    let client = Client::new().await;
    client.company("c1", json!({ "jobPostingsRemaining": 2 })).await;

    let (_, created) = client.send("POST", "/api/jobs", Some(job("c1")), false).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, paused) = client
      .send("PUT", &format!("/api/jobs/{id}/status"), Some(json!({ "status": "paused" })), false)
      .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paused["status"], "paused");

    let (status, reposted) =
      client.send("POST", &format!("/api/jobs/{id}/repost"), None, false).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reposted["status"], "active");

    let (_, source) = client.send("GET", &format!("/api/jobs/{id}"), None, false).await;
    assert_eq!(source["status"], "closed");

    let (status, _) =
      client.send("POST", &format!("/api/jobs/{id}/duplicate"), None, false).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = client.send("DELETE", &format!("/api/jobs/{id}"), None, false).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = client.send("GET", &format!("/api/jobs/{id}"), None, false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = client
      .send("GET", "/api/jobs?companyId=c1&status=active&page=1&limit=5", None, false)
      .await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["jobs"].as_array().unwrap().len(), 1);
  }
}
