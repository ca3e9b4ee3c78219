//! Job board server - publishing jobs against subscription quotas
//!
//! Architecture:
//! - SeaORM for database access (SQLite)
//! - Axum for the HTTP API with rate limiting
//! - Plugins supervised on Tokio: HTTP server, maintenance sweep

// sea-orm's JSON column derives expand to `serde_json::` paths
extern crate json as serde_json;

mod entity;
mod error;
mod plugins;
mod prelude;
mod quota;
mod state;
mod sv;

use std::env;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{prelude::*, state::{AppState, Config}};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "jobboard=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_url = env::var("DATABASE_URL")
    .unwrap_or_else(|_| "sqlite:jobboard.db?mode=rwc".into());
  let config = Config::from_env()?;

  info!("Starting job board v{}", env!("CARGO_PKG_VERSION"));
  info!(
    "Locales: {}, job lifetime: {}",
    config.locales.join(", "),
    humantime::format_duration(config.job_lifetime)
  );

  let app = Arc::new(AppState::new(&db_url, config).await?);

  let mut services = plugins::App::new()
    .register(plugins::server::Plugin)
    .register(plugins::cron::Plugin)
    .run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
  info!("Shutting down...");

  services.shutdown().await;
  Ok(())
}
