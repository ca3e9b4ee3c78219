use std::env;

use migration::Migrator;

use crate::{prelude::*, sv};

#[derive(Debug, Clone)]
pub struct Config {
  /// Bearer token for admin endpoints.
  pub admin_token: String,
  /// Locales every job and plan text must be written in.
  pub locales: Vec<String>,
  /// Time between posting and expiry of a job.
  pub job_lifetime: Duration,
  pub sweep_interval: Duration,
  /// Credit a posting back when a job is deleted.
  pub restore_quota_on_delete: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      admin_token: String::new(),
      locales: vec![String::from("es"), String::from("en")],
      job_lifetime: Duration::from_secs(60 * 24 * 3600),
      sweep_interval: Duration::from_secs(3600),
      restore_quota_on_delete: false,
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let mut config = Self {
      admin_token: env::var("ADMIN_TOKEN").context("ADMIN_TOKEN not set")?,
      ..Self::default()
    };

    if let Ok(locales) = env::var("SUPPORTED_LOCALES") {
      config.locales = parse_locales(&locales);
      anyhow::ensure!(
        !config.locales.is_empty(),
        "SUPPORTED_LOCALES must name at least one locale"
      );
    }

    if let Ok(lifetime) = env::var("JOB_LIFETIME") {
      config.job_lifetime = parse_lifetime(&lifetime)
        .with_context(|| format!("Invalid JOB_LIFETIME `{lifetime}`"))?;
    }

    if let Ok(interval) = env::var("SWEEP_INTERVAL") {
      config.sweep_interval = parse_interval(&interval)
        .with_context(|| format!("Invalid SWEEP_INTERVAL `{interval}`"))?;
    }

    if let Ok(restore) = env::var("RESTORE_QUOTA_ON_DELETE") {
      config.restore_quota_on_delete = restore
        .trim()
        .parse()
        .with_context(|| format!("Invalid RESTORE_QUOTA_ON_DELETE `{restore}`"))?;
    }

    Ok(config)
  }

  /// `None` when the lifetime does not fit a `TimeDelta`.
  pub fn job_lifetime(&self) -> Option<TimeDelta> {
    TimeDelta::from_std(self.job_lifetime).ok()
  }
}

/// Jobs posted now must still get a representable expiry date.
fn parse_lifetime(raw: &str) -> anyhow::Result<Duration> {
  let lifetime = humantime::parse_duration(raw)?;

  anyhow::ensure!(!lifetime.is_zero(), "job lifetime must be positive");
  let fits = TimeDelta::from_std(lifetime)
    .ok()
    .and_then(|delta| Utc::now().naive_utc().checked_add_signed(delta))
    .is_some();
  anyhow::ensure!(fits, "job lifetime is too large");

  Ok(lifetime)
}

fn parse_interval(raw: &str) -> anyhow::Result<Duration> {
  let interval = humantime::parse_duration(raw)?;
  anyhow::ensure!(!interval.is_zero(), "sweep interval must be positive");
  Ok(interval)
}

fn parse_locales(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(|s| s.trim().to_lowercase())
    .filter(|s| !s.is_empty())
    .collect()
}

pub struct Services<'a> {
  pub plan: sv::Plan<'a>,
  pub company: sv::Company<'a>,
  pub job: sv::Job<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(db_url: &str, config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(db_url)
      .await
      .context("Failed to connect to database")?;

    Self::with_db(db, config).await
  }

  pub async fn with_db(
    db: DatabaseConnection,
    config: Config,
  ) -> anyhow::Result<Self> {
    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self { db, config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      plan: sv::Plan::new(&self.db, &self.config),
      company: sv::Company::new(&self.db),
      job: sv::Job::new(&self.db, &self.config),
    }
  }
}
