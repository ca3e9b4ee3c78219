//! Periodic maintenance: expires jobs and lapsed subscriptions.

use async_trait::async_trait;

use crate::{prelude::*, state::AppState};

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "cron"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(app.config.sweep_interval);
    loop {
      interval.tick().await;
      sweep(&app, Utc::now().naive_utc()).await.context("Sweep failed")?;
    }
  }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Sweep {
  pub closed_jobs: u64,
  pub lapsed_companies: u64,
}

pub async fn sweep(app: &AppState, now: DateTime) -> Result<Sweep> {
  let sv = app.sv();

  let sweep = Sweep {
    closed_jobs: sv.job.close_expired(now).await?,
    lapsed_companies: sv.company.lapse_expired(now).await?,
  };

  if sweep != Sweep::default() {
    info!(
      "Sweep closed {} expired jobs, lapsed {} subscriptions",
      sweep.closed_jobs, sweep.lapsed_companies
    );
  } else {
    debug!("Sweep found nothing to expire");
  }

  Ok(sweep)
}
