pub mod cron;
pub mod server;

use tokio::{task::JoinSet, time::sleep};

use crate::{prelude::*, state::AppState};

const RESTART_DELAY: Duration = Duration::from_secs(5);

/// Long-running service sharing the application state.
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str;

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
  restart_delay: Duration,
}

impl App {
  pub fn new() -> Self {
    Self { plugins: Vec::new(), restart_delay: RESTART_DELAY }
  }

  /// Delay before a crashed service is started again.
  #[allow(dead_code)]
  pub fn restart_delay(mut self, delay: Duration) -> Self {
    self.restart_delay = delay;
    self
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  /// Spawns every plugin under a supervisor that restarts it whenever it
  /// returns or panics. Dropping or aborting the set stops all of them.
  pub fn run(self, app: Arc<AppState>) -> JoinSet<()> {
    let mut set = JoinSet::new();

    for plugin in self.plugins {
      set.spawn(supervise(plugin, app.clone(), self.restart_delay));
    }

    set
  }
}

async fn supervise(
  plugin: Arc<dyn Plugin>,
  app: Arc<AppState>,
  restart_delay: Duration,
) {
  let name = plugin.name();
  info!("Service `{name}` initialized");

  loop {
    // the set aborts the running service when the supervisor is dropped
    let mut task = JoinSet::new();
    {
      let plugin = plugin.clone();
      let app = app.clone();
      task.spawn(async move { plugin.start(app).await });
    }

    match task.join_next().await {
      Some(Ok(Ok(()))) => warn!("Service `{name}` stopped unexpectedly"),
      Some(Ok(Err(err))) => error!("Service `{name}` crashed: {err:#}"),
      Some(Err(err)) if err.is_panic() => {
        error!("Service `{name}` panicked")
      }
      Some(Err(_)) | None => {
        info!("Service `{name}` shut down");
        return;
      }
    }

    sleep(restart_delay).await;
    info!("Restarting service `{name}`");
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;
  use crate::state::tests::memory;

  struct Flaky(Arc<AtomicUsize>);

  #[async_trait::async_trait]
  impl Plugin for Flaky {
    fn name(&self) -> &'static str {
      "flaky"
    }

    async fn start(&self, _: Arc<AppState>) -> anyhow::Result<()> {
      self.0.fetch_add(1, Ordering::SeqCst);
      anyhow::bail!("boom")
    }
  }

  #[tokio::test]
  async fn test_crashed_plugin_restarts() {
    let starts = Arc::new(AtomicUsize::new(0));
    let app = Arc::new(memory().await);

    let mut set = App::new()
      .restart_delay(Duration::from_millis(10))
      .register(Flaky(starts.clone()))
      .run(app);

    sleep(Duration::from_millis(500)).await;
    assert!(starts.load(Ordering::SeqCst) >= 3);

    set.abort_all();
    while set.join_next().await.is_some() {}
  }
}
