pub mod server;

use tokio::{task::JoinHandle, time::sleep};

use crate::{prelude::*, state::AppState};

#[async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

/// Runs registered services and restarts any that stop.
pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self { plugins: Vec::new() }
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub fn run(self, app: Arc<AppState>) -> Vec<JoinHandle<()>> {
    self
      .plugins
      .into_iter()
      .map(|plugin| tokio::spawn(supervise(plugin, app.clone())))
      .collect()
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("SYSTEM: Service `{name}` initialized");

  loop {
    let app = app.clone();
    let plugin = plugin.clone();

    let handle = tokio::spawn(async move { plugin.start(app).await });

    match handle.await {
      Ok(Ok(())) => {
        warn!("Service `{name}` stopped unexpectedly (Ok).");
      }
      Ok(Err(err)) => {
        error!("Service `{name}` crashed with error: {err:#}.");
      }
      Err(join_err) => {
        if join_err.is_cancelled() {
          info!("Service `{name}` shutdown.");
          break;
        } else {
          error!("Service `{name}` PANICKED!");
        }
      }
    }

    sleep(Duration::from_secs(5)).await;
    info!("SYSTEM: Restarting service `{name}`...");
  }
}
