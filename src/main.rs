//! Release tracker - records published builds and answers "what is the
//! latest build of this product on this branch".
//!
//! Architecture:
//! - Axum for the HTTP API (ingest + lookup)
//! - A key/sort-key item store behind the `Store` trait (SeaORM or memory)
//! - Tokio for async runtime

mod entity;
mod error;
mod model;
mod plugins;
mod prelude;
mod state;
mod store;
mod sv;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "releases=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  info!("Starting release tracker v{}", env!("CARGO_PKG_VERSION"));

  let config = Config::from_env();
  info!(
    "Table `{}`, content verification {}",
    config.table,
    if config.verify_content { "on" } else { "off" }
  );

  let app = Arc::new(AppState::new(config).await?);

  let services = plugins::App::new().register(plugins::server::Plugin).run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for shutdown")?;
  info!("Shutting down...");

  for service in services {
    service.abort();
  }
  Ok(())
}
