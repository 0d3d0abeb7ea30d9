use std::env;

use reqwest::Client;

use crate::{
  prelude::*,
  store::{MemoryStore, SqlStore, Store, TableSchema},
  sv,
};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  /// Table both handlers read and write
  pub table: String,
  /// HEAD-check download URLs before recording them
  pub verify_content: bool,
  pub port: u16,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:releases.db?mode=rwc"),
      table: String::from("releases"),
      verify_content: true,
      port: 3000,
    }
  }
}

impl Config {
  pub fn from_env() -> Self {
    let default = Self::default();

    Self {
      database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),
      table: env::var("RELEASES_TABLE")
        .ok()
        .filter(|table| !table.trim().is_empty())
        .unwrap_or(default.table),
      verify_content: env::var("VERIFY_CONTENT")
        .ok()
        .and_then(|flag| parse_flag(&flag))
        .unwrap_or(default.verify_content),
      port: env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(default.port),
    }
  }
}

fn parse_flag(flag: &str) -> Option<bool> {
  match flag.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Some(true),
    "0" | "false" | "no" | "off" => Some(false),
    _ => None,
  }
}

pub struct Services<'a> {
  pub releases: sv::Releases<'a>,
  pub content: sv::Content<'a>,
}

pub struct AppState {
  pub store: Arc<dyn Store>,
  pub http: Client,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    let store: Arc<dyn Store> = if config.database_url == "memory" {
      warn!("Using in-memory store, releases will not survive a restart");
      Arc::new(MemoryStore::new())
    } else {
      Arc::new(
        SqlStore::connect(&config.database_url)
          .await
          .context("Failed to open release store")?,
      )
    };

    Self::with_store(store, config).await
  }

  pub async fn with_store(
    store: Arc<dyn Store>,
    config: Config,
  ) -> anyhow::Result<Self> {
    store
      .ensure_table(&config.table, TableSchema::new("productName", "buildId"))
      .await
      .with_context(|| {
        format!("Failed to provision table `{}`", config.table)
      })?;

    let http = Client::builder()
      .user_agent(concat!("releases/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { store, http, config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      releases: sv::Releases::new(self.store.as_ref()),
      content: sv::Content::new(&self.http),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_flag() {
    assert_eq!(parse_flag("TRUE"), Some(true));
    assert_eq!(parse_flag(" 0 "), Some(false));
    assert_eq!(parse_flag("maybe"), None);
  }

  #[tokio::test]
  async fn test_provisions_configured_table() {
    let config = Config { table: "builds".into(), ..Config::default() };
    let app = AppState::with_store(Arc::new(MemoryStore::new()), config)
      .await
      .unwrap();

    let out = app
      .store
      .query("builds", crate::store::Query::partition("x"))
      .await
      .unwrap();
    assert_eq!(out.count, 0);
  }
}
