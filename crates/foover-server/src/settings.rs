//! Runtime configuration.
//!
//! Read from an optional TOML file, then overridden by `FOOVER_*` environment
//! variables (e.g. `FOOVER_PORT=9090`). Every key has a default.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use foover_store_sqlite::StoreConfig;
use serde::Deserialize;

pub const DEFAULT_CATALOG_URL: &str =
  "https://amperoid.tenants.foodji.io/machines/4bf115ee-303a-4089-a3ea-f6e7aae0ab94";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// Default tracing directive when `RUST_LOG` is unset.
  pub log_level:            String,
  pub catalog_url:          String,
  /// Per-request budget for the catalog HTTP fetch.
  pub catalog_timeout_secs: u64,
  /// Overall budget for the startup catalog refresh.
  pub refresh_timeout_secs: u64,
  pub read_timeout_ms:      u64,
  pub write_timeout_ms:     u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".to_string(),
      port:                 8080,
      store_path:           PathBuf::from("foover.db"),
      log_level:            "info".to_string(),
      catalog_url:          DEFAULT_CATALOG_URL.to_string(),
      catalog_timeout_secs: 10,
      refresh_timeout_secs: 30,
      read_timeout_ms:      10_000,
      write_timeout_ms:     5_000,
    }
  }
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FOOVER"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_config(&self) -> StoreConfig {
    StoreConfig {
      read_timeout:  Duration::from_millis(self.read_timeout_ms),
      write_timeout: Duration::from_millis(self.write_timeout_ms),
    }
  }

  pub fn catalog_timeout(&self) -> Duration { Duration::from_secs(self.catalog_timeout_secs) }

  pub fn refresh_timeout(&self) -> Duration { Duration::from_secs(self.refresh_timeout_secs) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
