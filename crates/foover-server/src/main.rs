//! foover server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, refreshes the product catalog once and serves the JSON API
//! over HTTP until interrupted.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use foover_service::{Coordinator, catalog::HttpCatalogSource};
use foover_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Foover voting server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Refresh the catalog and exit without serving.
  #[arg(long)]
  refresh_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config from {:?}", cli.config))?;

  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(
          server_cfg
            .log_level
            .parse()
            .context("invalid log_level")?,
        )
        .from_env_lossy(),
    )
    .init();

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path, server_cfg.store_config())
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let coordinator = Arc::new(Coordinator::new(Arc::new(store)));

  // One-shot catalog refresh. A failure leaves the previous catalog in place
  // and the server still starts.
  let source = HttpCatalogSource::new(&server_cfg.catalog_url, server_cfg.catalog_timeout())
    .context("failed to build catalog client")?;
  match tokio::time::timeout(
    server_cfg.refresh_timeout(),
    coordinator.refresh_catalog(&source),
  )
  .await
  {
    Ok(Ok(count)) => tracing::info!(count, url = source.url(), "products fetched and stored"),
    Ok(Err(e)) => tracing::error!(error = %e, url = source.url(), "failed to refresh catalog"),
    Err(_) => tracing::error!(url = source.url(), "catalog refresh timed out"),
  }

  if cli.refresh_only {
    coordinator.close().await.context("failed to close store")?;
    return Ok(());
  }

  let app = foover_api::api_router(coordinator.clone()).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  coordinator.close().await.context("failed to close store")?;
  tracing::info!("shut down");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to install Ctrl+C handler");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  tracing::info!("shutdown signal received");
}
