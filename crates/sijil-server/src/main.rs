//! sijil server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! configured store backend, and serves the JSON API over HTTP. Every
//! setting can be overridden with `SIJIL_`-prefixed environment variables
//! (e.g. `SIJIL_SMS__AUTH_TOKEN` for the credential that should not live
//! in a file).

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use serde::Deserialize;
use sijil_api::{ApiState, api_router};
use sijil_core::store::Store;
use sijil_notify::{Notifier, TwilioConfig, TwilioGateway};
use sijil_store_mem::MemStore;
use sijil_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "sijil records server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

// ─── Configuration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StoreBackend {
  Memory,
  Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
struct StoreSection {
  backend: StoreBackend,
  /// Database file path; required for the sqlite backend.
  path:    Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct SmsSection {
  account_sid:           String,
  auth_token:            String,
  messaging_service_sid: String,
  /// Alphanumeric sender identity shown to recipients.
  sender:                String,
  /// Trailing window, in hours, within which repeat notifications to the
  /// same number are suppressed.
  #[serde(default = "default_dedup_window_hours")]
  dedup_window_hours:    i64,
}

fn default_dedup_window_hours() -> i64 { sijil_notify::DEFAULT_DEDUP_WINDOW_HOURS }

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  host:  String,
  port:  u16,
  store: StoreSection,
  sms:   SmsSection,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SIJIL").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let notifier = build_notifier(&server_cfg.sms)?;

  match server_cfg.store.backend {
    StoreBackend::Memory => {
      tracing::info!("using in-memory store; data is lost on shutdown");
      serve(MemStore::new(), notifier, &server_cfg).await
    }
    StoreBackend::Sqlite => {
      let path = server_cfg
        .store
        .path
        .clone()
        .context("store.path is required for the sqlite backend")?;
      let path = expand_tilde(&path);
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      serve(store, notifier, &server_cfg).await
    }
  }
}

fn build_notifier(sms: &SmsSection) -> anyhow::Result<Notifier<TwilioGateway>> {
  let gateway = TwilioGateway::new(TwilioConfig {
    account_sid:           sms.account_sid.clone(),
    auth_token:            sms.auth_token.clone(),
    messaging_service_sid: sms.messaging_service_sid.clone(),
    sender:                sms.sender.clone(),
  })
  .context("failed to build sms gateway")?;

  Ok(
    Notifier::new(gateway, sms.sender.clone())
      .with_dedup_window(chrono::Duration::hours(sms.dedup_window_hours)),
  )
}

async fn serve<S>(
  store: S,
  notifier: Notifier<TwilioGateway>,
  cfg: &ServerConfig,
) -> anyhow::Result<()>
where
  S: Store + 'static,
{
  let state = ApiState {
    store:    Arc::new(store),
    notifier: Arc::new(notifier),
  };

  let app = Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", cfg.host, cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
