//! vocab server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus any
//! `VOCAB_*` environment overrides, opens the SQLite store, and serves the
//! JSON API under `/api`.
//!
//! # Maintenance modes
//!
//! ```
//! cargo run -p vocab-server --bin server -- --seed
//! cargo run -p vocab-server --bin server -- --purge-cache
//! ```

mod seed;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vocab_api::{AppState, TokenKeys};
use vocab_core::{
  clock::{Clock, SystemClock},
  dictionary::{CacheSource, CuratedSource, Dictionary},
  store::VocabStore,
};
use vocab_dict::{FreeDictionary, LocalDictionary};
use vocab_store_sqlite::SqliteStore;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Vocabulary learning server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Replace the preset wordbooks and curated words, then exit.
  #[arg(long)]
  seed: bool,

  /// Delete expired dictionary cache entries, then exit.
  #[arg(long, conflicts_with = "seed")]
  purge_cache: bool,
}

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
  let server_cfg = ServerConfig::load(&cli.config)?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.seed {
    let report = seed::seed(&store).await.context("seeding failed")?;
    tracing::info!(
      wordbooks = report.wordbooks,
      words = report.words,
      "seeded store"
    );
    return Ok(());
  }

  if cli.purge_cache {
    let cutoff = Utc::now() - server_cfg.cache_ttl();
    let purged = store
      .purge_word_cache(cutoff)
      .await
      .context("failed to purge word cache")?;
    tracing::info!(purged, %cutoff, "purged word cache");
    return Ok(());
  }

  let tokens = TokenKeys::new(server_cfg.token_secret.as_bytes(), server_cfg.token_ttl())
    .context("invalid token_secret")?;
  let online = FreeDictionary::new(
    &server_cfg.dictionary_api_url,
    server_cfg.dictionary_timeout(),
  )
  .context("invalid dictionary_api_url")?;

  let store = Arc::new(store);
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let dictionary = Dictionary::new()
    .with_source(LocalDictionary)
    .with_source(CuratedSource::new(store.clone()))
    .with_source(CacheSource::new(
      store.clone(),
      clock.clone(),
      server_cfg.cache_ttl(),
    ))
    .with_source(online);
  tracing::debug!(tiers = ?dictionary.tiers(), "dictionary ready");

  let state = AppState {
    store,
    dictionary,
    clock,
    tokens: Arc::new(tokens),
  };

  let app = vocab_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
