//! Server configuration: an optional TOML file overlaid with `VOCAB_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;

/// Everything the binary needs to start serving.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                    String,
  #[serde(default = "default_port")]
  pub port:                    u16,
  #[serde(default = "default_store_path")]
  pub store_path:              PathBuf,
  /// HMAC key for session tokens. Required.
  pub token_secret:            String,
  #[serde(default = "default_week_secs")]
  pub token_ttl_secs:          i64,
  #[serde(default = "default_dictionary_api_url")]
  pub dictionary_api_url:      String,
  #[serde(default = "default_dictionary_timeout_secs")]
  pub dictionary_timeout_secs: u64,
  #[serde(default = "default_week_secs")]
  pub cache_ttl_secs:          i64,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> PathBuf { PathBuf::from("vocab.db") }
fn default_week_secs() -> i64 { 7 * 24 * 60 * 60 }
fn default_dictionary_api_url() -> String {
  vocab_dict::free::DEFAULT_BASE_URL.to_string()
}
fn default_dictionary_timeout_secs() -> u64 { 5 }

impl ServerConfig {
  /// Read `path` if it exists, then apply `VOCAB_*` environment overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("VOCAB"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn token_ttl(&self) -> chrono::Duration {
    chrono::Duration::seconds(self.token_ttl_secs)
  }

  pub fn cache_ttl(&self) -> chrono::Duration {
    chrono::Duration::seconds(self.cache_ttl_secs)
  }

  pub fn dictionary_timeout(&self) -> Duration {
    Duration::from_secs(self.dictionary_timeout_secs)
  }
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
