//! Error types for `vocab-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("word must not be empty")]
  EmptyWord,

  #[error("unrecognised review outcome: {0:?}")]
  InvalidOutcome(String),

  #[error("unknown wordbook category: {0:?}")]
  UnknownCategory(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
