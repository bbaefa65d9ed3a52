use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("malformed dictionary response: {0}")]
  Json(#[from] serde_json::Error),

  #[error("dictionary API returned {0}")]
  UnexpectedStatus(reqwest::StatusCode),

  #[error("invalid dictionary base URL: {0}")]
  BaseUrl(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
