//! JSON REST API for the vocabulary service.
//!
//! Exposes an axum [`Router`] backed by any [`VocabStore`]. Every response
//! except `/health` is wrapped in a [`response::Envelope`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, vocab_api::router(state)).await?;
//! ```

pub mod account;
pub mod auth;
pub mod error;
pub mod response;
pub mod wordbooks;
pub mod words;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use vocab_core::{clock::Clock, dictionary::Dictionary, store::VocabStore};

pub use auth::TokenKeys;
pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub dictionary: Dictionary,
  pub clock:      Arc<dyn Clock>,
  pub tokens:     Arc<TokenKeys>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      self.store.clone(),
      dictionary: self.dictionary.clone(),
      clock:      self.clock.clone(),
      tokens:     self.tokens.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The API routes, unprefixed.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: VocabStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Accounts
    .route("/auth/register", post(account::register::<S>))
    .route("/auth/login", post(account::login::<S>))
    .route(
      "/auth/profile",
      get(account::profile::<S>).put(account::update_profile::<S>),
    )
    // Words
    .route("/word/search", get(words::search::<S>))
    .route("/word/add", post(words::add::<S>))
    .route("/word/list", get(wordbooks::subscribed::<S>))
    .route("/word/progress", get(words::progress::<S>))
    .route("/word/record", post(words::record::<S>))
    .route("/word/review", get(words::review::<S>))
    .route("/word/by-tag/{tag}", get(words::by_tag::<S>))
    .route("/word/tags", get(words::tags::<S>))
    // Wordbooks
    .route("/wordbook/preset", get(wordbooks::presets::<S>))
    .route("/wordbook/user/subscribed", get(wordbooks::subscribed::<S>))
    .route(
      "/wordbook/subscribe/{id}",
      post(wordbooks::subscribe::<S>).delete(wordbooks::unsubscribe::<S>),
    )
    .route("/wordbook/{id}", get(wordbooks::detail::<S>))
    .with_state(state)
}

/// The full application: [`api_router`] under `/api`, with request tracing
/// and permissive CORS.
pub fn router<S>(state: AppState<S>) -> Router<()>
where
  S: VocabStore + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

/// `GET /health`
async fn health() -> Json<Value> {
  Json(json!({
    "status": "ok",
    "timestamp": chrono::Utc::now().to_rfc3339(),
  }))
}

async fn not_found() -> ApiError { ApiError::NotFound("Route not found".into()) }

#[cfg(test)]
mod tests;
