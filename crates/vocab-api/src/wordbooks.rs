//! Handlers for `/wordbook` endpoints and `/word/list`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/wordbook/preset` | no auth; word lists omitted |
//! | `GET`    | `/wordbook/{id}?page=1&limit=50` | 404 if not found |
//! | `POST`   | `/wordbook/subscribe/{id}` | copies the preset's words |
//! | `DELETE` | `/wordbook/subscribe/{id}` | idempotent |
//! | `GET`    | `/wordbook/user/subscribed` | also served as `/word/list` |

use std::collections::HashMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use vocab_core::{
  store::VocabStore,
  wordbook::{
    Pagination, UserWordbook, UserWordbookView, WordOrigin, WordbookSummary,
  },
};

use crate::{
  AppState,
  auth::AuthUser,
  error::ApiError,
  response::{Envelope, Path, Query},
};

pub const DEFAULT_WORDBOOK_PAGE_SIZE: u32 = 50;

fn wordbook_not_found() -> ApiError { ApiError::NotFound("Wordbook not found".into()) }

// ─── Presets ─────────────────────────────────────────────────────────────────

/// `GET /wordbook/preset`
pub async fn presets<S>(
  State(state): State<AppState<S>>,
) -> Result<Envelope<Vec<WordbookSummary>>, ApiError>
where
  S: VocabStore + 'static,
{
  let books = state
    .store
    .list_preset_wordbooks()
    .await
    .map_err(ApiError::store)?;
  Ok(Envelope::ok(books.iter().map(|b| b.summary()).collect()))
}

// ─── Detail ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageParams {
  pub page:  Option<u32>,
  pub limit: Option<u32>,
}

/// A wordbook with one page of its words.
#[derive(Debug, Serialize)]
pub struct WordbookPage {
  #[serde(flatten)]
  pub wordbook:   WordbookSummary,
  pub words:      Vec<String>,
  pub pagination: Pagination,
}

/// `GET /wordbook/{id}[?page=<n>&limit=<n>]`
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  Path(id): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Envelope<WordbookPage>, ApiError>
where
  S: VocabStore + 'static,
{
  let id = Uuid::parse_str(&id).map_err(|_| wordbook_not_found())?;
  let book = state
    .store
    .get_wordbook(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(wordbook_not_found)?;

  let (words, pagination) = book.page(
    params.page.unwrap_or(1),
    params.limit.unwrap_or(DEFAULT_WORDBOOK_PAGE_SIZE),
  );
  Ok(Envelope::ok(WordbookPage { wordbook: book.summary(), words, pagination }))
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

/// `POST /wordbook/subscribe/{id}`
pub async fn subscribe<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Envelope<UserWordbook>, ApiError>
where
  S: VocabStore + 'static,
{
  let id = Uuid::parse_str(&id).map_err(|_| wordbook_not_found())?;
  let book = state
    .store
    .get_wordbook(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(wordbook_not_found)?;

  let existing = state
    .store
    .find_user_wordbook(user.id, Some(id))
    .await
    .map_err(ApiError::store)?;
  if existing.is_some() {
    return Err(ApiError::BadRequest("Already subscribed to this wordbook".into()));
  }

  let now = state.clock.now();
  let mut own = UserWordbook::new(user.id, Some(id), book.name.clone(), now);
  for word in &book.words {
    own.add_word(word, WordOrigin::Preset, now);
  }
  let own = state
    .store
    .save_user_wordbook(own)
    .await
    .map_err(ApiError::store)?;
  info!(user_id = %user.id, wordbook = %book.name, words = own.words.len(), "subscribed");

  Ok(Envelope::ok(own).with_message("Subscribed"))
}

/// `DELETE /wordbook/subscribe/{id}`
pub async fn unsubscribe<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError>
where
  S: VocabStore + 'static,
{
  if let Ok(id) = Uuid::parse_str(&id) {
    state
      .store
      .delete_user_wordbook(user.id, id)
      .await
      .map_err(ApiError::store)?;
  }
  Ok(Envelope::done("Unsubscribed"))
}

/// `GET /wordbook/user/subscribed` and `GET /word/list`
pub async fn subscribed<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
) -> Result<Envelope<Vec<UserWordbookView>>, ApiError>
where
  S: VocabStore + 'static,
{
  let own = state
    .store
    .list_user_wordbooks(user.id)
    .await
    .map_err(ApiError::store)?;
  let presets: HashMap<Uuid, WordbookSummary> = state
    .store
    .list_preset_wordbooks()
    .await
    .map_err(ApiError::store)?
    .iter()
    .map(|b| (b.id, b.summary()))
    .collect();

  let views = own
    .into_iter()
    .map(|wordbook| {
      let preset = wordbook.wordbook_id.and_then(|id| presets.get(&id).cloned());
      UserWordbookView { wordbook, preset }
    })
    .collect();
  Ok(Envelope::ok(views))
}
