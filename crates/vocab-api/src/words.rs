//! Handlers for `/word` endpoints: lookup, personal word lists, and review
//! scheduling.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/word/search?word=` | 404 if no source knows the word |
//! | `POST` | `/word/add` | body `{word, wordbookId?}` |
//! | `GET`  | `/word/progress` | counts per status |
//! | `POST` | `/word/record` | body `{word, status}`; 409 on a concurrent update |
//! | `GET`  | `/word/review?limit=20` | due records with their word info |
//! | `GET`  | `/word/by-tag/{tag}?page=1&limit=20` | |
//! | `GET`  | `/word/tags` | |

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;
use vocab_core::{
  record::{Progress, ReviewRecord, ReviewStatus},
  schedule::{
    DEFAULT_DUE_LIMIT, aggregate_progress, normalize_word, record_outcome,
  },
  store::{Cas, VocabStore},
  word::{TagCount, TagPage, WordInfo, total_pages},
  wordbook::{DEFAULT_USER_WORDBOOK_NAME, UserWordbook, WordOrigin},
};

use crate::{
  AppState,
  auth::AuthUser,
  error::ApiError,
  response::{Envelope, Json, Path, Query},
  wordbooks::PageParams,
};

pub const DEFAULT_TAG_PAGE_SIZE: u32 = 20;

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub word: Option<String>,
}

/// `GET /word/search?word=<word>`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  Query(params): Query<SearchParams>,
) -> Result<Envelope<WordInfo>, ApiError>
where
  S: VocabStore + 'static,
{
  let word = params.word.unwrap_or_default();
  if word.trim().is_empty() {
    return Err(ApiError::BadRequest("Enter a word to look up".into()));
  }

  state
    .dictionary
    .lookup(&word)
    .await?
    .map(Envelope::ok)
    .ok_or_else(|| ApiError::NotFound("Word not found".into()))
}

// ─── Add ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBody {
  pub word:        Option<String>,
  pub wordbook_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AddedWord {
  pub word: String,
}

/// `POST /word/add`: appends to the user wordbook for `wordbookId`,
/// creating it if needed.
pub async fn add<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Json(body): Json<AddBody>,
) -> Result<Envelope<AddedWord>, ApiError>
where
  S: VocabStore + 'static,
{
  let word = normalize_word(body.word.as_deref().unwrap_or_default())?;
  let now = state.clock.now();

  let existing = state
    .store
    .find_user_wordbook(user.id, body.wordbook_id)
    .await
    .map_err(ApiError::store)?;
  let mut book = existing.unwrap_or_else(|| {
    UserWordbook::new(user.id, body.wordbook_id, DEFAULT_USER_WORDBOOK_NAME, now)
  });

  if !book.add_word(&word, WordOrigin::Search, now) {
    return Err(ApiError::BadRequest("Word is already in the wordbook".into()));
  }
  state
    .store
    .save_user_wordbook(book)
    .await
    .map_err(ApiError::store)?;

  Ok(Envelope::ok(AddedWord { word }).with_message("Word added"))
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// `GET /word/progress`
pub async fn progress<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
) -> Result<Envelope<Progress>, ApiError>
where
  S: VocabStore + 'static,
{
  let records = state
    .store
    .list_records(user.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Envelope::ok(aggregate_progress(&records)))
}

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecordBody {
  pub word:   Option<String>,
  pub status: Option<String>,
}

/// `POST /word/record`
pub async fn record<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Json(body): Json<RecordBody>,
) -> Result<Envelope<ReviewRecord>, ApiError>
where
  S: VocabStore + 'static,
{
  let (Some(word), Some(status)) = (body.word, body.status) else {
    return Err(ApiError::BadRequest("word and status are required".into()));
  };
  let outcome = ReviewStatus::parse(&status)?;
  let word = normalize_word(&word)?;

  let existing = state
    .store
    .find_record(user.id, &word)
    .await
    .map_err(ApiError::store)?;
  let next = record_outcome(existing, user.id, &word, outcome, state.clock.now())?;

  match state.store.upsert_record(next).await.map_err(ApiError::store)? {
    Cas::Written(saved) => {
      debug!(
        user_id = %user.id,
        %word,
        next_review_at = %saved.next_review_at,
        "recorded review"
      );
      Ok(Envelope::ok(saved).with_message("Record updated"))
    }
    Cas::Stale => Err(ApiError::Conflict(
      "The record was updated concurrently; please retry".into(),
    )),
  }
}

// ─── Review ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewParams {
  pub limit: Option<usize>,
}

/// A due record with whatever the dictionary knows about its word.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueWord {
  #[serde(flatten)]
  pub record:    ReviewRecord,
  pub word_info: Option<WordInfo>,
}

/// `GET /word/review[?limit=<n>]`
pub async fn review<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Query(params): Query<ReviewParams>,
) -> Result<Envelope<Vec<DueWord>>, ApiError>
where
  S: VocabStore + 'static,
{
  let limit = params.limit.unwrap_or(DEFAULT_DUE_LIMIT);
  let due = state
    .store
    .find_due(user.id, state.clock.now(), limit)
    .await
    .map_err(ApiError::store)?;

  let mut words = Vec::with_capacity(due.len());
  for record in due {
    let word_info = match state.dictionary.lookup(&record.word).await {
      Ok(info) => info,
      Err(e) => {
        warn!(word = %record.word, error = %e, "lookup for due word failed");
        None
      }
    };
    words.push(DueWord { record, word_info });
  }
  Ok(Envelope::ok(words))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// `GET /word/by-tag/{tag}[?page=<n>&limit=<n>]`
pub async fn by_tag<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  Path(tag): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Envelope<TagPage>, ApiError>
where
  S: VocabStore + 'static,
{
  let page = params.page.unwrap_or(1).max(1);
  let limit = params.limit.unwrap_or(DEFAULT_TAG_PAGE_SIZE);
  let offset = u64::from(page - 1) * u64::from(limit);

  let (details, total) = state
    .store
    .words_by_tag(&tag, offset, limit)
    .await
    .map_err(ApiError::store)?;

  Ok(Envelope::ok(TagPage {
    words: details.into_iter().map(WordInfo::from).collect(),
    total,
    page,
    total_pages: total_pages(total, limit),
  }))
}

/// `GET /word/tags`
pub async fn tags<S>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
) -> Result<Envelope<Vec<TagCount>>, ApiError>
where
  S: VocabStore + 'static,
{
  let counts = state.store.tag_counts().await.map_err(ApiError::store)?;
  Ok(Envelope::ok(counts))
}
