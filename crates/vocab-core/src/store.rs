//! The `VocabStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `vocab-store-sqlite`).
//! Higher layers (`vocab-api`, `vocab-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  record::ReviewRecord,
  user::{NewUser, ProfileUpdate, User},
  word::{CachedWord, TagCount, WordDetail, WordInfo},
  wordbook::{NewWordbook, UserWordbook, Wordbook},
};

/// Outcome of a compare-and-swap write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cas<T> {
  /// The write was applied; carries the stored value.
  Written(T),
  /// Another writer got there first. Nothing was changed.
  Stale,
}

/// Abstraction over a storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait VocabStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails if the email is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up by normalised email.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns `None` if the user does not exist.
  fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Review records ────────────────────────────────────────────────────

  fn find_record<'a>(
    &'a self,
    user_id: Uuid,
    word: &'a str,
  ) -> impl Future<Output = Result<Option<ReviewRecord>, Self::Error>> + Send + 'a;

  /// Insert or update the record for `(record.user_id, record.word)`.
  ///
  /// Version 1 inserts and is [`Cas::Stale`] if the pair already exists.
  /// Any later version updates only if the stored version is exactly one
  /// less, and is [`Cas::Stale`] otherwise.
  fn upsert_record(
    &self,
    record: ReviewRecord,
  ) -> impl Future<Output = Result<Cas<ReviewRecord>, Self::Error>> + Send + '_;

  /// Records with `next_review_at <= now`, earliest first, at most `limit`.
  /// Must agree with [`crate::schedule::select_due`] over
  /// [`VocabStore::list_records`].
  fn find_due(
    &self,
    user_id: Uuid,
    now: DateTime<Utc>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ReviewRecord>, Self::Error>> + Send + '_;

  /// All records for a user, in creation order.
  fn list_records(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ReviewRecord>, Self::Error>> + Send + '_;

  // ── Dictionary ────────────────────────────────────────────────────────

  fn get_word_detail<'a>(
    &'a self,
    word: &'a str,
  ) -> impl Future<Output = Result<Option<WordDetail>, Self::Error>> + Send + 'a;

  /// Insert or replace a curated word.
  fn upsert_word_detail(
    &self,
    detail: WordDetail,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Curated words carrying `tag`, most frequent first then alphabetical,
  /// plus the total number of matches.
  fn words_by_tag<'a>(
    &'a self,
    tag: &'a str,
    offset: u64,
    limit: u32,
  ) -> impl Future<Output = Result<(Vec<WordDetail>, u64), Self::Error>> + Send + 'a;

  /// Every tag with its word count, most common first.
  fn tag_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<TagCount>, Self::Error>> + Send + '_;

  fn get_cached_word<'a>(
    &'a self,
    word: &'a str,
  ) -> impl Future<Output = Result<Option<CachedWord>, Self::Error>> + Send + 'a;

  /// Insert or replace a cache entry.
  fn cache_word(
    &self,
    info: WordInfo,
    cached_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete cache entries stored before `cutoff`; returns how many.
  fn purge_word_cache(
    &self,
    cutoff: DateTime<Utc>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Preset wordbooks ──────────────────────────────────────────────────

  /// Delete every preset wordbook and insert `books` in their place.
  fn replace_preset_wordbooks(
    &self,
    books: Vec<NewWordbook>,
  ) -> impl Future<Output = Result<Vec<Wordbook>, Self::Error>> + Send + '_;

  fn list_preset_wordbooks(
    &self,
  ) -> impl Future<Output = Result<Vec<Wordbook>, Self::Error>> + Send + '_;

  fn get_wordbook(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Wordbook>, Self::Error>> + Send + '_;

  // ── User wordbooks ────────────────────────────────────────────────────

  fn find_user_wordbook(
    &self,
    user_id: Uuid,
    wordbook_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Option<UserWordbook>, Self::Error>> + Send + '_;

  /// Insert or replace by `id`.
  fn save_user_wordbook(
    &self,
    book: UserWordbook,
  ) -> impl Future<Output = Result<UserWordbook, Self::Error>> + Send + '_;

  /// Returns `true` if something was deleted.
  fn delete_user_wordbook(
    &self,
    user_id: Uuid,
    wordbook_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_user_wordbooks(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<UserWordbook>, Self::Error>> + Send + '_;
}
