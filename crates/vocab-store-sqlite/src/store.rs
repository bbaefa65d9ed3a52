//! [`SqliteStore`]: the SQLite implementation of [`VocabStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use vocab_core::{
  record::ReviewRecord,
  schedule::normalize_word,
  store::{Cas, VocabStore},
  user::{NewUser, ProfileUpdate, User, normalize_email},
  word::{CachedWord, TagCount, WordDetail, WordInfo},
  wordbook::{NewWordbook, UserWordbook, Wordbook},
};

use crate::{
  Error, Result,
  encode::{
    DETAIL_COLUMNS, RECORD_COLUMNS, RawRecord, RawUser, RawUserWordbook,
    RawWordDetail, RawWordbook, USER_COLUMNS, USER_WORDBOOK_COLUMNS,
    WORDBOOK_COLUMNS, decode_cached, encode_category, encode_dt, encode_json,
    encode_status, encode_uuid, stored_record,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vocabulary store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_user(&self, column: &'static str, value: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
            rusqlite::params![value],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── VocabStore impl ─────────────────────────────────────────────────────────

impl VocabStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let now = Utc::now();
    let user = User {
      id:            Uuid::new_v4(),
      email:         normalize_email(&input.email),
      password_hash: input.password_hash,
      nickname:      input.nickname.trim().to_owned(),
      avatar:        String::new(),
      created_at:    now,
      updated_at:    now,
    };

    let id_str   = encode_uuid(user.id);
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();
    let nickname = user.nickname.clone();
    let at_str   = encode_dt(now);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO users (
             user_id, email, password_hash, nickname, avatar, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, '', ?5, ?5)",
          rusqlite::params![id_str, email, hash, nickname, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateEmail(user.email));
    }
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.query_user("user_id", encode_uuid(id)).await
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self.query_user("email", normalize_email(email)).await
  }

  async fn update_profile(
    &self,
    id:     Uuid,
    update: ProfileUpdate,
  ) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users
              SET nickname   = COALESCE(?2, nickname),
                  avatar     = COALESCE(?3, avatar),
                  updated_at = ?4
            WHERE user_id = ?1",
          rusqlite::params![id_str, update.nickname, update.avatar, at_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Review records ────────────────────────────────────────────────────────

  async fn find_record(&self, user_id: Uuid, word: &str) -> Result<Option<ReviewRecord>> {
    let user_str = encode_uuid(user_id);
    let word     = word.to_owned();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {RECORD_COLUMNS} FROM review_records
                WHERE user_id = ?1 AND word = ?2"
            ),
            rusqlite::params![user_str, word],
            RawRecord::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn upsert_record(&self, record: ReviewRecord) -> Result<Cas<ReviewRecord>> {
    let record      = stored_record(record);
    let user_str    = encode_uuid(record.user_id);
    let word        = record.word.clone();
    let status      = encode_status(record.status);
    let reviews     = i64::from(record.review_count);
    let correct     = i64::from(record.correct_count);
    let last_str    = encode_dt(record.last_review_at);
    let next_str    = encode_dt(record.next_review_at);
    let version     = i64::try_from(record.version)
      .map_err(|_| Error::Decode(format!("record version {}", record.version)))?;
    let created_str = encode_dt(record.created_at);
    let updated_str = encode_dt(record.updated_at);

    let written: bool = self
      .conn
      .call(move |conn| {
        let rows = if version == 1 {
          conn.execute(
            "INSERT INTO review_records (
               user_id, word, status, review_count, correct_count,
               last_review_at, next_review_at, version, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (user_id, word) DO NOTHING",
            rusqlite::params![
              user_str,
              word,
              status,
              reviews,
              correct,
              last_str,
              next_str,
              version,
              created_str,
              updated_str,
            ],
          )?
        } else {
          conn.execute(
            "UPDATE review_records
                SET status         = ?3,
                    review_count   = ?4,
                    correct_count  = ?5,
                    last_review_at = ?6,
                    next_review_at = ?7,
                    version        = ?8,
                    updated_at     = ?9
              WHERE user_id = ?1 AND word = ?2 AND version = ?8 - 1",
            rusqlite::params![
              user_str,
              word,
              status,
              reviews,
              correct,
              last_str,
              next_str,
              version,
              updated_str,
            ],
          )?
        };
        Ok(rows == 1)
      })
      .await?;

    if written {
      Ok(Cas::Written(record))
    } else {
      debug!(
        user_id = %record.user_id,
        word = %record.word,
        version = record.version,
        "stale review record write rejected"
      );
      Ok(Cas::Stale)
    }
  }

  async fn find_due(
    &self,
    user_id: Uuid,
    now:     DateTime<Utc>,
    limit:   usize,
  ) -> Result<Vec<ReviewRecord>> {
    let user_str  = encode_uuid(user_id);
    let now_str   = encode_dt(now);
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM review_records
            WHERE user_id = ?1 AND next_review_at <= ?2
            ORDER BY next_review_at ASC, rowid ASC
            LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![user_str, now_str, limit_val],
            RawRecord::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn list_records(&self, user_id: Uuid) -> Result<Vec<ReviewRecord>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM review_records
            WHERE user_id = ?1
            ORDER BY rowid ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  // ── Dictionary ────────────────────────────────────────────────────────────

  async fn get_word_detail(&self, word: &str) -> Result<Option<WordDetail>> {
    let word = word.to_owned();

    let raw: Option<RawWordDetail> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {DETAIL_COLUMNS} FROM word_details WHERE word = ?1"),
            rusqlite::params![word],
            RawWordDetail::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawWordDetail::into_detail).transpose()
  }

  async fn upsert_word_detail(&self, detail: WordDetail) -> Result<()> {
    let word             = normalize_word(&detail.word)?;
    let phonetic_json    = encode_json(&detail.phonetic)?;
    let audio_url_json   = encode_json(&detail.audio_url)?;
    let definitions_json = encode_json(&detail.definitions)?;
    let examples_json    = encode_json(&detail.examples)?;
    let tags_json        = encode_json(&detail.tags)?;
    let translation      = detail.translation;
    let pos              = detail.pos;
    let difficulty       = i64::from(detail.difficulty.clamp(1, 5));
    let frequency        = i64::from(detail.frequency);
    let tags             = detail.tags;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO word_details (
             word, phonetic_json, audio_url_json, definitions_json, translation,
             pos, examples_json, tags_json, difficulty, frequency
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT (word) DO UPDATE SET
             phonetic_json    = excluded.phonetic_json,
             audio_url_json   = excluded.audio_url_json,
             definitions_json = excluded.definitions_json,
             translation      = excluded.translation,
             pos              = excluded.pos,
             examples_json    = excluded.examples_json,
             tags_json        = excluded.tags_json,
             difficulty       = excluded.difficulty,
             frequency        = excluded.frequency",
          rusqlite::params![
            word,
            phonetic_json,
            audio_url_json,
            definitions_json,
            translation,
            pos,
            examples_json,
            tags_json,
            difficulty,
            frequency,
          ],
        )?;
        tx.execute("DELETE FROM word_tags WHERE word = ?1", rusqlite::params![word])?;
        for tag in &tags {
          tx.execute(
            "INSERT OR IGNORE INTO word_tags (word, tag) VALUES (?1, ?2)",
            rusqlite::params![word, tag],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn words_by_tag(
    &self,
    tag:    &str,
    offset: u64,
    limit:  u32,
  ) -> Result<(Vec<WordDetail>, u64)> {
    let tag        = tag.to_owned();
    let offset_val = i64::try_from(offset).unwrap_or(i64::MAX);
    let limit_val  = i64::from(limit);

    let (raws, total): (Vec<RawWordDetail>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM word_tags WHERE tag = ?1",
          rusqlite::params![tag],
          |r| r.get(0),
        )?;

        let columns = DETAIL_COLUMNS
          .split(", ")
          .map(|c| format!("d.{}", c.trim()))
          .collect::<Vec<_>>()
          .join(", ");
        let mut stmt = conn.prepare(&format!(
          "SELECT {columns}
             FROM word_details d
             JOIN word_tags t ON t.word = d.word
            WHERE t.tag = ?1
            ORDER BY d.frequency DESC, d.word ASC
            LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![tag, limit_val, offset_val],
            RawWordDetail::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((rows, total))
      })
      .await?;

    let details = raws
      .into_iter()
      .map(RawWordDetail::into_detail)
      .collect::<Result<_>>()?;
    Ok((details, total.max(0) as u64))
  }

  async fn tag_counts(&self) -> Result<Vec<TagCount>> {
    let rows: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT tag, COUNT(*) AS n FROM word_tags
            GROUP BY tag
            ORDER BY n DESC, tag ASC",
        )?;
        let rows = stmt
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(tag, n)| TagCount { tag, count: n.max(0) as u64 })
        .collect(),
    )
  }

  async fn get_cached_word(&self, word: &str) -> Result<Option<CachedWord>> {
    let word = word.to_owned();

    let raw: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT info_json, cached_at FROM word_cache WHERE word = ?1",
            rusqlite::params![word],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(info_json, cached_at)| decode_cached(&info_json, &cached_at))
      .transpose()
  }

  async fn cache_word(&self, info: WordInfo, cached_at: DateTime<Utc>) -> Result<()> {
    let word      = normalize_word(&info.word)?;
    let info_json = encode_json(&info)?;
    let at_str    = encode_dt(cached_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO word_cache (word, info_json, cached_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (word) DO UPDATE SET
             info_json = excluded.info_json,
             cached_at = excluded.cached_at",
          rusqlite::params![word, info_json, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn purge_word_cache(&self, cutoff: DateTime<Utc>) -> Result<usize> {
    let cutoff_str = encode_dt(cutoff);

    let purged = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM word_cache WHERE cached_at < ?1",
          rusqlite::params![cutoff_str],
        )?)
      })
      .await?;
    Ok(purged)
  }

  // ── Preset wordbooks ──────────────────────────────────────────────────────

  async fn replace_preset_wordbooks(&self, books: Vec<NewWordbook>) -> Result<Vec<Wordbook>> {
    let now = Utc::now();
    let books: Vec<Wordbook> = books
      .into_iter()
      .map(|b| Wordbook {
        id:          Uuid::new_v4(),
        name:        b.name,
        description: b.description,
        category:    b.category,
        word_count:  b.words.len(),
        words:       b.words,
        is_preset:   true,
        created_at:  now,
      })
      .collect();

    let rows = books
      .iter()
      .map(|b| {
        Ok((
          encode_uuid(b.id),
          b.name.clone(),
          b.description.clone(),
          encode_category(b.category),
          encode_json(&b.words)?,
        ))
      })
      .collect::<Result<Vec<_>>>()?;
    let at_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM wordbooks WHERE is_preset = 1", [])?;
        for (id, name, description, category, words_json) in &rows {
          tx.execute(
            "INSERT INTO wordbooks (
               wordbook_id, name, description, category, words_json, is_preset, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
            rusqlite::params![id, name, description, category, words_json, at_str],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(books)
  }

  async fn list_preset_wordbooks(&self) -> Result<Vec<Wordbook>> {
    let raws: Vec<RawWordbook> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WORDBOOK_COLUMNS} FROM wordbooks
            WHERE is_preset = 1
            ORDER BY rowid ASC"
        ))?;
        let rows = stmt
          .query_map([], RawWordbook::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWordbook::into_wordbook).collect()
  }

  async fn get_wordbook(&self, id: Uuid) -> Result<Option<Wordbook>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawWordbook> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {WORDBOOK_COLUMNS} FROM wordbooks WHERE wordbook_id = ?1"),
            rusqlite::params![id_str],
            RawWordbook::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawWordbook::into_wordbook).transpose()
  }

  // ── User wordbooks ────────────────────────────────────────────────────────

  async fn find_user_wordbook(
    &self,
    user_id:     Uuid,
    wordbook_id: Option<Uuid>,
  ) -> Result<Option<UserWordbook>> {
    let user_str = encode_uuid(user_id);
    let link_str = wordbook_id.map(encode_uuid);

    let raw: Option<RawUserWordbook> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_WORDBOOK_COLUMNS} FROM user_wordbooks
                WHERE user_id = ?1 AND IFNULL(wordbook_id, '') = IFNULL(?2, '')"
            ),
            rusqlite::params![user_str, link_str],
            RawUserWordbook::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUserWordbook::into_user_wordbook).transpose()
  }

  async fn save_user_wordbook(&self, book: UserWordbook) -> Result<UserWordbook> {
    let id_str      = encode_uuid(book.id);
    let user_str    = encode_uuid(book.user_id);
    let link_str    = book.wordbook_id.map(encode_uuid);
    let name        = book.custom_name.clone();
    let words_json  = encode_json(&book.words)?;
    let created_str = encode_dt(book.created_at);
    let updated_str = encode_dt(book.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO user_wordbooks (
             user_wordbook_id, user_id, wordbook_id, custom_name, words_json,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (user_wordbook_id) DO UPDATE SET
             custom_name = excluded.custom_name,
             words_json  = excluded.words_json,
             updated_at  = excluded.updated_at",
          rusqlite::params![
            id_str,
            user_str,
            link_str,
            name,
            words_json,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(book)
  }

  async fn delete_user_wordbook(&self, user_id: Uuid, wordbook_id: Uuid) -> Result<bool> {
    let user_str = encode_uuid(user_id);
    let link_str = encode_uuid(wordbook_id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM user_wordbooks WHERE user_id = ?1 AND wordbook_id = ?2",
          rusqlite::params![user_str, link_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn list_user_wordbooks(&self, user_id: Uuid) -> Result<Vec<UserWordbook>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawUserWordbook> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_WORDBOOK_COLUMNS} FROM user_wordbooks
            WHERE user_id = ?1
            ORDER BY rowid ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawUserWordbook::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUserWordbook::into_user_wordbook).collect()
  }
}
