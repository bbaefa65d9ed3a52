//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as fixed-width RFC 3339 strings. List and pair
//! fields are stored as compact JSON. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use uuid::Uuid;
use vocab_core::{
  record::{ReviewRecord, ReviewStatus},
  user::User,
  word::{Accents, CachedWord, WordDetail, WordInfo},
  wordbook::{UserWord, UserWordbook, Wordbook, WordbookCategory},
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Always 27 characters, e.g. `2024-05-01T09:00:00.000000Z`.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `dt` at the precision [`encode_dt`] keeps.
pub fn stored_dt(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

/// `record` with every timestamp at stored precision.
pub fn stored_record(record: ReviewRecord) -> ReviewRecord {
  ReviewRecord {
    last_review_at: stored_dt(record.last_review_at),
    next_review_at: stored_dt(record.next_review_at),
    created_at:     stored_dt(record.created_at),
    updated_at:     stored_dt(record.updated_at),
    ..record
  }
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_status(s: ReviewStatus) -> &'static str {
  match s {
    ReviewStatus::Unknown => "unknown",
    ReviewStatus::Learning => "learning",
    ReviewStatus::Known => "known",
  }
}

pub fn decode_status(s: &str) -> Result<ReviewStatus> {
  ReviewStatus::parse(s).map_err(|_| Error::Decode(format!("review status {s:?}")))
}

pub fn encode_category(c: WordbookCategory) -> String { c.as_ref().to_owned() }

pub fn decode_category(s: &str) -> Result<WordbookCategory> {
  WordbookCategory::parse(s).map_err(|_| Error::Decode(format!("category {s:?}")))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

fn decode_json<T: serde::de::DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `review_records` SELECT, in [`RawRecord`]
/// field order.
pub const RECORD_COLUMNS: &str = "user_id, word, status, review_count, \
  correct_count, last_review_at, next_review_at, version, created_at, updated_at";

/// Raw values read directly from a `review_records` row.
pub struct RawRecord {
  pub user_id:        String,
  pub word:           String,
  pub status:         String,
  pub review_count:   i64,
  pub correct_count:  i64,
  pub last_review_at: String,
  pub next_review_at: String,
  pub version:        i64,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:        row.get(0)?,
      word:           row.get(1)?,
      status:         row.get(2)?,
      review_count:   row.get(3)?,
      correct_count:  row.get(4)?,
      last_review_at: row.get(5)?,
      next_review_at: row.get(6)?,
      version:        row.get(7)?,
      created_at:     row.get(8)?,
      updated_at:     row.get(9)?,
    })
  }

  pub fn into_record(self) -> Result<ReviewRecord> {
    let count = |n: i64, what: &str| {
      u32::try_from(n).map_err(|_| Error::Decode(format!("{what} {n}")))
    };
    Ok(ReviewRecord {
      user_id:        decode_uuid(&self.user_id)?,
      word:           self.word,
      status:         decode_status(&self.status)?,
      review_count:   count(self.review_count, "review_count")?,
      correct_count:  count(self.correct_count, "correct_count")?,
      last_review_at: decode_dt(&self.last_review_at)?,
      next_review_at: decode_dt(&self.next_review_at)?,
      version:        u64::try_from(self.version)
        .map_err(|_| Error::Decode(format!("version {}", self.version)))?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

pub const USER_COLUMNS: &str =
  "user_id, email, password_hash, nickname, avatar, created_at, updated_at";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub password_hash: String,
  pub nickname:      String,
  pub avatar:        String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      nickname:      row.get(3)?,
      avatar:        row.get(4)?,
      created_at:    row.get(5)?,
      updated_at:    row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.user_id)?,
      email:         self.email,
      password_hash: self.password_hash,
      nickname:      self.nickname,
      avatar:        self.avatar,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

pub const DETAIL_COLUMNS: &str = "word, phonetic_json, audio_url_json, \
  definitions_json, translation, pos, examples_json, tags_json, difficulty, frequency";

/// Raw values read directly from a `word_details` row.
pub struct RawWordDetail {
  pub word:             String,
  pub phonetic_json:    String,
  pub audio_url_json:   String,
  pub definitions_json: String,
  pub translation:      String,
  pub pos:              String,
  pub examples_json:    String,
  pub tags_json:        String,
  pub difficulty:       i64,
  pub frequency:        i64,
}

impl RawWordDetail {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      word:             row.get(0)?,
      phonetic_json:    row.get(1)?,
      audio_url_json:   row.get(2)?,
      definitions_json: row.get(3)?,
      translation:      row.get(4)?,
      pos:              row.get(5)?,
      examples_json:    row.get(6)?,
      tags_json:        row.get(7)?,
      difficulty:       row.get(8)?,
      frequency:        row.get(9)?,
    })
  }

  pub fn into_detail(self) -> Result<WordDetail> {
    let phonetic: Accents = decode_json(&self.phonetic_json)?;
    let audio_url: Accents = decode_json(&self.audio_url_json)?;
    Ok(WordDetail {
      word: self.word,
      phonetic,
      audio_url,
      definitions: decode_json(&self.definitions_json)?,
      translation: self.translation,
      pos: self.pos,
      examples: decode_json(&self.examples_json)?,
      tags: decode_json(&self.tags_json)?,
      difficulty: u8::try_from(self.difficulty)
        .map_err(|_| Error::Decode(format!("difficulty {}", self.difficulty)))?,
      frequency: u32::try_from(self.frequency)
        .map_err(|_| Error::Decode(format!("frequency {}", self.frequency)))?,
    })
  }
}

/// Decode a `word_cache` row.
pub fn decode_cached(info_json: &str, cached_at: &str) -> Result<CachedWord> {
  let info: WordInfo = decode_json(info_json)?;
  Ok(CachedWord { info, cached_at: decode_dt(cached_at)? })
}

pub const WORDBOOK_COLUMNS: &str =
  "wordbook_id, name, description, category, words_json, is_preset, created_at";

/// Raw values read directly from a `wordbooks` row.
pub struct RawWordbook {
  pub wordbook_id: String,
  pub name:        String,
  pub description: String,
  pub category:    String,
  pub words_json:  String,
  pub is_preset:   bool,
  pub created_at:  String,
}

impl RawWordbook {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      wordbook_id: row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      category:    row.get(3)?,
      words_json:  row.get(4)?,
      is_preset:   row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_wordbook(self) -> Result<Wordbook> {
    let words: Vec<String> = decode_json(&self.words_json)?;
    Ok(Wordbook {
      id:          decode_uuid(&self.wordbook_id)?,
      name:        self.name,
      description: self.description,
      category:    decode_category(&self.category)?,
      word_count:  words.len(),
      words,
      is_preset:   self.is_preset,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const USER_WORDBOOK_COLUMNS: &str = "user_wordbook_id, user_id, wordbook_id, \
  custom_name, words_json, created_at, updated_at";

/// Raw values read directly from a `user_wordbooks` row.
pub struct RawUserWordbook {
  pub user_wordbook_id: String,
  pub user_id:          String,
  pub wordbook_id:      Option<String>,
  pub custom_name:      String,
  pub words_json:       String,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawUserWordbook {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_wordbook_id: row.get(0)?,
      user_id:          row.get(1)?,
      wordbook_id:      row.get(2)?,
      custom_name:      row.get(3)?,
      words_json:       row.get(4)?,
      created_at:       row.get(5)?,
      updated_at:       row.get(6)?,
    })
  }

  pub fn into_user_wordbook(self) -> Result<UserWordbook> {
    let words: Vec<UserWord> = decode_json(&self.words_json)?;
    Ok(UserWordbook {
      id: decode_uuid(&self.user_wordbook_id)?,
      user_id: decode_uuid(&self.user_id)?,
      wordbook_id: self.wordbook_id.as_deref().map(decode_uuid).transpose()?,
      custom_name: self.custom_name,
      words,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  #[test]
  fn timestamps_sort_as_text() {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let stamps = [
      base,
      base + Duration::microseconds(1),
      base + Duration::milliseconds(500),
      base + Duration::seconds(1),
      base + Duration::days(400),
    ];
    let encoded: Vec<String> = stamps.iter().copied().map(encode_dt).collect();
    assert!(encoded.iter().all(|s| s.len() == 27));
    let mut sorted = encoded.clone();
    sorted.sort();
    assert_eq!(sorted, encoded);
  }

  #[test]
  fn timestamp_round_trip_keeps_microseconds() {
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
      + Duration::microseconds(123_456);
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }

  #[test]
  fn unknown_status_is_a_decode_error() {
    assert!(matches!(decode_status("mastered"), Err(Error::Decode(_))));
  }
}
