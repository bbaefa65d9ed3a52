//! Preset wordbooks and users' personal word lists.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result, word::total_pages};

/// Name given to a user wordbook created implicitly by adding a word.
pub const DEFAULT_USER_WORDBOOK_NAME: &str = "My Wordbook";

// ─── Preset wordbooks ────────────────────────────────────────────────────────

/// The exam a wordbook targets.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum WordbookCategory {
  Cet4,
  Cet6,
  Ielts,
  Toefl,
  Gre,
  Custom,
}

impl WordbookCategory {
  pub fn parse(raw: &str) -> Result<Self> {
    Self::from_str(raw).map_err(|_| Error::UnknownCategory(raw.to_owned()))
  }
}

/// A curated word list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wordbook {
  pub id:          Uuid,
  pub name:        String,
  pub description: String,
  pub category:    WordbookCategory,
  pub word_count:  usize,
  pub words:       Vec<String>,
  pub is_preset:   bool,
  pub created_at:  DateTime<Utc>,
}

impl Wordbook {
  /// The wordbook without its word list.
  pub fn summary(&self) -> WordbookSummary {
    WordbookSummary {
      id:          self.id,
      name:        self.name.clone(),
      description: self.description.clone(),
      category:    self.category,
      word_count:  self.word_count,
      is_preset:   self.is_preset,
      created_at:  self.created_at,
    }
  }

  /// One page of the word list. Pages are 1-based; page 0 is treated as 1.
  pub fn page(&self, page: u32, limit: u32) -> (Vec<String>, Pagination) {
    let page = page.max(1);
    let skip = (page as usize - 1).saturating_mul(limit as usize);
    let words = self
      .words
      .iter()
      .skip(skip)
      .take(limit as usize)
      .cloned()
      .collect();
    let total = self.words.len() as u64;
    (words, Pagination {
      page,
      limit,
      total,
      total_pages: total_pages(total, limit),
    })
  }
}

/// Listing form of a [`Wordbook`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordbookSummary {
  pub id:          Uuid,
  pub name:        String,
  pub description: String,
  pub category:    WordbookCategory,
  pub word_count:  usize,
  pub is_preset:   bool,
  pub created_at:  DateTime<Utc>,
}

/// Input for seeding a preset wordbook.
#[derive(Debug, Clone)]
pub struct NewWordbook {
  pub name:        String,
  pub description: String,
  pub category:    WordbookCategory,
  pub words:       Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub page:        u32,
  pub limit:       u32,
  pub total:       u64,
  pub total_pages: u64,
}

// ─── User wordbooks ──────────────────────────────────────────────────────────

/// How a word got into a user's wordbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordOrigin {
  /// Copied from a preset wordbook on subscription.
  Preset,
  /// Added by the user after a search.
  Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWord {
  pub word:     String,
  pub added_at: DateTime<Utc>,
  pub source:   WordOrigin,
}

/// A user's personal word list, optionally linked to a preset wordbook.
///
/// At most one exists per `(user_id, wordbook_id)`; the unlinked one
/// (`wordbook_id == None`) collects words added from search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWordbook {
  pub id:          Uuid,
  pub user_id:     Uuid,
  pub wordbook_id: Option<Uuid>,
  pub custom_name: String,
  pub words:       Vec<UserWord>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl UserWordbook {
  pub fn new(
    user_id: Uuid,
    wordbook_id: Option<Uuid>,
    custom_name: impl Into<String>,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      wordbook_id,
      custom_name: custom_name.into(),
      words: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  /// Case-insensitive membership test.
  pub fn contains(&self, word: &str) -> bool {
    self.words.iter().any(|w| w.word.eq_ignore_ascii_case(word))
  }

  /// Append `word` (lowercased). Returns `false` and changes nothing if it
  /// is already present.
  pub fn add_word(
    &mut self,
    word: &str,
    source: WordOrigin,
    now: DateTime<Utc>,
  ) -> bool {
    if self.contains(word) {
      return false;
    }
    self.words.push(UserWord {
      word: word.to_lowercase(),
      added_at: now,
      source,
    });
    self.updated_at = now;
    true
  }
}

/// A user wordbook with the summary of the preset it is linked to, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWordbookView {
  #[serde(flatten)]
  pub wordbook: UserWordbook,
  pub preset:   Option<WordbookSummary>,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() }

  fn book(n: usize) -> Wordbook {
    Wordbook {
      id:          Uuid::new_v4(),
      name:        "CET4".into(),
      description: String::new(),
      category:    WordbookCategory::Cet4,
      word_count:  n,
      words:       (0..n).map(|i| format!("w{i}")).collect(),
      is_preset:   true,
      created_at:  now(),
    }
  }

  #[test]
  fn category_round_trips_uppercase() {
    assert_eq!(WordbookCategory::parse("IELTS").unwrap(), WordbookCategory::Ielts);
    assert_eq!(WordbookCategory::Toefl.as_ref(), "TOEFL");
    assert_eq!(
      serde_json::to_string(&WordbookCategory::Cet6).unwrap(),
      "\"CET6\""
    );
    assert!(WordbookCategory::parse("ielts").is_err());
  }

  #[test]
  fn paging_slices_words() {
    let b = book(7);
    let (words, p) = b.page(2, 3);
    assert_eq!(words, ["w3", "w4", "w5"]);
    assert_eq!(p, Pagination { page: 2, limit: 3, total: 7, total_pages: 3 });

    let (last, _) = b.page(3, 3);
    assert_eq!(last, ["w6"]);

    let (past_end, _) = b.page(9, 3);
    assert!(past_end.is_empty());
  }

  #[test]
  fn page_zero_is_first_page() {
    let (words, p) = book(2).page(0, 50);
    assert_eq!(words.len(), 2);
    assert_eq!(p.page, 1);
  }

  #[test]
  fn add_word_rejects_case_insensitive_duplicates() {
    let mut ub = UserWordbook::new(Uuid::nil(), None, DEFAULT_USER_WORDBOOK_NAME, now());
    assert!(ub.add_word("Apple", WordOrigin::Search, now()));
    assert!(!ub.add_word("APPLE", WordOrigin::Search, now()));
    assert_eq!(ub.words.len(), 1);
    assert_eq!(ub.words[0].word, "apple");
  }
}
