//! Dictionary entries as returned by lookups and stored by backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A US/UK pair, used for both phonetic transcriptions and audio URLs.
/// Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accents {
  #[serde(default)]
  pub us: String,
  #[serde(default)]
  pub uk: String,
}

impl Accents {
  /// The same value for both accents.
  pub fn both(value: impl Into<String>) -> Self {
    let value = value.into();
    Self { us: value.clone(), uk: value }
  }
}

/// The result of a word lookup, whichever tier answered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
  pub word:        String,
  pub phonetic:    Accents,
  pub audio_url:   Accents,
  pub definitions: Vec<String>,
  /// Only curated sources carry a translation.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub translation: Option<String>,
  pub examples:    Vec<String>,
}

/// A curated dictionary row with study metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetail {
  pub word:        String,
  pub phonetic:    Accents,
  pub audio_url:   Accents,
  /// English definitions.
  pub definitions: Vec<String>,
  pub translation: String,
  /// Part of speech.
  pub pos:         String,
  pub examples:    Vec<String>,
  /// Exam lists the word belongs to, e.g. `CET4`, `IELTS`.
  pub tags:        Vec<String>,
  /// 1 (easiest) to 5.
  pub difficulty:  u8,
  pub frequency:   u32,
}

impl From<WordDetail> for WordInfo {
  fn from(d: WordDetail) -> Self {
    WordInfo {
      word:        d.word,
      phonetic:    d.phonetic,
      audio_url:   d.audio_url,
      definitions: d.definitions,
      translation: Some(d.translation).filter(|t| !t.is_empty()),
      examples:    d.examples,
    }
  }
}

/// A cached lookup result and when it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedWord {
  pub info:      WordInfo,
  pub cached_at: DateTime<Utc>,
}

/// How many curated words carry a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
  pub tag:   String,
  pub count: u64,
}

/// One page of curated words for a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPage {
  pub words:       Vec<WordInfo>,
  pub total:       u64,
  pub page:        u32,
  pub total_pages: u64,
}

/// `ceil(total / limit)`, with a zero limit giving zero pages.
pub fn total_pages(total: u64, limit: u32) -> u64 {
  if limit == 0 { 0 } else { total.div_ceil(u64::from(limit)) }
}
