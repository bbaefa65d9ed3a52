//! Layered word lookup.
//!
//! A [`Dictionary`] is an ordered list of [`WordSource`]s, fastest first.
//! A lookup walks the list until a source answers, then offers the answer to
//! every faster source via [`WordSource::remember`] so the next lookup stops
//! earlier. Sources that fail are logged and skipped; a lookup only ever
//! fails on an empty word.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, warn};

use crate::{
  Result,
  clock::Clock,
  schedule::normalize_word,
  store::VocabStore,
  word::WordInfo,
};

/// Error type for [`WordSource`] implementations.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// One tier of the lookup chain.
///
/// Uses `async_trait` rather than native async methods so a [`Dictionary`]
/// can hold heterogeneous sources behind `dyn`.
#[async_trait]
pub trait WordSource: Send + Sync {
  /// Short label for logs.
  fn name(&self) -> &'static str;

  /// `word` is already normalised. `Ok(None)` means "not here, ask the next
  /// tier".
  async fn try_lookup(&self, word: &str) -> Result<Option<WordInfo>, SourceError>;

  /// Called with an answer produced by a slower tier. Must be idempotent.
  async fn remember(&self, _info: &WordInfo) -> Result<(), SourceError> { Ok(()) }
}

// ─── Dictionary ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct Dictionary {
  sources: Vec<Arc<dyn WordSource>>,
}

impl Dictionary {
  pub fn new() -> Self { Self::default() }

  /// Append a source behind all existing ones.
  pub fn with_source(mut self, source: impl WordSource + 'static) -> Self {
    self.sources.push(Arc::new(source));
    self
  }

  /// Tier names in lookup order.
  pub fn tiers(&self) -> Vec<&'static str> {
    self.sources.iter().map(|s| s.name()).collect()
  }

  /// Look `word` up through every tier in order.
  pub async fn lookup(&self, word: &str) -> Result<Option<WordInfo>> {
    let word = normalize_word(word)?;

    for (tier, source) in self.sources.iter().enumerate() {
      let info = match source.try_lookup(&word).await {
        Ok(Some(info)) => info,
        Ok(None) => continue,
        Err(e) => {
          warn!(source = source.name(), %word, error = %e, "word source failed");
          continue;
        }
      };

      debug!(source = source.name(), %word, "word found");
      for faster in &self.sources[..tier] {
        if let Err(e) = faster.remember(&info).await {
          warn!(source = faster.name(), %word, error = %e, "failed to remember word");
        }
      }
      return Ok(Some(info));
    }

    debug!(%word, "word not found in any source");
    Ok(None)
  }
}

// ─── Store-backed tiers ──────────────────────────────────────────────────────

/// Curated [`WordDetail`](crate::word::WordDetail) rows. Read-only.
pub struct CuratedSource<S> {
  store: Arc<S>,
}

impl<S> CuratedSource<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }
}

#[async_trait]
impl<S> WordSource for CuratedSource<S>
where
  S: VocabStore + 'static,
{
  fn name(&self) -> &'static str { "curated" }

  async fn try_lookup(&self, word: &str) -> Result<Option<WordInfo>, SourceError> {
    Ok(self.store.get_word_detail(word).await?.map(WordInfo::from))
  }
}

/// The lookup cache. Entries older than `ttl` are ignored.
pub struct CacheSource<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
  ttl:   Duration,
}

impl<S> CacheSource<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
    Self { store, clock, ttl }
  }
}

#[async_trait]
impl<S> WordSource for CacheSource<S>
where
  S: VocabStore + 'static,
{
  fn name(&self) -> &'static str { "cache" }

  async fn try_lookup(&self, word: &str) -> Result<Option<WordInfo>, SourceError> {
    let Some(cached) = self.store.get_cached_word(word).await? else {
      return Ok(None);
    };
    if cached.cached_at + self.ttl <= self.clock.now() {
      debug!(%word, cached_at = %cached.cached_at, "cache entry expired");
      return Ok(None);
    }
    Ok(Some(cached.info))
  }

  async fn remember(&self, info: &WordInfo) -> Result<(), SourceError> {
    self.store.cache_word(info.clone(), self.clock.now()).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::{Error, word::Accents};

  fn info(word: &str) -> WordInfo {
    WordInfo {
      word:        word.into(),
      phonetic:    Accents::default(),
      audio_url:   Accents::default(),
      definitions: vec![format!("n. {word}")],
      translation: None,
      examples:    vec![],
    }
  }

  /// An in-memory tier that records what it was asked and told.
  #[derive(Default)]
  struct Recording {
    known:      Vec<String>,
    fail:       bool,
    asked:      Mutex<Vec<String>>,
    remembered: Mutex<Vec<String>>,
  }

  #[async_trait]
  impl WordSource for Arc<Recording> {
    fn name(&self) -> &'static str { "recording" }

    async fn try_lookup(&self, word: &str) -> Result<Option<WordInfo>, SourceError> {
      self.asked.lock().unwrap().push(word.to_owned());
      if self.fail {
        return Err("backend down".into());
      }
      Ok(self.known.iter().any(|w| w == word).then(|| info(word)))
    }

    async fn remember(&self, info: &WordInfo) -> Result<(), SourceError> {
      self.remembered.lock().unwrap().push(info.word.clone());
      Ok(())
    }
  }

  fn tier(known: &[&str]) -> Arc<Recording> {
    Arc::new(Recording {
      known: known.iter().map(|s| s.to_string()).collect(),
      ..Default::default()
    })
  }

  #[tokio::test]
  async fn first_hit_wins_and_later_tiers_are_not_asked() {
    let fast = tier(&["apple"]);
    let slow = tier(&["apple"]);
    let dict = Dictionary::new()
      .with_source(fast.clone())
      .with_source(slow.clone());

    let found = dict.lookup("  Apple ").await.unwrap().unwrap();
    assert_eq!(found.word, "apple");
    assert_eq!(*fast.asked.lock().unwrap(), ["apple"]);
    assert!(slow.asked.lock().unwrap().is_empty());
    assert!(fast.remembered.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn slow_hit_is_remembered_by_faster_tiers_only() {
    let a = tier(&[]);
    let b = tier(&[]);
    let c = tier(&["book"]);
    let d = tier(&["book"]);
    let dict = Dictionary::new()
      .with_source(a.clone())
      .with_source(b.clone())
      .with_source(c.clone())
      .with_source(d.clone());

    assert!(dict.lookup("book").await.unwrap().is_some());
    assert_eq!(*a.remembered.lock().unwrap(), ["book"]);
    assert_eq!(*b.remembered.lock().unwrap(), ["book"]);
    assert!(c.remembered.lock().unwrap().is_empty());
    assert!(d.asked.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn failing_tier_is_skipped() {
    let broken = Arc::new(Recording { fail: true, ..Default::default() });
    let good = tier(&["word"]);
    let dict = Dictionary::new()
      .with_source(broken.clone())
      .with_source(good);

    assert!(dict.lookup("word").await.unwrap().is_some());
    assert_eq!(*broken.asked.lock().unwrap(), ["word"]);
  }

  #[tokio::test]
  async fn miss_everywhere_is_none() {
    let dict = Dictionary::new().with_source(tier(&["a"]));
    assert!(dict.lookup("zzz").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn empty_word_is_an_error() {
    let dict = Dictionary::new().with_source(tier(&[]));
    assert!(matches!(dict.lookup("  ").await, Err(Error::EmptyWord)));
  }
}
