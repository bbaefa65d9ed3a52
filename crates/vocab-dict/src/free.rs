//! Client for the Free Dictionary API (`dictionaryapi.dev`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;
use vocab_core::{
  dictionary::{SourceError, WordSource},
  word::{Accents, WordInfo},
};

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const DEFINITIONS_PER_MEANING: usize = 2;
const MAX_DEFINITIONS: usize = 5;
const MAX_EXAMPLES: usize = 3;

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Entry {
  #[serde(default)]
  phonetics: Vec<Phonetic>,
  #[serde(default)]
  meanings:  Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
  #[serde(default)]
  text:  Option<String>,
  #[serde(default)]
  audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meaning {
  #[serde(default)]
  part_of_speech: String,
  #[serde(default)]
  definitions:    Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
  definition: String,
  #[serde(default)]
  example:    Option<String>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
  s.as_deref().filter(|s| !s.is_empty())
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Map a Free Dictionary response body to a [`WordInfo`] for `word`.
///
/// Only the first entry is used. An empty array is `None`.
pub fn parse_entries(word: &str, body: &str) -> Result<Option<WordInfo>> {
  let entries: Vec<Entry> = serde_json::from_str(body)?;
  let Some(entry) = entries.into_iter().next() else {
    return Ok(None);
  };

  let phonetics = &entry.phonetics;
  let with_audio = |accent: &str| {
    phonetics.iter().find(|p| {
      p.audio.as_deref().is_some_and(|a| a.contains(accent))
    })
  };
  let first_text = phonetics.first().and_then(|p| non_empty(&p.text));
  let text_for = |accent: &str| {
    with_audio(accent)
      .and_then(|p| non_empty(&p.text))
      .or(first_text)
      .unwrap_or_default()
      .to_owned()
  };

  let us_audio = with_audio("us").and_then(|p| non_empty(&p.audio));
  let uk_audio = with_audio("uk")
    .and_then(|p| non_empty(&p.audio))
    .or_else(|| phonetics.iter().find_map(|p| non_empty(&p.audio)));

  let mut definitions = Vec::new();
  let mut examples = Vec::new();
  for meaning in &entry.meanings {
    for def in meaning.definitions.iter().take(DEFINITIONS_PER_MEANING) {
      definitions.push(format!("{}. {}", meaning.part_of_speech, def.definition));
      if let Some(example) = non_empty(&def.example) {
        examples.push(example.to_owned());
      }
    }
  }
  definitions.truncate(MAX_DEFINITIONS);
  examples.truncate(MAX_EXAMPLES);

  Ok(Some(WordInfo {
    word: word.to_lowercase(),
    phonetic: Accents { us: text_for("us"), uk: text_for("uk") },
    audio_url: Accents {
      us: us_audio.unwrap_or_default().to_owned(),
      uk: uk_audio.unwrap_or_default().to_owned(),
    },
    definitions,
    translation: None,
    examples,
  }))
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// HTTP word source backed by the Free Dictionary API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FreeDictionary {
  client: Client,
  base:   Url,
}

impl FreeDictionary {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let base = Url::parse(base_url).map_err(|e| Error::BaseUrl(e.to_string()))?;
    if base.cannot_be_a_base() {
      return Err(Error::BaseUrl(base_url.to_owned()));
    }
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base })
  }

  fn entry_url(&self, word: &str) -> Result<Url> {
    let mut url = self.base.clone();
    url
      .path_segments_mut()
      .map_err(|()| Error::BaseUrl(self.base.to_string()))?
      .pop_if_empty()
      .push(word);
    Ok(url)
  }

  /// `GET {base}/{word}`. A 404 is `None`.
  pub async fn fetch(&self, word: &str) -> Result<Option<WordInfo>> {
    let resp = self.client.get(self.entry_url(word)?).send().await?;

    match resp.status() {
      StatusCode::NOT_FOUND => {
        debug!(%word, "not in free dictionary");
        Ok(None)
      }
      status if status.is_success() => parse_entries(word, &resp.text().await?),
      status => Err(Error::UnexpectedStatus(status)),
    }
  }
}

#[async_trait]
impl WordSource for FreeDictionary {
  fn name(&self) -> &'static str { "free-dictionary" }

  async fn try_lookup(&self, word: &str) -> Result<Option<WordInfo>, SourceError> {
    Ok(self.fetch(word).await?)
  }
}
