//! Seed data: the preset exam wordbooks and curated rows for the built-in
//! dictionary words.

use vocab_core::{
  store::VocabStore,
  word::WordDetail,
  wordbook::{NewWordbook, WordbookCategory},
};
use vocab_dict::LocalDictionary;

const CET4_WORDS: &[&str] = &[
  "abandon", "ability", "able", "abnormal", "aboard", "abolish", "about",
  "above", "abroad", "abrupt", "absence", "absent", "absolute", "absorb",
  "abstract", "absurd", "abundance", "abundant", "abuse", "academic",
  "accelerate", "accent", "accept", "acceptance", "access", "accessible",
  "accident", "accommodate", "accompany", "accomplish", "achieve",
  "achievement", "across", "act", "action", "active", "activity", "apple",
];

const CET6_WORDS: &[&str] = &[
  "abide", "abolish", "abrupt", "absurd", "abundance", "accessory",
  "accommodate", "accord", "accumulate", "accurate", "accuse", "acquaint",
  "activate", "acute", "adhere", "adjacent", "adjoin", "administer",
  "adolescent", "advent", "adverse", "advocate", "aesthetic", "affiliate",
  "affirm", "afflict", "aggravate", "aggregate", "agitate", "agonize",
];

const IELTS_WORDS: &[&str] = &[
  "abandon", "abbreviate", "abide", "abolish", "abound", "abroad", "abrupt",
  "absence", "absent", "absolute", "absorb", "abstract", "absurd",
  "abundant", "abuse", "academic", "accelerate", "accent", "accept",
  "access", "accessible", "accident", "accommodate", "accompany",
  "accomplish", "accord", "account", "accumulate", "accurate", "accuse",
  "achieve", "acknowledge",
];

const TOEFL_WORDS: &[&str] = &[
  "abandon", "abate", "abbreviate", "abdicate", "aberrant", "abhor", "abide",
  "ability", "abolish", "abound", "abrasive", "abridge", "abrogate",
  "abrupt", "abscond", "absolute", "absolve", "absorb", "abstain",
  "abstract", "absurd", "abundant", "abuse", "abysmal", "academic",
  "accede", "accelerate", "accentuate", "accept", "access", "achieve",
];

/// What [`seed`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  pub wordbooks: usize,
  pub words:     usize,
}

fn book(
  name: &str,
  description: &str,
  category: WordbookCategory,
  words: &[&str],
) -> NewWordbook {
  NewWordbook {
    name: name.to_string(),
    description: description.to_string(),
    category,
    words: words.iter().map(|w| w.to_string()).collect(),
  }
}

pub fn preset_wordbooks() -> Vec<NewWordbook> {
  vec![
    book(
      "CET4 Core Vocabulary",
      "High-frequency words for the College English Test, band 4",
      WordbookCategory::Cet4,
      CET4_WORDS,
    ),
    book(
      "CET6 Core Vocabulary",
      "High-frequency words for the College English Test, band 6",
      WordbookCategory::Cet6,
      CET6_WORDS,
    ),
    book(
      "IELTS Core Vocabulary",
      "High-frequency words for the IELTS exam",
      WordbookCategory::Ielts,
      IELTS_WORDS,
    ),
    book(
      "TOEFL Core Vocabulary",
      "High-frequency words for the TOEFL exam",
      WordbookCategory::Toefl,
      TOEFL_WORDS,
    ),
  ]
}

/// A curated row for every built-in word, tagged with the categories of the
/// presets that list it.
pub fn curated_details(presets: &[NewWordbook]) -> Vec<WordDetail> {
  LocalDictionary
    .entries()
    .iter()
    .map(|entry| {
      let tags = presets
        .iter()
        .filter(|b| b.words.iter().any(|w| w.eq_ignore_ascii_case(entry.word)))
        .map(|b| b.category.to_string())
        .collect();
      entry.to_detail(tags)
    })
    .collect()
}

/// Replace the preset wordbooks and upsert the curated words.
pub async fn seed<S: VocabStore>(store: &S) -> Result<SeedReport, S::Error> {
  let presets = preset_wordbooks();
  let details = curated_details(&presets);

  let books = store.replace_preset_wordbooks(presets).await?;
  for book in &books {
    tracing::info!(name = %book.name, words = book.word_count, "seeded wordbook");
  }

  let words = details.len();
  for detail in details {
    store.upsert_word_detail(detail).await?;
  }

  Ok(SeedReport { wordbooks: books.len(), words })
}
