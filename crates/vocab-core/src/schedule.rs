//! The review scheduler.
//!
//! A fixed interval ladder indexed by the number of `known` outcomes. A
//! `known` outcome moves the next review further up the ladder; any other
//! outcome drops it back to the first rung. `correct_count` is a lifetime
//! total and is never reset, so a `known` after a lapse jumps straight back
//! to the rung the total points at.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  record::{Progress, ReviewRecord, ReviewStatus},
};

/// Review intervals in minutes: 5 min, 30 min, 12 h, 1 d, 2 d, 4 d, 7 d, 15 d.
pub const INTERVAL_LADDER_MINUTES: [i64; 8] =
  [5, 30, 720, 1440, 2880, 5760, 10080, 21600];

/// Default page size for [`select_due`].
pub const DEFAULT_DUE_LIMIT: usize = 20;

/// Lowercase and trim a word. Fails if nothing is left.
pub fn normalize_word(word: &str) -> Result<String> {
  let normalized = word.trim().to_lowercase();
  if normalized.is_empty() {
    return Err(Error::EmptyWord);
  }
  Ok(normalized)
}

/// The interval for ladder rung `index`, clamped to the last rung.
pub fn ladder_interval(index: usize) -> Duration {
  let rung = index.min(INTERVAL_LADDER_MINUTES.len() - 1);
  Duration::minutes(INTERVAL_LADDER_MINUTES[rung])
}

/// Apply one review outcome to the stored record for `(user_id, word)`.
///
/// `existing` is `None` on the first review of a pair. The returned record
/// carries the next `version`; persisting it is the caller's job.
pub fn record_outcome(
  existing: Option<ReviewRecord>,
  user_id: Uuid,
  word: &str,
  outcome: ReviewStatus,
  now: DateTime<Utc>,
) -> Result<ReviewRecord> {
  let word = normalize_word(word)?;

  let Some(mut record) = existing else {
    return Ok(ReviewRecord {
      user_id,
      word,
      status: outcome,
      review_count: 1,
      correct_count: u32::from(outcome.is_known()),
      last_review_at: now,
      next_review_at: now + ladder_interval(0),
      version: 1,
      created_at: now,
      updated_at: now,
    });
  };

  record.review_count += 1;
  record.status = outcome;
  record.last_review_at = now;

  let rung = if outcome.is_known() {
    record.correct_count += 1;
    record.correct_count as usize
  } else {
    0
  };
  record.next_review_at = now + ladder_interval(rung);
  record.version += 1;
  record.updated_at = now;

  Ok(record)
}

/// Records due at or before `now`, earliest first, at most `limit` of them.
///
/// The sort is stable, so records with equal `next_review_at` keep their
/// input order.
pub fn select_due(
  records: impl IntoIterator<Item = ReviewRecord>,
  now: DateTime<Utc>,
  limit: usize,
) -> Vec<ReviewRecord> {
  let mut due: Vec<ReviewRecord> =
    records.into_iter().filter(|r| r.is_due(now)).collect();
  due.sort_by_key(|r| r.next_review_at);
  due.truncate(limit);
  due
}

/// Count records per status.
pub fn aggregate_progress<'a>(
  records: impl IntoIterator<Item = &'a ReviewRecord>,
) -> Progress {
  records
    .into_iter()
    .fold(Progress::default(), |mut progress, record| {
      progress.total += 1;
      match record.status {
        ReviewStatus::Known => progress.known += 1,
        ReviewStatus::Learning => progress.learning += 1,
        ReviewStatus::Unknown => progress.unknown += 1,
      }
      progress
    })
}
