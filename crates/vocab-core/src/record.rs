//! Review records: the per-user, per-word spaced-repetition state.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The outcome of a single review, and the status of a record after it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReviewStatus {
  Unknown,
  Learning,
  Known,
}

impl ReviewStatus {
  /// Parse a client-supplied outcome. Anything other than the three
  /// lowercase names is rejected.
  pub fn parse(raw: &str) -> Result<Self> {
    Self::from_str(raw).map_err(|_| Error::InvalidOutcome(raw.to_owned()))
  }

  pub fn is_known(self) -> bool { matches!(self, Self::Known) }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One record per `(user_id, word)` pair.
///
/// Invariants maintained by [`crate::schedule::record_outcome`]:
/// `correct_count <= review_count`, `next_review_at >= last_review_at`, and
/// `version` grows by one per write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
  pub user_id:        Uuid,
  /// Lowercase, trimmed.
  pub word:           String,
  pub status:         ReviewStatus,
  pub review_count:   u32,
  pub correct_count:  u32,
  pub last_review_at: DateTime<Utc>,
  pub next_review_at: DateTime<Utc>,
  /// Compare-and-swap token. A freshly created record has version 1.
  pub version:        u64,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl ReviewRecord {
  pub fn is_due(&self, now: DateTime<Utc>) -> bool { self.next_review_at <= now }
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// Per-status counts over all of a user's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
  pub total:    usize,
  pub known:    usize,
  pub learning: usize,
  pub unknown:  usize,
}
