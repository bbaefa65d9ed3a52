//! Accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:            Uuid,
  /// Lowercase, trimmed; unique.
  pub email:         String,
  /// argon2 PHC string. Never leaves the server.
  #[serde(skip)]
  pub password_hash: String,
  pub nickname:      String,
  pub avatar:        String,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`crate::store::VocabStore::create_user`]. The store assigns the
/// id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub password_hash: String,
  pub nickname:      String,
}

/// Partial profile update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
  pub nickname: Option<String>,
  pub avatar:   Option<String>,
}

/// Normalise an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }
