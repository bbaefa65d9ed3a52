//! Password hashing, bearer tokens, and the [`AuthUser`] extractor.
//!
//! A token is `base64url(claims) "." base64url(HMAC-SHA256(secret, first part))`
//! with `claims = {"sub": <user id>, "iat": <unix secs>, "exp": <unix secs>}`.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as B64};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use vocab_core::{store::VocabStore, user::User};

use crate::{AppState, error::ApiError};

type HmacSha256 = Hmac<Sha256>;

/// Seven days.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 3600;

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// `false` for a wrong password and for an unparseable hash alike.
pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
  #[error("token secret must not be empty")]
  EmptySecret,
  #[error("malformed token")]
  Malformed,
  #[error("bad token signature")]
  BadSignature,
  #[error("token expired")]
  Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Uuid,
  pub iat: i64,
  pub exp: i64,
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenKeys {
  mac: HmacSha256,
  ttl: Duration,
}

impl TokenKeys {
  pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
    if secret.is_empty() {
      return Err(TokenError::EmptySecret);
    }
    let mac =
      HmacSha256::new_from_slice(secret).map_err(|_| TokenError::EmptySecret)?;
    Ok(Self { mac, ttl })
  }

  fn sign(&self, payload: &str) -> Vec<u8> {
    let mut mac = self.mac.clone();
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
  }

  pub fn issue(&self, user_id: Uuid, now: DateTime<Utc>) -> String {
    let claims = Claims {
      sub: user_id,
      iat: now.timestamp(),
      exp: (now + self.ttl).timestamp(),
    };
    // Serialising three plain fields cannot fail.
    let json = serde_json::to_vec(&claims).unwrap_or_default();
    let payload = B64.encode(json);
    let signature = B64.encode(self.sign(&payload));
    format!("{payload}.{signature}")
  }

  pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
    let signature = B64.decode(signature).map_err(|_| TokenError::Malformed)?;

    let mut mac = self.mac.clone();
    mac.update(payload.as_bytes());
    mac
      .verify_slice(&signature)
      .map_err(|_| TokenError::BadSignature)?;

    let json = B64.decode(payload).map_err(|_| TokenError::Malformed)?;
    let claims: Claims =
      serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;
    if claims.exp <= now.timestamp() {
      return Err(TokenError::Expired);
    }
    Ok(claims)
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated user for this request.
pub struct AuthUser(pub User);

fn bearer(parts: &Parts) -> Option<&str> {
  parts
    .headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: VocabStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer(parts)
      .ok_or_else(|| ApiError::Unauthorized("Please log in first".into()))?;

    let claims = state.tokens.verify(token, state.clock.now()).map_err(|e| {
      debug!(error = %e, "rejected bearer token");
      ApiError::Unauthorized("Invalid or expired token".into())
    })?;

    let user = state
      .store
      .get_user(claims.sub)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(AuthUser(user))
  }
}
